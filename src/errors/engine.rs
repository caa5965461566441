// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Failures reported by the media engine behind the graph adapter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The engine could not be brought up (or was used before it was).
    #[error("Engine initialization failed: {0}")]
    Init(String),

    /// The description could not be turned into a graph.
    #[error("Failed to build graph: {0}")]
    Build(String),

    /// A required element is not part of the graph.
    #[error("Element '{0}' not found in graph")]
    MissingElement(String),

    /// An element rejected a property assignment.
    #[error("Failed to set property '{key}' on element '{element}': {reason}")]
    Property {
        element: String,
        key: String,
        reason: String,
    },

    /// The graph refused a state change.
    #[error("Failed to set graph state to {target}: {reason}")]
    StateChange { target: String, reason: String },

    /// Callbacks could not be attached to the graph.
    #[error("Failed to subscribe to graph notifications: {0}")]
    Subscribe(String),
}
