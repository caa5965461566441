// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Graph adapter: the slice of a media engine the pipeline lifecycle relies on.
//!
//! An engine turns a textual description into a running graph of named
//! elements. Once subscribed, it reports bus events and processed units on its
//! own threads, concurrently with the caller and with each other.

use crate::errors::EngineError;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Playing state of a graph or element, as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphState {
    VoidPending,
    Null,
    Ready,
    Paused,
    Playing,
}

impl fmt::Display for GraphState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GraphState::VoidPending => "VOID_PENDING",
            GraphState::Null => "NULL",
            GraphState::Ready => "READY",
            GraphState::Paused => "PAUSED",
            GraphState::Playing => "PLAYING",
        };
        f.write_str(name)
    }
}

/// Acknowledgment returned from a unit callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowReturn {
    /// Keep delivering units.
    Ok,
    /// The receiver is going away; the engine should stop pushing.
    Flushing,
    Eos,
    Error,
}

/// Where an event was posted from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOrigin {
    /// The top-level graph.
    Graph,
    /// A named element inside the graph.
    Element(String),
}

/// An engine bus event.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    StateChanged {
        origin: EventOrigin,
        old: GraphState,
        new: GraphState,
        pending: GraphState,
    },
    EndOfStream,
    Error {
        origin: EventOrigin,
        message: String,
        debug: Option<String>,
    },
    /// Anything the lifecycle does not react to (warnings, tags, qos...).
    Other(String),
}

impl GraphEvent {
    pub fn kind(&self) -> &str {
        match self {
            GraphEvent::StateChanged { .. } => "state-changed",
            GraphEvent::EndOfStream => "eos",
            GraphEvent::Error { .. } => "error",
            GraphEvent::Other(kind) => kind,
        }
    }
}

/// A unit of media that completed its pass through the graph.
pub trait ProcessedUnit {
    /// Structured metadata attached to the unit by upstream analysis, if any.
    fn payload(&self) -> Option<Vec<u8>>;
}

pub type EventCallback = Box<dyn Fn(GraphEvent) + Send + Sync + 'static>;
pub type UnitCallback = Box<dyn Fn(&dyn ProcessedUnit) -> FlowReturn + Send + Sync + 'static>;

/// A named element of a built graph.
pub trait Element: Send + Sync {
    fn name(&self) -> &str;

    fn set_property(&self, key: &str, value: &Value) -> Result<(), EngineError>;
}

/// A built, executable graph.
pub trait Graph: Send + Sync {
    fn find_element(&self, name: &str) -> Option<Arc<dyn Element>>;

    fn set_state(&self, state: GraphState) -> Result<(), EngineError>;

    /// Register the consumer of bus events. Invoked once per event on an engine thread.
    fn subscribe_events(&self, callback: EventCallback) -> Result<(), EngineError>;

    /// Register the per-unit callback on the sink element named `sink`.
    fn subscribe_units(&self, sink: &str, callback: UnitCallback) -> Result<(), EngineError>;
}

/// Factory side of the engine.
pub trait Engine: Send + Sync {
    fn name(&self) -> &'static str;

    /// Process-wide engine setup. See [`crate::engine::EngineRuntime`].
    fn initialize(&self) -> Result<(), EngineError> {
        Ok(())
    }

    fn deinitialize(&self) {}

    fn build(&self, description: &str) -> Result<Arc<dyn Graph>, EngineError>;
}
