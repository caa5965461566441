// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors surfaced synchronously by the pipeline command surface.
//!
//! Only setup-time failures are returned to callers. Anything that happens on the
//! engine's notification threads is recorded in the pipeline state or logged.

use crate::errors::EngineError;
use thiserror::Error;

/// Failures while rendering a description template.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// A placeholder (or one of its index keys) has no value in the render context.
    #[error("Template placeholder '{placeholder}' has no value")]
    MissingValue { placeholder: String },

    /// The template itself is not well formed.
    #[error("Malformed template at byte {position}: {reason}")]
    Malformed { position: usize, reason: String },
}

#[derive(Error, Debug)]
pub enum PipelineError {
    /// The caller's request has the wrong shape.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Template render failed: {0}")]
    TemplateRender(#[from] RenderError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// `status`/`stop` called before `start`.
    #[error("Pipeline '{0}' has not been started")]
    NotStarted(String),

    /// `start` called on an instance that already ran.
    #[error("Pipeline '{0}' was already started")]
    AlreadyStarted(String),
}
