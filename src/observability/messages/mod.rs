// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! * `lifecycle` - pipeline start, state transitions, teardown
//! * `frame` - per-unit metadata handling
//! * `dispatch` - destination creation and delivery
//! * `engine` - process-wide engine setup and teardown
//! * `validation` - configuration validation warnings and errors

use tracing::Span;

pub mod dispatch;
pub mod engine;
pub mod frame;
pub mod lifecycle;
pub mod validation;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a tracing event at its level.
    fn log(&self);

    /// Build a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
