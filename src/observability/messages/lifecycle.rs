// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for pipeline lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Pipeline start and description rendering
//! * State transitions driven by engine events and by `stop()`
//! * Graph teardown
//! * Engine errors reported on the bus

use crate::observability::messages::StructuredLog;
use crate::pipeline::PipelineState;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Pipeline start requested.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use analytics_pipeline::observability::messages::lifecycle::PipelineStarting;
///
/// let msg = PipelineStarting {
///     pipeline_id: "7",
///     pipeline_type: "object_detection",
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct PipelineStarting<'a> {
    pub pipeline_id: &'a str,
    pub pipeline_type: &'a str,
}

impl Display for PipelineStarting<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting pipeline {} ({})",
            self.pipeline_id, self.pipeline_type
        )
    }
}

impl StructuredLog for PipelineStarting<'_> {
    fn log(&self) {
        tracing::info!(
            pipeline_id = self.pipeline_id,
            pipeline_type = self.pipeline_type,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "pipeline",
            span_name = name,
            pipeline_id = self.pipeline_id,
            pipeline_type = self.pipeline_type,
        )
    }
}

/// Concrete description rendered from the template.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct DescriptionRendered<'a> {
    pub pipeline_id: &'a str,
    pub description: &'a str,
}

impl Display for DescriptionRendered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline {} description: {}",
            self.pipeline_id, self.description
        )
    }
}

impl StructuredLog for DescriptionRendered<'_> {
    fn log(&self) {
        tracing::debug!(
            pipeline_id = self.pipeline_id,
            description = self.description,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "description_rendered",
            span_name = name,
            pipeline_id = self.pipeline_id,
        )
    }
}

/// Pipeline state changed.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use analytics_pipeline::observability::messages::lifecycle::StateTransition;
/// use analytics_pipeline::pipeline::PipelineState;
///
/// let msg = StateTransition {
///     pipeline_id: "7",
///     from: PipelineState::Running,
///     to: PipelineState::Completed,
///     trigger: "eos",
/// };
///
/// assert_eq!(msg.to_string(), "Setting pipeline 7 state RUNNING -> COMPLETED (eos)");
/// ```
pub struct StateTransition<'a> {
    pub pipeline_id: &'a str,
    pub from: PipelineState,
    pub to: PipelineState,
    pub trigger: &'a str,
}

impl Display for StateTransition<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Setting pipeline {} state {} -> {} ({})",
            self.pipeline_id, self.from, self.to, self.trigger
        )
    }
}

impl StructuredLog for StateTransition<'_> {
    fn log(&self) {
        tracing::info!(
            pipeline_id = self.pipeline_id,
            from = %self.from,
            to = %self.to,
            trigger = self.trigger,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "state_transition",
            span_name = name,
            pipeline_id = self.pipeline_id,
            from = %self.from,
            to = %self.to,
        )
    }
}

/// Graph forced to Null and its handle released.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct GraphReleased<'a> {
    pub pipeline_id: &'a str,
    pub reason: &'a str,
}

impl Display for GraphReleased<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Released graph of pipeline {} ({})",
            self.pipeline_id, self.reason
        )
    }
}

impl StructuredLog for GraphReleased<'_> {
    fn log(&self) {
        tracing::debug!(
            pipeline_id = self.pipeline_id,
            reason = self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "graph_released",
            span_name = name,
            pipeline_id = self.pipeline_id,
            reason = self.reason,
        )
    }
}

/// The engine could not move a released graph to Null.
///
/// # Log Level
/// `warn!` - Degraded teardown
pub struct GraphTeardownFailed<'a> {
    pub pipeline_id: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for GraphTeardownFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to stop graph of pipeline {}: {}",
            self.pipeline_id, self.error
        )
    }
}

impl StructuredLog for GraphTeardownFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            pipeline_id = self.pipeline_id,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "graph_teardown_failed",
            span_name = name,
            pipeline_id = self.pipeline_id,
            error = %self.error,
        )
    }
}

/// Error posted on the engine bus.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use analytics_pipeline::observability::messages::lifecycle::EngineErrorReported;
///
/// let msg = EngineErrorReported {
///     pipeline_id: "7",
///     message: "Internal data stream error",
///     debug: None,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct EngineErrorReported<'a> {
    pub pipeline_id: &'a str,
    pub message: &'a str,
    pub debug: Option<&'a str>,
}

impl Display for EngineErrorReported<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Error on pipeline {}: {}", self.pipeline_id, self.message)?;
        if let Some(debug) = self.debug {
            write!(f, " ({})", debug)?;
        }
        Ok(())
    }
}

impl StructuredLog for EngineErrorReported<'_> {
    fn log(&self) {
        tracing::error!(
            pipeline_id = self.pipeline_id,
            error = self.message,
            debug = self.debug,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "engine_error",
            span_name = name,
            pipeline_id = self.pipeline_id,
            error = self.message,
        )
    }
}

/// A named element the request wanted to configure is not in the graph.
///
/// # Log Level
/// `debug!` - Expected for templates that omit optional elements
pub struct ElementNotFound<'a> {
    pub pipeline_id: &'a str,
    pub element: &'a str,
    pub purpose: &'a str,
}

impl Display for ElementNotFound<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline {}: {} given but no element '{}' found",
            self.pipeline_id, self.purpose, self.element
        )
    }
}

impl StructuredLog for ElementNotFound<'_> {
    fn log(&self) {
        tracing::debug!(
            pipeline_id = self.pipeline_id,
            element = self.element,
            purpose = self.purpose,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "element_not_found",
            span_name = name,
            pipeline_id = self.pipeline_id,
            element = self.element,
        )
    }
}

/// `start()` failed and returned an error to the caller.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct StartFailed<'a> {
    pub pipeline_id: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for StartFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to start pipeline {}: {}",
            self.pipeline_id, self.error
        )
    }
}

impl StructuredLog for StartFailed<'_> {
    fn log(&self) {
        tracing::error!(
            pipeline_id = self.pipeline_id,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "start_failed",
            span_name = name,
            pipeline_id = self.pipeline_id,
            error = %self.error,
        )
    }
}
