// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for per-unit metadata handling.
//!
//! These fire on the engine's unit-notification thread, so everything below
//! `error!` stays at `debug!` to keep the hot path quiet.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Processed unit carried no structured metadata.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct NoUnitMetadata<'a> {
    pub pipeline_id: &'a str,
}

impl Display for NoUnitMetadata<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Pipeline {}: no metadata on processed unit", self.pipeline_id)
    }
}

impl StructuredLog for NoUnitMetadata<'_> {
    fn log(&self) {
        tracing::debug!(pipeline_id = self.pipeline_id, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("no_unit_metadata", span_name = name, pipeline_id = self.pipeline_id)
    }
}

/// Structured metadata parsed from a processed unit.
///
/// # Log Level
/// `debug!` - Diagnostic detail
///
/// # Example
/// ```
/// use analytics_pipeline::observability::messages::frame::UnitMetadataReceived;
///
/// let msg = UnitMetadataReceived {
///     pipeline_id: "7",
///     object_count: 3,
///     bytes: 512,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct UnitMetadataReceived<'a> {
    pub pipeline_id: &'a str,
    pub object_count: usize,
    pub bytes: usize,
}

impl Display for UnitMetadataReceived<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline {}: unit metadata with {} objects ({} bytes)",
            self.pipeline_id, self.object_count, self.bytes
        )
    }
}

impl StructuredLog for UnitMetadataReceived<'_> {
    fn log(&self) {
        tracing::debug!(
            pipeline_id = self.pipeline_id,
            object_count = self.object_count,
            bytes = self.bytes,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "unit_metadata",
            span_name = name,
            pipeline_id = self.pipeline_id,
            object_count = self.object_count,
        )
    }
}

/// Unit metadata could not be handled (bad UTF-8, bad JSON, ...).
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct UnitMetadataFailed<'a> {
    pub pipeline_id: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for UnitMetadataFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Error on pipeline {}: {}", self.pipeline_id, self.error)
    }
}

impl StructuredLog for UnitMetadataFailed<'_> {
    fn log(&self) {
        tracing::error!(
            pipeline_id = self.pipeline_id,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "unit_metadata_failed",
            span_name = name,
            pipeline_id = self.pipeline_id,
            error = %self.error,
        )
    }
}

/// Something panicked inside the unit callback and was contained there.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct CallbackFault<'a> {
    pub pipeline_id: &'a str,
    pub reason: &'a str,
}

impl Display for CallbackFault<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Unit callback fault on pipeline {}: {}",
            self.pipeline_id, self.reason
        )
    }
}

impl StructuredLog for CallbackFault<'_> {
    fn log(&self) {
        tracing::error!(
            pipeline_id = self.pipeline_id,
            reason = self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "callback_fault",
            span_name = name,
            pipeline_id = self.pipeline_id,
        )
    }
}
