// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for analytics delivery.
//!
//! This module contains message types for logging events related to:
//! * Destination creation (and its best-effort downgrade)
//! * Dispatch queue overflow
//! * Destination send failures and worker shutdown

use crate::dispatch::{DispatchStats, OverflowPolicy};
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Destination could not be created; the pipeline runs without one.
///
/// # Log Level
/// `warn!` - Degraded behavior: analytics are computed but dropped
///
/// # Example
/// ```
/// use analytics_pipeline::observability::messages::dispatch::DestinationUnavailable;
///
/// let error = std::io::Error::new(std::io::ErrorKind::NotFound, "no such dir");
/// let msg = DestinationUnavailable {
///     pipeline_id: "7",
///     error: &error,
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct DestinationUnavailable<'a> {
    pub pipeline_id: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for DestinationUnavailable<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline {} has no destination, analytics will be dropped: {}",
            self.pipeline_id, self.error
        )
    }
}

impl StructuredLog for DestinationUnavailable<'_> {
    fn log(&self) {
        tracing::warn!(
            pipeline_id = self.pipeline_id,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "destination_unavailable",
            span_name = name,
            pipeline_id = self.pipeline_id,
        )
    }
}

/// Dispatch queue was full and a record was discarded.
///
/// # Log Level
/// `warn!` - Analytics lost under backpressure
pub struct RecordDropped<'a> {
    pub pipeline_id: &'a str,
    pub policy: OverflowPolicy,
    pub dropped_total: u64,
}

impl Display for RecordDropped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline {} dispatch queue full, dropped a record ({:?}, {} dropped so far)",
            self.pipeline_id, self.policy, self.dropped_total
        )
    }
}

impl StructuredLog for RecordDropped<'_> {
    fn log(&self) {
        tracing::warn!(
            pipeline_id = self.pipeline_id,
            policy = ?self.policy,
            dropped_total = self.dropped_total,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "record_dropped",
            span_name = name,
            pipeline_id = self.pipeline_id,
        )
    }
}

/// Destination send failed or timed out.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct DestinationSendFailed<'a> {
    pub pipeline_id: &'a str,
    pub destination: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for DestinationSendFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline {} failed to send to {} destination: {}",
            self.pipeline_id, self.destination, self.error
        )
    }
}

impl StructuredLog for DestinationSendFailed<'_> {
    fn log(&self) {
        tracing::error!(
            pipeline_id = self.pipeline_id,
            destination = self.destination,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "destination_send_failed",
            span_name = name,
            pipeline_id = self.pipeline_id,
            destination = self.destination,
        )
    }
}

/// Dispatch worker drained its queue and closed the destination.
///
/// # Log Level
/// `info!` - Important operational event
pub struct DispatchFinished<'a> {
    pub pipeline_id: &'a str,
    pub stats: &'a DispatchStats,
}

impl Display for DispatchFinished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline {} dispatch finished: {} delivered, {} failed, {} dropped",
            self.pipeline_id, self.stats.delivered, self.stats.failed, self.stats.dropped
        )
    }
}

impl StructuredLog for DispatchFinished<'_> {
    fn log(&self) {
        tracing::info!(
            pipeline_id = self.pipeline_id,
            queued = self.stats.queued,
            delivered = self.stats.delivered,
            failed = self.stats.failed,
            dropped = self.stats.dropped,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "dispatch_finished",
            span_name = name,
            pipeline_id = self.pipeline_id,
        )
    }
}
