// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for process-wide engine setup and teardown.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Engine initialized for the process.
///
/// # Log Level
/// `info!` - Important operational event
pub struct EngineInitialized<'a> {
    pub engine: &'a str,
}

impl Display for EngineInitialized<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Initialized media engine '{}'", self.engine)
    }
}

impl StructuredLog for EngineInitialized<'_> {
    fn log(&self) {
        tracing::info!(engine = self.engine, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("engine_initialized", span_name = name, engine = self.engine)
    }
}

/// A second initialization request was ignored.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct EngineAlreadyInitialized<'a> {
    pub engine: &'a str,
    pub requested: &'a str,
}

impl Display for EngineAlreadyInitialized<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Media engine '{}' already initialized, ignoring '{}'",
            self.engine, self.requested
        )
    }
}

impl StructuredLog for EngineAlreadyInitialized<'_> {
    fn log(&self) {
        tracing::debug!(engine = self.engine, requested = self.requested, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "engine_already_initialized",
            span_name = name,
            engine = self.engine,
        )
    }
}

/// Engine deinitialized.
///
/// # Log Level
/// `info!` - Important operational event
pub struct EngineShutdown<'a> {
    pub engine: &'a str,
}

impl Display for EngineShutdown<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Shut down media engine '{}'", self.engine)
    }
}

impl StructuredLog for EngineShutdown<'_> {
    fn log(&self) {
        tracing::info!(engine = self.engine, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("engine_shutdown", span_name = name, engine = self.engine)
    }
}
