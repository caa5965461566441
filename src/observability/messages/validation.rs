// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for configuration loading and validation.

use crate::errors::ValidationError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Service configuration loaded.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use analytics_pipeline::observability::messages::validation::ConfigLoaded;
///
/// let msg = ConfigLoaded {
///     path: "config/pipelines.yaml",
///     template_count: 2,
/// };
///
/// assert_eq!(msg.to_string(), "Loaded 2 pipeline templates from config/pipelines.yaml");
/// ```
pub struct ConfigLoaded<'a> {
    pub path: &'a str,
    pub template_count: usize,
}

impl Display for ConfigLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded {} pipeline templates from {}",
            self.template_count, self.path
        )
    }
}

impl StructuredLog for ConfigLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            path = self.path,
            template_count = self.template_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "config_loaded",
            span_name = name,
            path = self.path,
        )
    }
}

/// A template failed validation.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct TemplateInvalid<'a> {
    pub error: &'a ValidationError,
}

impl Display for TemplateInvalid<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Template validation failed: {}", self.error)
    }
}

impl StructuredLog for TemplateInvalid<'_> {
    fn log(&self) {
        tracing::error!(error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("template_invalid", span_name = name, error = %self.error)
    }
}
