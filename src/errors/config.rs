// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Problems found while validating the pipeline templates of a service configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Two templates declare the same pipeline type
    DuplicateTemplateType {
        /// The repeated type name
        template_type: String,
    },
    /// A template has an empty description
    EmptyTemplate {
        /// The template with nothing to render
        template_type: String,
    },
    /// The description never names the element that unit callbacks are attached to
    MissingSink {
        /// The template missing the sink
        template_type: String,
        /// The sink name the template expects to find
        sink: String,
    },
    /// A parameter is bound to an element with an empty name
    EmptyElementBinding {
        /// The template declaring the parameter
        template_type: String,
        /// The parameter with the empty binding
        parameter: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateTemplateType { template_type } => {
                write!(f, "Duplicate pipeline template type: '{}'", template_type)
            }
            ValidationError::EmptyTemplate { template_type } => {
                write!(f, "Pipeline template '{}' has an empty description", template_type)
            }
            ValidationError::MissingSink {
                template_type,
                sink,
            } => {
                write!(
                    f,
                    "Pipeline template '{}' does not contain an element named '{}'",
                    template_type, sink
                )
            }
            ValidationError::EmptyElementBinding {
                template_type,
                parameter,
            } => {
                write!(
                    f,
                    "Parameter '{}' of pipeline template '{}' is bound to an empty element name",
                    parameter, template_type
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while loading the service configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported config format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Configuration validation failed:\n{}", join_lines(.0))]
    Validation(Vec<ValidationError>),
}

fn join_lines(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
