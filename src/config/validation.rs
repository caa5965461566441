// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Template validation for service configurations.
//!
//! Checks run independently and every problem found is reported, so a broken
//! configuration can be fixed in one pass:
//!
//! 1. **Uniqueness**: each template `type` appears once
//! 2. **Content**: descriptions are not blank
//! 3. **Sink reference**: the description names the sink element (`name=<sink>`)
//! 4. **Element bindings**: bound element names are not blank
//!
//! Placeholders are not checked here. Callers may supply any key at request
//! time, so a placeholder without a default is only an error once rendering
//! finds no value for it.
//!
//! # Example
//! ```rust
//! use analytics_pipeline::config::{validate_templates, PipelineTemplate};
//!
//! let templates = vec![
//!     PipelineTemplate::new("detect", "src ! detect ! appsink name=appsink"),
//! ];
//!
//! assert!(validate_templates(&templates).is_ok());
//! ```

use crate::config::PipelineTemplate;
use crate::errors::ValidationError;
use std::collections::HashSet;

/// Validates a set of pipeline templates, accumulating every error found.
pub fn validate_templates(templates: &[PipelineTemplate]) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen_types = HashSet::new();

    for template in templates {
        if !seen_types.insert(template.pipeline_type.as_str()) {
            errors.push(ValidationError::DuplicateTemplateType {
                template_type: template.pipeline_type.clone(),
            });
        }

        if template.template.trim().is_empty() {
            errors.push(ValidationError::EmptyTemplate {
                template_type: template.pipeline_type.clone(),
            });
        } else if !names_element(&template.template, &template.sink) {
            errors.push(ValidationError::MissingSink {
                template_type: template.pipeline_type.clone(),
                sink: template.sink.clone(),
            });
        }

        for (parameter, spec) in &template.parameters {
            if matches!(spec.element.as_deref(), Some(element) if element.trim().is_empty()) {
                errors.push(ValidationError::EmptyElementBinding {
                    template_type: template.pipeline_type.clone(),
                    parameter: parameter.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// True if the description contains a `name=<element>` property.
fn names_element(description: &str, element: &str) -> bool {
    description
        .split(|c: char| c.is_whitespace() || c == '!')
        .filter_map(|token| token.strip_prefix("name="))
        .any(|name| name.trim_matches(|c: char| c == '"' || c == '\'') == element)
}
