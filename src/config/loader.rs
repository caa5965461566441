// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{
    DEFAULT_QUEUE_CAPACITY, DEFAULT_SEND_TIMEOUT_MS, DEFAULT_SINK_ELEMENT,
    DEFAULT_TAGGING_ELEMENT,
};
use crate::dispatch::OverflowPolicy;
use crate::errors::ConfigError;
use crate::observability::messages::validation::{ConfigLoaded, TemplateInvalid};
use crate::observability::messages::StructuredLog;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Service-level configuration for the analytics pipeline runtime.
///
/// Holds every pipeline template the service can instantiate, the dispatch
/// settings shared by all instances, and the model registry injected into
/// templates at render time.
///
/// # Fields
/// * `templates` - Pipeline templates, looked up by their `type`
/// * `dispatch` - Dispatch queue and destination timeouts (optional)
/// * `models` - Model registry exposed to templates as `{models[...]}` (optional)
///
/// # Example
/// ```yaml
/// templates:
///   - type: object_detection
///     template: "urisourcebin uri={source[uri]} ! detect threshold={parameters[threshold]} ! appsink name=appsink"
///     parameters:
///       threshold:
///         default: 0.5
/// dispatch:
///   queue_capacity: 32
///   overflow: drop_oldest
///   send_timeout_ms: 1000
/// models:
///   person_detection:
///     "1":
///       network: /models/person-detection/1/FP32/model.xml
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub templates: Vec<PipelineTemplate>,
    #[serde(default)]
    pub dispatch: DispatchOptions,
    #[serde(default)]
    pub models: Value,
}

impl ServiceConfig {
    /// Find the template registered for a pipeline type
    pub fn template(&self, pipeline_type: &str) -> Option<&PipelineTemplate> {
        self.templates
            .iter()
            .find(|t| t.pipeline_type == pipeline_type)
    }
}

/// A parameterized pipeline description and its parameter schema.
///
/// # Fields
/// * `pipeline_type` - Name requests use to select this template (`type` in config)
/// * `template` - Description with `{placeholder}` fields
/// * `parameters` - Parameter schema: name -> default and/or bound element
/// * `sink` - Element the per-unit callback is attached to
/// * `tagging_element` - Element that receives request tags
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PipelineTemplate {
    #[serde(rename = "type")]
    pub pipeline_type: String,
    pub template: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterSpec>,
    #[serde(default = "default_sink")]
    pub sink: String,
    #[serde(default = "default_tagging_element")]
    pub tagging_element: String,
}

impl PipelineTemplate {
    /// Template with no parameters and the default sink and tagging element.
    pub fn new(pipeline_type: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            pipeline_type: pipeline_type.into(),
            template: template.into(),
            parameters: BTreeMap::new(),
            sink: default_sink(),
            tagging_element: default_tagging_element(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, spec: ParameterSpec) -> Self {
        self.parameters.insert(name.into(), spec);
        self
    }
}

/// Schema entry for one template parameter.
///
/// A parameter with an `element` is also applied as a property of that
/// element after the graph is built.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ParameterSpec {
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub element: Option<String>,
}

impl ParameterSpec {
    pub fn with_default(default: Value) -> Self {
        Self {
            default: Some(default),
            element: None,
        }
    }

    pub fn bound_to(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }
}

/// Settings for the queue between the unit callback and the destination.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DispatchOptions {
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    #[serde(default)]
    pub overflow: OverflowPolicy,
    #[serde(default = "default_send_timeout_ms")]
    pub send_timeout_ms: u64,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            overflow: OverflowPolicy::default(),
            send_timeout_ms: DEFAULT_SEND_TIMEOUT_MS,
        }
    }
}

impl DispatchOptions {
    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }
}

fn default_sink() -> String {
    DEFAULT_SINK_ELEMENT.to_string()
}

fn default_tagging_element() -> String {
    DEFAULT_TAGGING_ELEMENT.to_string()
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

fn default_send_timeout_ms() -> u64 {
    DEFAULT_SEND_TIMEOUT_MS
}

/// Load a config from a YAML (`.yaml`/`.yml`) or TOML (`.toml`) file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ServiceConfig, ConfigError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let content = fs::read_to_string(path)?;
    let cfg: ServiceConfig = match extension.as_deref() {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        Some("toml") => toml::from_str(&content)?,
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };
    Ok(cfg)
}

/// Load a config and validate its templates
///
/// Every validation problem is logged and returned together.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<ServiceConfig, ConfigError> {
    let cfg = load_config(path.as_ref())?;

    if let Err(validation_errors) = crate::config::validate_templates(&cfg.templates) {
        for error in &validation_errors {
            TemplateInvalid { error }.log();
        }
        return Err(ConfigError::Validation(validation_errors));
    }

    ConfigLoaded {
        path: &path.as_ref().display().to_string(),
        template_count: cfg.templates.len(),
    }
    .log();

    Ok(cfg)
}
