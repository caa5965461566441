// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::MODELS_KEY;
use crate::errors::PipelineError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A caller's pipeline request.
///
/// Besides the well-known fields, any other top-level keys (`source`, ...) are
/// kept in `extra` and are visible to the template renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineRequest {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub pipeline_type: Option<String>,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PipelineRequest {
    /// Parse a raw request payload.
    ///
    /// A caller-supplied `models` entry is discarded: the model registry is
    /// owned by the service and injected only at render time.
    pub fn from_value(value: Value) -> Result<Self, PipelineError> {
        if !value.is_object() {
            return Err(PipelineError::InvalidRequest(format!(
                "request must be a JSON object, got {}",
                json_type_name(&value)
            )));
        }

        let mut request: PipelineRequest = serde_json::from_value(value)
            .map_err(|e| PipelineError::InvalidRequest(e.to_string()))?;
        request.extra.remove(MODELS_KEY);
        Ok(request)
    }

    /// The object templates are rendered against: the request itself plus the
    /// model registry under `models`.
    pub fn render_context(&self, models: &Value) -> Value {
        let mut context = self.extra.clone();
        if let Some(pipeline_type) = &self.pipeline_type {
            context.insert("type".to_string(), Value::String(pipeline_type.clone()));
        }
        context.insert(
            "parameters".to_string(),
            Value::Object(self.parameters.clone()),
        );
        if let Some(tags) = &self.tags {
            context.insert("tags".to_string(), Value::Object(tags.clone()));
        }
        if let Some(destination) = &self.destination {
            context.insert("destination".to_string(), destination.clone());
        }
        context.insert(MODELS_KEY.to_string(), models.clone());
        Value::Object(context)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
