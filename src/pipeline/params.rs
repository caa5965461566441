// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Parameter resolution: caller values layered over template defaults.

use crate::config::{ParameterSpec, PipelineTemplate};
use crate::errors::PipelineError;
use crate::pipeline::PipelineRequest;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A resolved parameter that must also be applied as an element property.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementBinding {
    pub element: String,
    pub property: String,
    pub value: Value,
}

/// Fill schema defaults into the caller's parameters.
///
/// Caller values always win. Keys the schema does not know are passed through
/// untouched; a malformed key surfaces later as a render failure.
pub fn resolve_parameters(
    supplied: &Map<String, Value>,
    schema: &BTreeMap<String, ParameterSpec>,
) -> Map<String, Value> {
    let mut resolved = supplied.clone();
    for (name, spec) in schema {
        if resolved.contains_key(name) {
            continue;
        }
        if let Some(default) = &spec.default {
            resolved.insert(name.clone(), default.clone());
        }
    }
    resolved
}

/// Parse a raw request and resolve its parameters against the template.
pub fn resolve_request(
    raw: Value,
    template: &PipelineTemplate,
) -> Result<PipelineRequest, PipelineError> {
    let mut request = PipelineRequest::from_value(raw)?;
    request.parameters = resolve_parameters(&request.parameters, &template.parameters);
    Ok(request)
}

/// Parameters bound to a named element that have a resolved value.
pub fn element_bindings(
    parameters: &Map<String, Value>,
    schema: &BTreeMap<String, ParameterSpec>,
) -> Vec<ElementBinding> {
    schema
        .iter()
        .filter_map(|(name, spec)| {
            let element = spec.element.as_ref()?;
            let value = parameters.get(name)?;
            Some(ElementBinding {
                element: element.clone(),
                property: name.clone(),
                value: value.clone(),
            })
        })
        .collect()
}
