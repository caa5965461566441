// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Bundled destinations and the factory that picks one from a request.
//!
//! A request selects its destination with a `destination` object:
//!
//! ```json
//! {"destination": {"type": "file", "path": "/var/log/analytics.jsonl", "format": "json-lines"}}
//! ```

pub mod file;

pub use file::FileDestination;

use crate::errors::DestinationError;
use crate::pipeline::PipelineRequest;
use crate::traits::{Destination, DestinationFactory};
use serde_json::Value;
use std::sync::Arc;

/// Builds the destinations shipped with this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDestinationFactory;

impl DestinationFactory for DefaultDestinationFactory {
    fn create(
        &self,
        request: &PipelineRequest,
    ) -> Result<Option<Arc<dyn Destination>>, DestinationError> {
        let Some(spec) = &request.destination else {
            return Ok(None);
        };
        let Some(spec) = spec.as_object() else {
            return Err(DestinationError::InvalidSpec(
                "destination must be an object".to_string(),
            ));
        };

        match spec.get("type").and_then(Value::as_str) {
            Some("file") => Ok(Some(Arc::new(FileDestination::from_spec(spec)?))),
            Some(other) => Err(DestinationError::UnsupportedType(other.to_string())),
            None => Err(DestinationError::InvalidSpec(
                "destination is missing 'type'".to_string(),
            )),
        }
    }
}
