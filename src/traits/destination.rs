// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::errors::DestinationError;
use crate::pipeline::PipelineRequest;

/// Sink for per-frame analytics records.
#[async_trait]
pub trait Destination: Send + Sync {
    async fn send(&self, record: &Value) -> Result<(), DestinationError>;

    /// Flush and release transport resources. Best effort.
    async fn close(&self) -> Result<(), DestinationError> {
        Ok(())
    }

    fn name(&self) -> &'static str;
}

/// Builds the destination a request asks for.
///
/// `Ok(None)` means the request did not ask for one.
pub trait DestinationFactory: Send + Sync {
    fn create(
        &self,
        request: &PipelineRequest,
    ) -> Result<Option<Arc<dyn Destination>>, DestinationError>;
}
