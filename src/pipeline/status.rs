// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::pipeline::{PipelineRequest, PipelineState};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Point-in-time view of a pipeline, as returned by `status()` and `stop()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineStatus {
    pub id: String,
    pub state: PipelineState,
    pub avg_fps: f64,
    pub start_time: DateTime<Utc>,
    /// Seconds from start to stop, or to now while no stop time is recorded.
    pub elapsed_time: f64,
}

/// What a pipeline was started with, as returned by `params()`.
///
/// Owned copies: changing these never reaches the instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineParams {
    pub id: String,
    pub request: PipelineRequest,
    #[serde(rename = "type")]
    pub pipeline_type: String,
    pub launch_command: String,
}
