// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-unit callback: metadata extraction, dispatch and throughput.
//!
//! Runs on the engine's unit-notification thread. Nothing in here may block
//! on the destination or let a failure escape into the engine.

use crate::config::consts::OBJECTS_KEY;
use crate::dispatch::DispatchQueue;
use crate::observability::messages::frame::{
    CallbackFault, NoUnitMetadata, UnitMetadataFailed, UnitMetadataReceived,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{FlowReturn, ProcessedUnit};
use parking_lot::Mutex;
use serde_json::Value;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

/// Frame counter and running average, always updated together.
#[derive(Debug, Default)]
pub(crate) struct Throughput {
    started: Option<Instant>,
    frame_count: u64,
    avg_fps: f64,
}

/// A consistent copy of the throughput pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThroughputSnapshot {
    pub frame_count: u64,
    pub avg_fps: f64,
}

impl Throughput {
    pub(crate) fn start(&mut self, at: Instant) {
        self.started = Some(at);
        self.frame_count = 0;
        self.avg_fps = 0.0;
    }

    pub(crate) fn record_frame(&mut self, now: Instant) {
        self.frame_count += 1;
        if let Some(started) = self.started {
            let elapsed = now.saturating_duration_since(started).as_secs_f64();
            if elapsed > 0.0 {
                self.avg_fps = self.frame_count as f64 / elapsed;
            }
        }
    }

    pub(crate) fn snapshot(&self) -> ThroughputSnapshot {
        ThroughputSnapshot {
            frame_count: self.frame_count,
            avg_fps: self.avg_fps,
        }
    }
}

/// Handles every processed unit of one pipeline.
pub struct FrameProcessor {
    pipeline_id: String,
    throughput: Arc<Mutex<Throughput>>,
    dispatch: Option<DispatchQueue>,
}

impl FrameProcessor {
    pub(crate) fn new(
        pipeline_id: String,
        throughput: Arc<Mutex<Throughput>>,
        dispatch: Option<DispatchQueue>,
    ) -> Self {
        Self {
            pipeline_id,
            throughput,
            dispatch,
        }
    }

    /// Process one unit. Always acknowledges with [`FlowReturn::Ok`].
    pub fn process(&self, unit: &dyn ProcessedUnit) -> FlowReturn {
        match panic::catch_unwind(AssertUnwindSafe(|| self.handle_metadata(unit))) {
            Ok(Ok(())) => {}
            Ok(Err(error)) => UnitMetadataFailed {
                pipeline_id: &self.pipeline_id,
                error: &error,
            }
            .log(),
            Err(payload) => CallbackFault {
                pipeline_id: &self.pipeline_id,
                reason: &panic_reason(payload.as_ref()),
            }
            .log(),
        }

        self.throughput.lock().record_frame(Instant::now());
        FlowReturn::Ok
    }

    fn handle_metadata(&self, unit: &dyn ProcessedUnit) -> Result<(), serde_json::Error> {
        let Some(bytes) = unit.payload() else {
            NoUnitMetadata {
                pipeline_id: &self.pipeline_id,
            }
            .log();
            return Ok(());
        };

        let record: Value = serde_json::from_slice(&bytes)?;
        let object_count = record
            .get(OBJECTS_KEY)
            .and_then(Value::as_array)
            .map_or(0, Vec::len);

        UnitMetadataReceived {
            pipeline_id: &self.pipeline_id,
            object_count,
            bytes: bytes.len(),
        }
        .log();

        if object_count > 0 {
            if let Some(queue) = &self.dispatch {
                queue.push(record);
            }
        }
        Ok(())
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
