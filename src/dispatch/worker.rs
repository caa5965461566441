// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::dispatch::{DispatchQueue, DispatchStats};
use crate::errors::DestinationError;
use crate::observability::messages::dispatch::{DestinationSendFailed, DispatchFinished};
use crate::observability::messages::StructuredLog;
use crate::traits::Destination;
use std::sync::Arc;
use std::time::Duration;

/// Drains a [`DispatchQueue`] into a [`Destination`].
///
/// Returned by `PipelineInstance::start` when the request names a destination.
/// The caller decides where it runs, typically `tokio::spawn(worker.run())`.
/// It finishes once the pipeline tears down and the queue is drained.
#[must_use = "the worker does nothing until `run` is awaited or spawned"]
pub struct DispatchWorker {
    queue: DispatchQueue,
    destination: Arc<dyn Destination>,
    send_timeout: Duration,
}

impl DispatchWorker {
    pub fn new(
        queue: DispatchQueue,
        destination: Arc<dyn Destination>,
        send_timeout: Duration,
    ) -> Self {
        Self {
            queue,
            destination,
            send_timeout,
        }
    }

    pub fn queue(&self) -> &DispatchQueue {
        &self.queue
    }

    /// Deliver records until the queue closes, then close the destination.
    ///
    /// Send failures are logged and counted; they never stop the loop.
    pub async fn run(self) -> DispatchStats {
        while let Some(record) = self.queue.pop().await {
            let outcome =
                match tokio::time::timeout(self.send_timeout, self.destination.send(&record)).await
                {
                    Ok(result) => result,
                    Err(_) => Err(DestinationError::Timeout(self.send_timeout)),
                };

            if let Err(error) = &outcome {
                self.log_failure(error);
            }
            self.queue.record_outcome(outcome.is_ok());
        }

        if let Err(error) = self.destination.close().await {
            self.log_failure(&error);
        }

        let stats = self.queue.stats();
        DispatchFinished {
            pipeline_id: self.queue.pipeline_id(),
            stats: &stats,
        }
        .log();
        stats
    }

    fn log_failure(&self, error: &DestinationError) {
        DestinationSendFailed {
            pipeline_id: self.queue.pipeline_id(),
            destination: self.destination.name(),
            error,
        }
        .log();
    }
}
