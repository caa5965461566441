// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::observability::messages::dispatch::RecordDropped;
use crate::observability::messages::StructuredLog;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Notify;

/// What to discard when a record arrives at a full queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Discard the incoming record.
    DropNewest,
    /// Discard the oldest queued record to make room.
    #[default]
    DropOldest,
}

/// Delivery counters for one pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchStats {
    /// Records accepted into the queue.
    pub queued: u64,
    /// Records discarded on overflow.
    pub dropped: u64,
    pub delivered: u64,
    /// Sends that errored or timed out.
    pub failed: u64,
}

struct QueueState {
    records: VecDeque<Value>,
    closed: bool,
    stats: DispatchStats,
}

struct Inner {
    pipeline_id: String,
    capacity: usize,
    policy: OverflowPolicy,
    state: Mutex<QueueState>,
    notify: Notify,
}

/// Bounded multi-producer, single-consumer record queue.
///
/// `push` never blocks. `pop` waits until a record arrives or the queue is
/// closed and drained.
#[derive(Clone)]
pub struct DispatchQueue {
    inner: Arc<Inner>,
}

impl DispatchQueue {
    pub fn new(pipeline_id: impl Into<String>, capacity: usize, policy: OverflowPolicy) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(Inner {
                pipeline_id: pipeline_id.into(),
                capacity,
                policy,
                state: Mutex::new(QueueState {
                    records: VecDeque::with_capacity(capacity),
                    closed: false,
                    stats: DispatchStats::default(),
                }),
                notify: Notify::new(),
            }),
        }
    }

    /// Enqueue a record. Returns `false` if the record itself was not kept,
    /// either because the queue is closed or because it was dropped on overflow.
    pub fn push(&self, record: Value) -> bool {
        let (accepted, dropped_total) = {
            let mut state = self.inner.state.lock();
            if state.closed {
                return false;
            }

            if state.records.len() < self.inner.capacity {
                state.records.push_back(record);
                state.stats.queued += 1;
                (true, None)
            } else {
                state.stats.dropped += 1;
                let dropped_total = Some(state.stats.dropped);
                match self.inner.policy {
                    OverflowPolicy::DropNewest => (false, dropped_total),
                    OverflowPolicy::DropOldest => {
                        state.records.pop_front();
                        state.records.push_back(record);
                        state.stats.queued += 1;
                        (true, dropped_total)
                    }
                }
            }
        };

        if let Some(dropped_total) = dropped_total {
            RecordDropped {
                pipeline_id: &self.inner.pipeline_id,
                policy: self.inner.policy,
                dropped_total,
            }
            .log();
        }
        if accepted {
            self.inner.notify.notify_one();
        }
        accepted
    }

    /// Next record, or `None` once the queue is closed and empty.
    pub async fn pop(&self) -> Option<Value> {
        loop {
            {
                let mut state = self.inner.state.lock();
                if let Some(record) = state.records.pop_front() {
                    return Some(record);
                }
                if state.closed {
                    return None;
                }
            }
            self.inner.notify.notified().await;
        }
    }

    /// Stop accepting records. Already queued records are still handed out.
    pub fn close(&self) {
        {
            let mut state = self.inner.state.lock();
            if state.closed {
                return;
            }
            state.closed = true;
        }
        self.inner.notify.notify_one();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.state.lock().closed
    }

    pub fn len(&self) -> usize {
        self.inner.state.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> DispatchStats {
        self.inner.state.lock().stats
    }

    pub fn pipeline_id(&self) -> &str {
        &self.inner.pipeline_id
    }

    pub(crate) fn record_outcome(&self, delivered: bool) {
        let mut state = self.inner.state.lock();
        if delivered {
            state.stats.delivered += 1;
        } else {
            state.stats.failed += 1;
        }
    }
}
