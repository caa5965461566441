// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Hand-off between the unit callback and a destination.
//!
//! The unit callback runs on an engine thread and must never wait on the
//! network or a disk. It pushes records into a bounded [`DispatchQueue`]; a
//! [`DispatchWorker`] running on the caller's async runtime drains the queue
//! and performs the sends.
//!
//! ```text
//! engine thread                       async runtime
//! FrameProcessor --push--> [ queue ] --pop--> DispatchWorker --send--> Destination
//! ```

pub mod queue;
pub mod worker;

pub use queue::{DispatchQueue, DispatchStats, OverflowPolicy};
pub use worker::DispatchWorker;
