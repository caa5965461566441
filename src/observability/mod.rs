// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Diagnostic and operational log lines are built from message structs that
//! implement `Display` plus [`messages::StructuredLog`], so that the text of a
//! log line and its structured fields are defined in one place.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::lifecycle` - pipeline start, state transitions, teardown
//! * `messages::frame` - per-unit metadata handling
//! * `messages::dispatch` - destination creation and delivery
//! * `messages::engine` - process-wide engine setup and teardown
//! * `messages::validation` - configuration validation
//!
//! # Usage
//!
//! ```rust
//! use analytics_pipeline::observability::messages::StructuredLog;
//! use analytics_pipeline::observability::messages::lifecycle::PipelineStarting;
//!
//! let msg = PipelineStarting {
//!     pipeline_id: "42",
//!     pipeline_type: "object_detection",
//! };
//!
//! msg.log();
//! ```

pub mod messages;
