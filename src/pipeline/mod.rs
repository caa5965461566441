// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Lifecycle of a single analytics pipeline instance.
//!
//! `start` resolves the request against its template, renders the concrete
//! description, builds the graph and hands it to the engine. From then on the
//! engine drives two callbacks on its own threads: bus events feed the state
//! machine in [`state`], processed units feed the [`frame`] processor. Callers
//! poll [`PipelineInstance::status`] and [`PipelineInstance::params`] at any time.

pub mod frame;
pub mod instance;
pub mod params;
pub mod render;
pub mod request;
pub mod state;
pub mod status;

#[cfg(test)]
mod integration_tests;

pub use frame::{FrameProcessor, ThroughputSnapshot};
pub use instance::{PipelineBuilder, PipelineInstance};
pub use params::{element_bindings, resolve_parameters, resolve_request, ElementBinding};
pub use render::render;
pub use request::PipelineRequest;
pub use state::{PipelineState, Trigger};
pub use status::{PipelineParams, PipelineStatus};
