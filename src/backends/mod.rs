// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Graph adapter backends.
//!
//! ## Simulated Backend
//! An in-process engine that parses `factory prop=value ! factory name=x`
//! descriptions into named elements and lets the owner drive the bus by hand:
//! - **Events**: state changes, end-of-stream and errors via [`SimulatedGraph::emit`]
//! - **Units**: processed units via [`SimulatedGraph::push_unit`]
//! - **Faults**: failing builds, property rejections, refused `PLAYING`
//! - **Use Case**: the CLI demo and lifecycle tests
//!
//! # Example
//! ```rust
//! use analytics_pipeline::backends::SimulatedEngine;
//! use analytics_pipeline::traits::Engine;
//!
//! let engine = SimulatedEngine::new();
//! let graph = engine.build("videotestsrc ! appsink name=appsink").unwrap();
//! assert!(graph.find_element("appsink").is_some());
//! assert!(graph.find_element("videotestsrc0").is_some());
//! ```

pub mod simulated;

pub use simulated::{SimulatedElement, SimulatedEngine, SimulatedGraph, SimulatedUnit};
