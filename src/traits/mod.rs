// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod destination;
pub mod graph;

pub use destination::{Destination, DestinationFactory};
pub use graph::{
    Element, Engine, EventCallback, EventOrigin, FlowReturn, Graph, GraphEvent, GraphState,
    ProcessedUnit, UnitCallback,
};
