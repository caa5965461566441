// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod destination;
mod engine;
mod pipeline;

pub use config::{ConfigError, ValidationError};
pub use destination::DestinationError;
pub use engine::EngineError;
pub use pipeline::{PipelineError, RenderError};
