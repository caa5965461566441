// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;     // graph adapter backends
pub mod config;       // templates + service config
pub mod destinations; // analytics sinks
pub mod dispatch;     // callback -> destination hand-off
pub mod engine;       // process-wide engine runtime
pub mod errors;       // error handling
pub mod observability;
pub mod pipeline;     // instance lifecycle
pub mod traits;       // engine and destination abstractions
