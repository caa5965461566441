// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pipeline states and the transition table.
//!
//! ```text
//! UNSTARTED --playing--> RUNNING
//! UNSTARTED | RUNNING --eos------> COMPLETED
//! UNSTARTED | RUNNING --failure--> ERROR
//!             RUNNING --stop-----> ABORTED
//! ```
//!
//! A stop before the graph reports `PLAYING` leaves the state UNSTARTED.
//! Terminal states never change again.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineState {
    #[default]
    Unstarted,
    Running,
    Completed,
    Error,
    Aborted,
}

/// What drives a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The graph itself went from Paused to Playing.
    Playing,
    EndOfStream,
    /// Error posted on the bus, or the graph refused to play.
    Failure,
    /// Explicit `stop()` from the caller.
    Stop,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Playing => "playing",
            Trigger::EndOfStream => "eos",
            Trigger::Failure => "error",
            Trigger::Stop => "stop",
        }
    }
}

impl PipelineState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PipelineState::Completed | PipelineState::Error | PipelineState::Aborted
        )
    }

    /// The state `trigger` leads to, or `None` if it changes nothing.
    pub fn on(self, trigger: Trigger) -> Option<PipelineState> {
        use PipelineState::*;

        match (self, trigger) {
            (Unstarted, Trigger::Playing) => Some(Running),
            (Unstarted | Running, Trigger::EndOfStream) => Some(Completed),
            (Unstarted | Running, Trigger::Failure) => Some(Error),
            (Running, Trigger::Stop) => Some(Aborted),
            _ => None,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Unstarted => "UNSTARTED",
            PipelineState::Running => "RUNNING",
            PipelineState::Completed => "COMPLETED",
            PipelineState::Error => "ERROR",
            PipelineState::Aborted => "ABORTED",
        };
        f.write_str(name)
    }
}
