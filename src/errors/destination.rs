// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::time::Duration;
use thiserror::Error;

/// Errors from creating or delivering to an analytics destination.
#[derive(Error, Debug)]
pub enum DestinationError {
    #[error("Unsupported destination type: {0}")]
    UnsupportedType(String),

    #[error("Invalid destination spec: {0}")]
    InvalidSpec(String),

    #[error("Destination I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Destination send timed out after {0:?}")]
    Timeout(Duration),

    #[error("Destination rejected record: {0}")]
    Rejected(String),
}
