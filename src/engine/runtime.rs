// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Process-wide engine initialization.
//!
//! Media engines usually need one global setup call before any graph can be
//! built. [`EngineRuntime`] makes that call explicit and guards it, so every
//! caller can ask for initialization without coordinating with the others.

use crate::errors::EngineError;
use crate::observability::messages::engine::{
    EngineAlreadyInitialized, EngineInitialized, EngineShutdown,
};
use crate::observability::messages::StructuredLog;
use crate::traits::Engine;
use parking_lot::Mutex;
use std::sync::Arc;

static GLOBAL: EngineRuntime = EngineRuntime::new();

/// Owns the initialized engine, if any.
pub struct EngineRuntime {
    engine: Mutex<Option<Arc<dyn Engine>>>,
}

impl EngineRuntime {
    pub const fn new() -> Self {
        Self {
            engine: parking_lot::const_mutex(None),
        }
    }

    /// The runtime shared by the whole process.
    pub fn global() -> &'static EngineRuntime {
        &GLOBAL
    }

    /// Initialize `engine` unless an engine is already initialized.
    ///
    /// Returns the engine in use, which is the earlier one on repeat calls.
    pub fn initialize(&self, engine: Arc<dyn Engine>) -> Result<Arc<dyn Engine>, EngineError> {
        let mut slot = self.engine.lock();
        if let Some(current) = slot.as_ref() {
            EngineAlreadyInitialized {
                engine: current.name(),
                requested: engine.name(),
            }
            .log();
            return Ok(current.clone());
        }

        engine.initialize()?;
        EngineInitialized {
            engine: engine.name(),
        }
        .log();
        *slot = Some(engine.clone());
        Ok(engine)
    }

    pub fn engine(&self) -> Option<Arc<dyn Engine>> {
        self.engine.lock().clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.lock().is_some()
    }

    /// Deinitialize the engine. No-op when nothing is initialized.
    pub fn shutdown(&self) {
        let Some(engine) = self.engine.lock().take() else {
            return;
        };
        engine.deinitialize();
        EngineShutdown {
            engine: engine.name(),
        }
        .log();
    }
}

impl Default for EngineRuntime {
    fn default() -> Self {
        Self::new()
    }
}
