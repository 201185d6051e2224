//! Application state for the overtime ledger API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::batch::Engine;
use crate::config::ConfigLoader;
use crate::ledger::SequenceCounter;

/// The engine together with the leave-id counter it issues from.
#[derive(Debug, Default)]
pub struct Workspace {
    /// Ledger, leave book and policy.
    pub engine: Engine,
    /// Leave-id sequences for requests arriving over HTTP.
    pub leave_counter: SequenceCounter,
}

/// Shared application state.
///
/// All engine access goes through one mutex, so there is a single writer.
/// The configuration is the engine's own, so `/segment` and `/credits`
/// always segment under the same policy.
#[derive(Clone)]
pub struct AppState {
    /// The loaded policy configuration.
    config: Arc<ConfigLoader>,
    workspace: Arc<Mutex<Workspace>>,
}

impl AppState {
    /// Creates a new application state with an empty engine under the loaded policy.
    pub fn new(config: ConfigLoader) -> Self {
        Self::with_engine(Engine::new(config))
    }

    /// Creates application state around an existing engine, e.g. one hydrated from storage.
    pub fn with_engine(engine: Engine) -> Self {
        Self {
            config: Arc::new(engine.config().clone()),
            workspace: Arc::new(Mutex::new(Workspace {
                engine,
                leave_counter: SequenceCounter::default(),
            })),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Locks the workspace, recovering a poisoned lock.
    pub fn workspace(&self) -> MutexGuard<'_, Workspace> {
        self.workspace
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
