//! Configuration loading and management for the overtime ledger engine.
//!
//! This module loads the overtime policy (buffer band, daily maximum,
//! allocation mode) from a YAML file.
//!
//! # Example
//!
//! ```no_run
//! use overtime_ledger::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("Allocation mode: {:?}", config.policy().allocation_mode);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{AllocationMode, DEFAULT_BUFFER_HOURS, DEFAULT_MAX_DAILY_HOURS, PolicyConfig};
