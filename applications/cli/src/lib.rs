//! Cadence command line
//!
//! Terminal front end over the Cadence libraries: catalog browsing, offline
//! downloads, and a player driven by a simulated engine.

pub mod commands;
pub mod config;
pub mod engine;
pub mod error;

pub use config::CliConfig;
pub use engine::SimulatedEngine;
pub use error::{CliError, Result};
