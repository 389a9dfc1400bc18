//! Harvest CLI support: configuration and session persistence
//!
//! The binary in `main.rs` wires these to the dashboard flows.

pub mod config;
pub mod error;
pub mod session;

pub use config::CliConfig;
pub use error::{CliError, Result};
pub use session::SessionFile;
