//! Campus Common Library
//!
//! Shared error handling and logging initialization for the campus workspace.
//!
//! # Example
//!
//! ```no_run
//! use campus_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     init_logging(&config)?;
//!     tracing::info!("started");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{CampusError, Result};
