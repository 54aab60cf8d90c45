//! archgraph core: shared error type and configuration.

pub mod config;
pub mod error;

pub use config::ScanLimits;
pub use error::{Error, Result};
