//! Monitoring Module
//!
//! Logging setup for hosts embedding the plugin manager.

pub mod logging;

pub use logging::{init_logging, LogFormat, LogLevel, LoggerConfig};
