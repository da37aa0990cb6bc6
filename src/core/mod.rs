//! Core utilities and common types for the plugin manager.

pub mod config;
pub mod error;
pub mod types;

pub use config::{PluginConfig, Settings};
pub use error::{Error, Result};
pub use types::*;
