//! Per-entry-point load failures.

use crate::core::Error;
use crate::plugin::interface::PluginError;
use thiserror::Error;

/// Why a single entry point failed to produce a registered plugin.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("No module named '{module}'")]
    ModuleNotFound { module: String },

    #[error("Error while importing module '{module}': {source}")]
    ModuleInit { module: String, source: PluginError },

    #[error("module '{module}' has no attribute '{attr}'")]
    AttributeNotFound { module: String, attr: String },

    #[error("Failed to construct plugin {class}: {source}")]
    Construction { class: String, source: PluginError },

    #[error("Plugin {plugin} failed to load: {source}")]
    OnLoad { plugin: String, source: PluginError },

    #[error(transparent)]
    Plugin(#[from] Error),
}
