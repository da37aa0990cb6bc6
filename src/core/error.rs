//! Error types for the plugin manager.

use thiserror::Error;

/// Result type alias for plugin manager operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in plugin manager operations.
#[derive(Error, Debug)]
pub enum Error {
    // Plugin errors
    #[error("Your plugin needs a name: {0}")]
    UnnamedPlugin(String),

    #[error("Invalid plugin name")]
    InvalidPluginName,

    #[error("Can't load plugins.")]
    PluginsNotLoaded,

    #[error("Plugin manager is busy running plugin code on this thread")]
    ReentrantAccess,

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid manifest {path}: {message}")]
    Manifest { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error is raised by the plugin lifecycle itself
    /// rather than by configuration or I/O.
    pub fn is_plugin_error(&self) -> bool {
        matches!(
            self,
            Error::UnnamedPlugin(_)
                | Error::InvalidPluginName
                | Error::PluginsNotLoaded
                | Error::ReentrantAccess
        )
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}
