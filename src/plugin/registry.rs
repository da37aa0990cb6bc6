//! Plugin registry.
//!
//! Ordered collection of instantiated plugins plus the diagnostic map of
//! entry point modules that failed to load. Plugins are never removed.

use crate::core::{now, Error, Result, Timestamp};
use crate::plugin::error::LoadError;
use crate::plugin::interface::{Plugin, PluginClass, PluginSource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

/// Summary of a registered plugin.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Plugin name
    pub name: String,
    /// Rust type implementing the plugin
    pub type_name: String,
    /// Provenance, e.g. `pkgA==1.0: alpha = pkg_a:Alpha`
    pub source: String,
    /// Registration time
    pub loaded_at: Timestamp,
}

/// Registered plugin entry.
pub struct LoadedPlugin {
    /// Plugin instance
    plugin: Box<dyn Plugin>,
    /// Type the instance was built from
    class: PluginClass,
    /// Where the plugin came from
    source: PluginSource,
    /// Registration time
    loaded_at: Timestamp,
}

impl LoadedPlugin {
    /// Wrap a freshly constructed plugin with its provenance.
    pub fn new(plugin: Box<dyn Plugin>, class: PluginClass, source: PluginSource) -> Self {
        Self {
            plugin,
            class,
            source,
            loaded_at: now(),
        }
    }

    /// Plugin name as reported by the instance.
    pub fn name(&self) -> &str {
        self.plugin.name()
    }

    /// Plugin instance.
    pub fn plugin(&self) -> &dyn Plugin {
        &*self.plugin
    }

    /// Type the instance was built from.
    pub fn class(&self) -> &PluginClass {
        &self.class
    }

    /// Provenance.
    pub fn source(&self) -> &PluginSource {
        &self.source
    }

    /// Registration time.
    pub fn loaded_at(&self) -> Timestamp {
        self.loaded_at
    }

    /// Serializable summary.
    pub fn info(&self) -> PluginInfo {
        PluginInfo {
            name: self.name().to_string(),
            type_name: self.class.type_name().to_string(),
            source: self.source.to_string(),
            loaded_at: self.loaded_at,
        }
    }
}

impl std::fmt::Debug for LoadedPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedPlugin")
            .field("name", &self.name())
            .field("class", &self.class.type_name())
            .field("source", &self.source.to_string())
            .field("loaded_at", &self.loaded_at)
            .finish()
    }
}

/// Plugin registry.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    /// Registered plugins; `None` until the first load attempt
    plugins: Option<Vec<LoadedPlugin>>,
    /// Failing entry point module -> error message
    import_errors: HashMap<String, String>,
}

impl PluginRegistry {
    /// Create a new, unloaded registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a load was started.
    pub fn is_loaded(&self) -> bool {
        self.plugins.is_some()
    }

    /// Start with an empty plugin list. No-op if already set.
    pub fn initialize(&mut self) {
        self.plugins.get_or_insert_with(Vec::new);
    }

    /// Whether a plugin built from this exact type is registered.
    pub fn contains_class(&self, class: &PluginClass) -> Result<bool> {
        let plugins = self.plugins.as_ref().ok_or(Error::PluginsNotLoaded)?;
        Ok(plugins.iter().any(|p| p.class() == class))
    }

    /// Run the plugin's load hook, then append it.
    pub fn register(&mut self, mut entry: LoadedPlugin) -> std::result::Result<(), LoadError> {
        let plugins = self.plugins.as_mut().ok_or(Error::PluginsNotLoaded)?;

        entry
            .plugin
            .on_load()
            .map_err(|source| LoadError::OnLoad {
                plugin: entry.name().to_string(),
                source,
            })?;

        info!(
            plugin.name = %entry.name(),
            plugin.source = %entry.source,
            "Registered plugin"
        );
        plugins.push(entry);
        Ok(())
    }

    /// Record a failed entry point, keyed by its module.
    pub fn record_import_error(&mut self, module: &str, message: String) {
        self.import_errors.insert(module.to_string(), message);
    }

    /// Registered plugins, in registration order.
    pub fn plugins(&self) -> Option<&[LoadedPlugin]> {
        self.plugins.as_deref()
    }

    /// First registered plugin with this name.
    pub fn get(&self, name: &str) -> Option<&LoadedPlugin> {
        self.plugins()?.iter().find(|p| p.name() == name)
    }

    /// Number of registered plugins.
    pub fn plugin_count(&self) -> usize {
        self.plugins().map_or(0, <[LoadedPlugin]>::len)
    }

    /// Summaries of all registered plugins.
    pub fn list_plugins(&self) -> Vec<PluginInfo> {
        self.plugins()
            .unwrap_or_default()
            .iter()
            .map(LoadedPlugin::info)
            .collect()
    }

    /// Failing entry point modules and their error messages.
    pub fn import_errors(&self) -> &HashMap<String, String> {
        &self.import_errors
    }
}
