//! Plugin manager.
//!
//! Drives discovery (scan, resolve, validate, instantiate, register) and
//! feature integration. Both steps run at most once per manager.

use crate::core::{Error, PluginConfig, Result, Settings};
use crate::dist::{
    entry_points_with_dist, Distribution, DistributionSource, EntryPoint, ManifestDirectory,
};
use crate::plugin::error::LoadError;
use crate::plugin::features::{make_namespace, FeatureTable, Namespace};
use crate::plugin::interface::{EntryPointSource, Export, PluginSource};
use crate::plugin::module::ModuleTable;
use crate::plugin::registry::{LoadedPlugin, PluginInfo, PluginRegistry};
use crate::plugin::validator::is_valid_plugin;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// What happened to an entry point that loaded without error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    /// A plugin was instantiated and registered
    Registered,
    /// The object is not a plugin type, or that type is already registered
    Skipped,
}

/// Result of loading a single entry point.
#[derive(Debug)]
pub struct EntryPointOutcome {
    /// The entry point
    pub entry_point: EntryPoint,
    /// Name of the distribution declaring it
    pub distribution: String,
    /// Load result
    pub result: std::result::Result<LoadStatus, LoadError>,
}

impl EntryPointOutcome {
    /// Whether a plugin was registered.
    pub fn is_registered(&self) -> bool {
        matches!(self.result, Ok(LoadStatus::Registered))
    }

    /// Whether the entry point failed.
    pub fn is_error(&self) -> bool {
        self.result.is_err()
    }
}

/// Snapshot of the manager state for diagnostics.
#[derive(Clone, Debug, Serialize)]
pub struct Diagnostics {
    /// Registered plugins
    pub plugins: Vec<PluginInfo>,
    /// Failing entry point modules
    pub import_errors: BTreeMap<String, String>,
    /// Published namespace names
    pub namespaces: Vec<String>,
}

impl Diagnostics {
    /// Format as JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Plugin manager.
pub struct PluginManager {
    /// Discovery settings
    config: PluginConfig,
    /// Installed distributions
    distributions: Box<dyn DistributionSource>,
    /// Modules entry points resolve against
    modules: ModuleTable,
    /// Registered plugins and load errors
    registry: PluginRegistry,
    /// Feature namespaces
    features: FeatureTable,
}

impl PluginManager {
    /// Create a manager over the given distributions and modules.
    pub fn new(
        config: PluginConfig,
        distributions: Box<dyn DistributionSource>,
        modules: ModuleTable,
    ) -> Self {
        Self {
            config,
            distributions,
            modules,
            registry: PluginRegistry::new(),
            features: FeatureTable::new(),
        }
    }

    /// Manager reading manifests from the configured search paths and
    /// resolving against all linked modules.
    pub fn from_config(config: PluginConfig) -> Self {
        let distributions = ManifestDirectory::new(config.search_paths.clone());
        Self::new(config, Box::new(distributions), ModuleTable::linked())
    }

    /// Manager built from default settings plus environment overrides.
    ///
    /// An invalid override is logged and skipped; the valid ones still apply.
    pub fn from_env() -> Self {
        let mut settings = Settings::default();
        if let Err(e) = settings.apply_env() {
            warn!(error = %e, "Ignoring invalid environment override");
        }
        Self::from_config(settings.plugins)
    }

    /// Discovery settings.
    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Module table, for registering modules before loading.
    pub fn modules_mut(&mut self) -> &mut ModuleTable {
        &mut self.modules
    }

    /// Plugin registry.
    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Registered plugins; `None` before loading.
    pub fn plugins(&self) -> Option<&[LoadedPlugin]> {
        self.registry.plugins()
    }

    /// Failing entry point modules and their error messages.
    pub fn import_errors(&self) -> &HashMap<String, String> {
        self.registry.import_errors()
    }

    /// Built namespaces; `None` before integration.
    pub fn namespaces(&self) -> Option<&[Arc<Namespace>]> {
        self.features.namespaces()
    }

    /// Resolve a published namespace by dotted name.
    pub fn namespace(&self, name: &str) -> Option<Arc<Namespace>> {
        self.features.resolve(name)
    }

    /// Namespace published for a plugin.
    pub fn features_of(&self, plugin_name: &str) -> Option<Arc<Namespace>> {
        self.namespace(&format!("{}.{}", self.config.features_prefix, plugin_name))
    }

    /// Current state, for diagnostics.
    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            plugins: self.registry.list_plugins(),
            import_errors: self
                .import_errors()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            namespaces: self.features.published_names(),
        }
    }

    /// Load plugins unless a load already happened.
    pub fn ensure_plugins_loaded(&mut self) {
        if self.registry.is_loaded() {
            debug!("Plugins are already loaded. Skipping.");
            return;
        }

        self.registry.initialize();
        let outcomes = self.load_entrypoint_plugins();
        info!(
            registered = outcomes.iter().filter(|o| o.is_registered()).count(),
            failed = outcomes.iter().filter(|o| o.is_error()).count(),
            "Loaded entry point plugins"
        );
    }

    /// Load and register plugin types from every entry point in the group.
    ///
    /// Failures are isolated per entry point: each one is logged, recorded
    /// in the import error map under the entry point's module, and the scan
    /// moves on.
    pub fn load_entrypoint_plugins(&mut self) -> Vec<EntryPointOutcome> {
        let Self {
            config,
            distributions,
            modules,
            registry,
            ..
        } = self;

        debug!(group = %config.group, "Loading plugins from entrypoints");
        let mut outcomes = Vec::new();

        for (entry_point, dist) in entry_points_with_dist(&**distributions, &config.group) {
            debug!(entry_point = %entry_point.name, "Importing entry_point plugin");

            let result = load_entry_point(modules, registry, &entry_point, &dist);
            if let Err(e) = &result {
                error!(entry_point = %entry_point.name, error = %e, "Failed to import plugin");
                registry.record_import_error(entry_point.module(), e.to_string());
            }

            outcomes.push(EntryPointOutcome {
                entry_point,
                distribution: dist.name.clone(),
                result,
            });
        }

        outcomes
    }

    /// Build and publish one feature namespace per plugin, once.
    ///
    /// Loads plugins first if needed. A registered plugin with an empty name
    /// aborts the whole step; namespaces published before it stay published
    /// and later calls are no-ops.
    pub fn integrate_feature_plugins(&mut self) -> Result<()> {
        if self.features.is_integrated() {
            return Ok(());
        }
        self.ensure_plugins_loaded();

        let plugins = self.registry.plugins().ok_or(Error::PluginsNotLoaded)?;

        debug!("Integrate feature plugins");
        self.features.begin();
        for loaded in plugins {
            let name = loaded.name();
            if name.is_empty() {
                return Err(Error::InvalidPluginName);
            }

            let qualified = format!("{}.{}", self.config.features_prefix, name);
            if let Some(namespace) = make_namespace(&qualified, loaded.plugin().features()) {
                self.features.publish(namespace);
            }
        }

        Ok(())
    }
}

fn load_entry_point(
    modules: &mut ModuleTable,
    registry: &mut PluginRegistry,
    entry_point: &EntryPoint,
    dist: &Distribution,
) -> std::result::Result<LoadStatus, LoadError> {
    let candidate = modules.resolve(entry_point)?;
    if !is_valid_plugin(registry, &candidate)? {
        debug!(entry_point = %entry_point.name, kind = candidate.kind(), "Skipping entry point");
        return Ok(LoadStatus::Skipped);
    }
    let Export::Plugin(class) = candidate else {
        return Ok(LoadStatus::Skipped);
    };

    let plugin = class
        .instantiate()
        .map_err(|source| LoadError::Construction {
            class: class.type_name().to_string(),
            source,
        })?;
    let source = PluginSource::EntryPoint(EntryPointSource::new(entry_point, dist));
    registry.register(LoadedPlugin::new(plugin, class, source))?;

    Ok(LoadStatus::Registered)
}
