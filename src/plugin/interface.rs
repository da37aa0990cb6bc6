//! Plugin interface definition.
//!
//! Defines the capability plugins implement, the class-level descriptor the
//! loader validates and instantiates, and the provenance attached to every
//! registered plugin.

use crate::core::{Error, Result};
use crate::dist::{Distribution, EntryPoint};
use crate::plugin::features::Feature;
use std::any::{Any, TypeId};
use std::sync::Arc;

/// Result type for plugin-provided operations.
pub type PluginResult<T> = std::result::Result<T, PluginError>;

/// Error raised by plugin code: constructors, module initializers, hooks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PluginError {
    /// Error message
    pub message: String,
}

impl PluginError {
    /// Create a new error.
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl std::fmt::Display for PluginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for PluginError {}

/// Plugin trait that all plugins must implement.
pub trait Plugin: Send + Sync + 'static {
    /// Plugin name, used for the feature namespace.
    fn name(&self) -> &str;

    /// Objects this plugin contributes to its feature namespace.
    fn features(&self) -> Vec<Feature> {
        Vec::new()
    }

    /// Called once, right before the plugin is registered.
    fn on_load(&mut self) -> PluginResult<()> {
        Ok(())
    }
}

/// Class-level side of a plugin: its declared name and no-argument constructor.
pub trait PluginType: Plugin + Sized {
    /// Declared plugin name. Must not be empty.
    const NAME: &'static str;

    /// Construct an instance.
    fn create() -> PluginResult<Self>;
}

fn construct<T: PluginType>() -> PluginResult<Box<dyn Plugin>> {
    Ok(Box::new(T::create()?))
}

/// Descriptor for a concrete plugin type.
///
/// Two descriptors are equal when they describe the same Rust type,
/// regardless of the declared name.
#[derive(Clone, Copy, Debug)]
pub struct PluginClass {
    type_id: TypeId,
    type_name: &'static str,
    name: &'static str,
    construct: fn() -> PluginResult<Box<dyn Plugin>>,
}

impl PluginClass {
    /// Describe a plugin type.
    pub fn of<T: PluginType>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            name: T::NAME,
            construct: construct::<T>,
        }
    }

    /// Declared plugin name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Rust type name of the plugin.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Class-level validation: the plugin must declare a name.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::UnnamedPlugin(self.type_name.to_string()));
        }
        Ok(())
    }

    /// Construct a new instance.
    pub fn instantiate(&self) -> PluginResult<Box<dyn Plugin>> {
        (self.construct)()
    }
}

impl PartialEq for PluginClass {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for PluginClass {}

/// An object an entry point can resolve to.
#[derive(Clone, Debug)]
pub enum Export {
    /// A concrete plugin type
    Plugin(PluginClass),
    /// The plugin capability itself, not an implementation of it
    PluginBase,
    /// A type that does not implement the plugin capability
    Class(&'static str),
    /// Any other value: instances, functions, constants
    Object(Arc<dyn Any + Send + Sync>),
    /// A whole module, for entry points without an attribute
    Module(String),
}

impl Export {
    /// Export a plugin type.
    pub fn plugin<T: PluginType>() -> Self {
        Export::Plugin(PluginClass::of::<T>())
    }

    /// Export a type that is not a plugin.
    pub fn class<T: ?Sized + 'static>() -> Self {
        Export::Class(std::any::type_name::<T>())
    }

    /// Export an arbitrary value.
    pub fn object<T: Any + Send + Sync>(value: T) -> Self {
        Export::Object(Arc::new(value))
    }

    /// Short description used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Export::Plugin(_) => "plugin",
            Export::PluginBase => "plugin base",
            Export::Class(_) => "class",
            Export::Object(_) => "object",
            Export::Module(_) => "module",
        }
    }
}

/// Provenance of a plugin loaded from an entry point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryPointSource {
    /// Distribution name
    pub dist: String,
    /// Distribution version
    pub version: String,
    /// Entry point descriptor (`name = module:attr`)
    pub entrypoint: String,
}

impl EntryPointSource {
    /// Build the source record for an entry point of a distribution.
    pub fn new(entry_point: &EntryPoint, dist: &Distribution) -> Self {
        Self {
            dist: dist.name.clone(),
            version: dist.version.clone(),
            entrypoint: entry_point.to_string(),
        }
    }
}

impl std::fmt::Display for EntryPointSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}=={}: {}", self.dist, self.version, self.entrypoint)
    }
}

/// Where a registered plugin came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PluginSource {
    /// Loaded from a distribution entry point
    EntryPoint(EntryPointSource),
}

impl std::fmt::Display for PluginSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginSource::EntryPoint(source) => write!(f, "{}", source),
        }
    }
}
