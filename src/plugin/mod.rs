//! Plugin Module
//!
//! Provides the plugin registration pipeline:
//! - Plugin interface and class descriptors
//! - Module table for entry point resolution
//! - Validation and registry
//! - Loading and feature integration
//! - Process-wide manager

pub mod error;
pub mod features;
pub mod global;
pub mod interface;
pub mod manager;
pub mod module;
pub mod registry;
pub mod validator;

pub use error::LoadError;
pub use features::{make_namespace, Feature, FeatureTable, Namespace};
pub use interface::{
    EntryPointSource, Export, Plugin, PluginClass, PluginError, PluginResult, PluginSource,
    PluginType,
};
pub use manager::{Diagnostics, EntryPointOutcome, LoadStatus, PluginManager};
pub use module::{Module, ModuleInit, ModuleTable, StaticModule};
pub use registry::{LoadedPlugin, PluginInfo, PluginRegistry};
pub use validator::is_valid_plugin;
