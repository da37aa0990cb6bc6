//! # myproject-plugins
//!
//! Plugin discovery and registration:
//! - **Distributions**: installed packages and the entry points they declare
//! - **Plugins**: validated, instantiated once, registered with provenance
//! - **Features**: per-plugin namespaces of contributed objects
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use myproject_plugins::export_module;
//! use myproject_plugins::plugin::{
//!     global, Export, Feature, Module, Plugin, PluginResult, PluginType,
//! };
//!
//! struct Greeter;
//!
//! impl Plugin for Greeter {
//!     fn name(&self) -> &str {
//!         Self::NAME
//!     }
//!
//!     fn features(&self) -> Vec<Feature> {
//!         vec![Feature::new("greeting", "hello")]
//!     }
//! }
//!
//! impl PluginType for Greeter {
//!     const NAME: &'static str = "greeter";
//!
//!     fn create() -> PluginResult<Self> {
//!         Ok(Greeter)
//!     }
//! }
//!
//! fn exports() -> PluginResult<Module> {
//!     Ok(Module::new().export("Greeter", Export::plugin::<Greeter>()))
//! }
//!
//! // A distribution manifest on MYPROJECT_PLUGIN_PATH points at it:
//! //   [entry-points."myproject.plugins"]
//! //   greeter = "greeter.plugin:Greeter"
//! export_module!("greeter.plugin", exports);
//!
//! fn main() -> myproject_plugins::Result<()> {
//!     global::integrate_feature_plugins()?;
//!     if let Some(ns) = global::resolve_namespace("myproject.features.greeter")? {
//!         let greeting = ns.get_as::<&'static str>("greeting");
//!         println!("{:?}", greeting);
//!     }
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod dist;
pub mod monitoring;
pub mod plugin;

pub use crate::core::error::{Error, Result};
