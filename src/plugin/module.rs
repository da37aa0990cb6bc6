//! Module table for entry point resolution.
//!
//! Entry points name an object as `module:attr`. Plugin units make their
//! modules resolvable either by registering them on a [`ModuleTable`]
//! directly or, for code linked into the host binary, through
//! [`export_module!`](crate::export_module). A module initializer runs the
//! first time the module is imported; a failing initializer is retried on the
//! next import.

use crate::dist::EntryPoint;
use crate::plugin::error::LoadError;
use crate::plugin::interface::{Export, PluginResult};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[doc(hidden)]
pub use inventory;

/// Initializer producing a module's exports.
pub type ModuleInit = fn() -> PluginResult<Module>;

/// Objects exported by a module, by attribute name.
#[derive(Clone, Debug, Default)]
pub struct Module {
    attrs: HashMap<String, Export>,
}

impl Module {
    /// Create an empty module.
    pub fn new() -> Self {
        Self::default()
    }

    /// Export an object under an attribute name.
    pub fn export(mut self, attr: &str, export: Export) -> Self {
        self.attrs.insert(attr.to_string(), export);
        self
    }

    /// Look up an attribute.
    pub fn get(&self, attr: &str) -> Option<&Export> {
        self.attrs.get(attr)
    }

    /// Number of exported attributes.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Whether the module exports nothing.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

/// A module registered at link time through [`export_module!`](crate::export_module).
pub struct StaticModule {
    /// Dotted module path
    pub path: &'static str,
    /// Module initializer
    pub init: ModuleInit,
}

impl StaticModule {
    /// Declare a linked module.
    pub const fn new(path: &'static str, init: ModuleInit) -> Self {
        Self { path, init }
    }
}

inventory::collect!(StaticModule);

/// Make a module resolvable from every [`ModuleTable::linked`] table.
///
/// ```rust,ignore
/// fn exports() -> PluginResult<Module> {
///     Ok(Module::new().export("AlphaPlugin", Export::plugin::<AlphaPlugin>()))
/// }
///
/// export_module!("pkg_a.plugin", exports);
/// ```
#[macro_export]
macro_rules! export_module {
    ($path:expr, $init:expr) => {
        $crate::plugin::module::inventory::submit! {
            $crate::plugin::module::StaticModule::new($path, $init)
        }
    };
}

#[derive(Debug)]
enum ModuleState {
    Pending(ModuleInit),
    Loaded(Arc<Module>),
}

/// Registered modules by dotted path.
#[derive(Debug, Default)]
pub struct ModuleTable {
    modules: HashMap<String, ModuleState>,
}

impl ModuleTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding every module declared with `export_module!`.
    pub fn linked() -> Self {
        let mut table = Self::new();
        for module in inventory::iter::<StaticModule> {
            table.register(module.path, module.init);
        }
        table
    }

    /// Register a module initializer, replacing any module at that path.
    pub fn register(&mut self, path: &str, init: ModuleInit) {
        self.modules
            .insert(path.to_string(), ModuleState::Pending(init));
    }

    /// Register an already built module.
    pub fn insert(&mut self, path: &str, module: Module) {
        self.modules
            .insert(path.to_string(), ModuleState::Loaded(Arc::new(module)));
    }

    /// Whether a module is registered at this path.
    pub fn contains(&self, path: &str) -> bool {
        self.modules.contains_key(path)
    }

    /// Registered module paths, sorted.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    /// Import a module, running its initializer on first use.
    pub fn import(&mut self, path: &str) -> Result<Arc<Module>, LoadError> {
        let state = self
            .modules
            .get_mut(path)
            .ok_or_else(|| LoadError::ModuleNotFound {
                module: path.to_string(),
            })?;

        let init = match state {
            ModuleState::Loaded(module) => return Ok(Arc::clone(module)),
            ModuleState::Pending(init) => *init,
        };

        debug!(module = %path, "Importing module");
        let module = Arc::new(init().map_err(|source| LoadError::ModuleInit {
            module: path.to_string(),
            source,
        })?);
        *state = ModuleState::Loaded(Arc::clone(&module));
        Ok(module)
    }

    /// Resolve an entry point to the object it names.
    ///
    /// An entry point without an attribute resolves to its module.
    pub fn resolve(&mut self, entry_point: &EntryPoint) -> Result<Export, LoadError> {
        let path = entry_point.module();
        let module = self.import(path)?;

        match entry_point.attr() {
            None => Ok(Export::Module(path.to_string())),
            Some(attr) => module
                .get(attr)
                .cloned()
                .ok_or_else(|| LoadError::AttributeNotFound {
                    module: path.to_string(),
                    attr: attr.to_string(),
                }),
        }
    }
}
