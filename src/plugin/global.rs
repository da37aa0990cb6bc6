//! Process-wide plugin manager.
//!
//! The first access builds the manager from the environment unless one was
//! installed before. All gates run under a mutex, so concurrent first calls
//! load plugins exactly once.
//!
//! Plugin code (constructors, `on_load`, `features`) runs while the mutex is
//! held. Calling back into this module from that code on the same thread
//! fails with [`Error::ReentrantAccess`] instead of blocking. A hook must not
//! wait on another thread that calls in here.

use crate::core::{Error, Result};
use crate::plugin::features::Namespace;
use crate::plugin::manager::PluginManager;
use std::cell::Cell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

static MANAGER: OnceLock<Mutex<PluginManager>> = OnceLock::new();

thread_local! {
    static HOLDING: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as holding the manager lock.
struct AccessGuard;

impl AccessGuard {
    fn enter() -> Result<Self> {
        if HOLDING.with(|holding| holding.replace(true)) {
            return Err(Error::ReentrantAccess);
        }
        Ok(AccessGuard)
    }
}

impl Drop for AccessGuard {
    fn drop(&mut self) {
        HOLDING.with(|holding| holding.set(false));
    }
}

/// The process-wide manager.
pub fn manager() -> &'static Mutex<PluginManager> {
    MANAGER.get_or_init(|| Mutex::new(PluginManager::from_env()))
}

/// Install the process-wide manager.
///
/// Fails, handing the manager back, if one is already in place.
pub fn install(manager: PluginManager) -> std::result::Result<(), PluginManager> {
    MANAGER
        .set(Mutex::new(manager))
        .map_err(|m| m.into_inner().unwrap_or_else(PoisonError::into_inner))
}

/// Run a closure with exclusive access to the process-wide manager.
pub fn with_manager<R>(f: impl FnOnce(&mut PluginManager) -> R) -> Result<R> {
    let _guard = AccessGuard::enter()?;
    let mut manager = manager().lock().unwrap_or_else(PoisonError::into_inner);
    Ok(f(&mut *manager))
}

/// Load plugins into the process-wide manager, once.
pub fn ensure_plugins_loaded() -> Result<()> {
    with_manager(PluginManager::ensure_plugins_loaded)
}

/// Integrate features of the process-wide manager, once.
pub fn integrate_feature_plugins() -> Result<()> {
    with_manager(PluginManager::integrate_feature_plugins)?
}

/// Entry point modules that failed to load so far.
pub fn import_errors() -> Result<HashMap<String, String>> {
    with_manager(|m| m.import_errors().clone())
}

/// Resolve a published feature namespace by dotted name.
pub fn resolve_namespace(name: &str) -> Result<Option<Arc<Namespace>>> {
    with_manager(|m| m.namespace(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PluginConfig;
    use crate::dist::{Distribution, StaticDistributions};
    use crate::plugin::features::Feature;
    use crate::plugin::interface::{Export, Plugin, PluginResult, PluginType};
    use crate::plugin::module::{Module, ModuleTable};
    use std::sync::atomic::{AtomicBool, Ordering};

    static HOOK_REJECTED: AtomicBool = AtomicBool::new(false);

    struct Clock;

    impl Plugin for Clock {
        fn name(&self) -> &str {
            Self::NAME
        }

        fn features(&self) -> Vec<Feature> {
            vec![Feature::new("epoch", 1970u32)]
        }

        fn on_load(&mut self) -> PluginResult<()> {
            let rejected = matches!(import_errors(), Err(Error::ReentrantAccess));
            HOOK_REJECTED.store(rejected, Ordering::SeqCst);
            Ok(())
        }
    }

    impl PluginType for Clock {
        const NAME: &'static str = "clock";

        fn create() -> PluginResult<Self> {
            Ok(Self)
        }
    }

    fn clock_module() -> PluginResult<Module> {
        Ok(Module::new().export("Clock", Export::plugin::<Clock>()))
    }

    #[test]
    fn test_global_manager_lifecycle() {
        let mut modules = ModuleTable::new();
        modules.register("clock", clock_module);
        let distributions = StaticDistributions::new(vec![
            Distribution::new("clock", "0.3.0")
                .with_entry_point("myproject.plugins", "clock", "clock:Clock")
                .with_entry_point("myproject.plugins", "tick", "tick:Tick"),
        ]);
        let manager = PluginManager::new(
            PluginConfig::default(),
            Box::new(distributions),
            modules,
        );
        assert!(install(manager).is_ok());

        let again = PluginManager::new(
            PluginConfig::default(),
            Box::new(StaticDistributions::default()),
            ModuleTable::new(),
        );
        assert!(install(again).is_err());

        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(integrate_feature_plugins))
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }
        ensure_plugins_loaded().unwrap();

        assert!(HOOK_REJECTED.load(Ordering::SeqCst));
        assert_eq!(with_manager(|m| m.registry().plugin_count()).unwrap(), 1);
        assert_eq!(import_errors().unwrap()["tick"], "No module named 'tick'");

        let ns = resolve_namespace("myproject.features.clock")
            .unwrap()
            .unwrap();
        assert_eq!(*ns.get_as::<u32>("epoch").unwrap(), 1970);
    }

    #[test]
    fn test_access_guard_rejects_nesting() {
        let outer = AccessGuard::enter().unwrap();
        assert!(matches!(AccessGuard::enter(), Err(Error::ReentrantAccess)));
        drop(outer);

        assert!(AccessGuard::enter().is_ok());
    }
}
