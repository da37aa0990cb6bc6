//! Plugin eligibility checks.

use crate::core::Result;
use crate::plugin::interface::Export;
use crate::plugin::registry::PluginRegistry;

/// Whether an exported object is a plugin type that can be registered.
///
/// Only concrete plugin types qualify; the plugin base and anything that is
/// not a plugin type are rejected without validation. A qualifying type is
/// validated (an unnamed plugin is an error) and accepted unless the very
/// same type is already registered. Distinct types declaring the same name
/// are all accepted.
pub fn is_valid_plugin(registry: &PluginRegistry, candidate: &Export) -> Result<bool> {
    let Export::Plugin(class) = candidate else {
        return Ok(false);
    };

    class.validate()?;
    Ok(!registry.contains_class(class)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;
    use crate::dist::{Distribution, EntryPoint};
    use crate::plugin::interface::tests::EchoPlugin;
    use crate::plugin::interface::{
        EntryPointSource, Plugin, PluginClass, PluginResult, PluginSource, PluginType,
    };
    use crate::plugin::registry::LoadedPlugin;

    struct Nameless;

    impl Plugin for Nameless {
        fn name(&self) -> &str {
            ""
        }
    }

    impl PluginType for Nameless {
        const NAME: &'static str = "";

        fn create() -> PluginResult<Self> {
            Ok(Self)
        }
    }

    struct EchoTwin;

    impl Plugin for EchoTwin {
        fn name(&self) -> &str {
            Self::NAME
        }
    }

    impl PluginType for EchoTwin {
        const NAME: &'static str = "echo";

        fn create() -> PluginResult<Self> {
            Ok(Self)
        }
    }

    fn loaded_registry() -> PluginRegistry {
        let mut registry = PluginRegistry::new();
        registry.initialize();
        registry
    }

    fn register<T: PluginType>(registry: &mut PluginRegistry) {
        let class = PluginClass::of::<T>();
        let source = PluginSource::EntryPoint(EntryPointSource::new(
            &EntryPoint::new(T::NAME, "myproject.plugins", "m:P"),
            &Distribution::new("pkg", "1.0"),
        ));
        registry
            .register(LoadedPlugin::new(class.instantiate().unwrap(), class, source))
            .unwrap();
    }

    #[test]
    fn test_non_plugins_rejected() {
        let registry = loaded_registry();
        assert!(!is_valid_plugin(&registry, &Export::PluginBase).unwrap());
        assert!(!is_valid_plugin(&registry, &Export::class::<String>()).unwrap());
        assert!(!is_valid_plugin(&registry, &Export::object(EchoTwin)).unwrap());
        assert!(!is_valid_plugin(&registry, &Export::Module("m".to_string())).unwrap());
    }

    #[test]
    fn test_non_plugins_skip_validation() {
        // No registry and no validation needed to reject a non-plugin.
        let registry = PluginRegistry::new();
        assert!(!is_valid_plugin(&registry, &Export::PluginBase).unwrap());
    }

    #[test]
    fn test_unnamed_plugin_fails() {
        let registry = loaded_registry();
        let result = is_valid_plugin(&registry, &Export::plugin::<Nameless>());
        assert!(matches!(result, Err(Error::UnnamedPlugin(_))));
    }

    #[test]
    fn test_same_class_rejected() {
        let mut registry = loaded_registry();
        assert!(is_valid_plugin(&registry, &Export::plugin::<EchoPlugin>()).unwrap());

        register::<EchoPlugin>(&mut registry);
        assert!(!is_valid_plugin(&registry, &Export::plugin::<EchoPlugin>()).unwrap());
        assert_eq!(registry.plugin_count(), 1);
    }

    #[test]
    fn test_same_name_different_class_accepted() {
        let mut registry = loaded_registry();
        register::<EchoPlugin>(&mut registry);

        assert!(is_valid_plugin(&registry, &Export::plugin::<EchoTwin>()).unwrap());
    }

    #[test]
    fn test_unloaded_registry_errors() {
        let registry = PluginRegistry::new();
        let result = is_valid_plugin(&registry, &Export::plugin::<EchoPlugin>());
        assert!(matches!(result, Err(Error::PluginsNotLoaded)));
    }
}
