use myproject_plugins::core::{PluginConfig, Settings};
use myproject_plugins::export_module;
use myproject_plugins::plugin::{
    Export, Feature, LoadStatus, Module, Plugin, PluginError, PluginManager, PluginResult,
    PluginType,
};
use std::fs;
use std::path::Path;

struct Markdown;

impl Plugin for Markdown {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn features(&self) -> Vec<Feature> {
        vec![
            Feature::new("render", render as fn(&str) -> String),
            Feature::new("EXTENSIONS", vec!["md", "markdown"]),
        ]
    }
}

impl PluginType for Markdown {
    const NAME: &'static str = "Markdown";

    fn create() -> PluginResult<Self> {
        Ok(Self)
    }
}

fn render(text: &str) -> String {
    format!("<p>{}</p>", text)
}

struct Silent;

impl Plugin for Silent {
    fn name(&self) -> &str {
        Self::NAME
    }
}

impl PluginType for Silent {
    const NAME: &'static str = "silent";

    fn create() -> PluginResult<Self> {
        Ok(Self)
    }
}

fn markdown_exports() -> PluginResult<Module> {
    Ok(Module::new()
        .export("Markdown", Export::plugin::<Markdown>())
        .export("Silent", Export::plugin::<Silent>()))
}

fn legacy_exports() -> PluginResult<Module> {
    Err(PluginError::new("legacy API removed"))
}

export_module!("md_plugin.core", markdown_exports);
export_module!("legacy_plugin", legacy_exports);

fn write(dir: &Path, file: &str, content: &str) {
    fs::write(dir.join(file), content).unwrap();
}

#[test]
fn test_discovery_from_manifests() {
    let site = tempfile::tempdir().unwrap();
    let user = tempfile::tempdir().unwrap();

    write(
        site.path(),
        "md_plugin.toml",
        r#"
        name = "md_plugin"
        version = "0.4.1"

        [entry-points."myproject.plugins"]
        markdown = "md_plugin.core:Markdown"
        silent = "md_plugin.core:Silent"

        [entry-points.console_scripts]
        md = "md_plugin.cli:main"
        "#,
    );
    write(
        site.path(),
        "legacy.toml",
        r#"
        name = "legacy-plugin"
        version = "1.0"

        [entry-points."myproject.plugins"]
        legacy = "legacy_plugin:Legacy"
        "#,
    );
    // Shadowed by the site install: same canonical name.
    write(
        user.path(),
        "md.toml",
        r#"
        name = "MD.Plugin"
        version = "9.9"

        [entry-points."myproject.plugins"]
        other = "md_plugin.core:Other"
        "#,
    );

    let config = PluginConfig::default()
        .with_search_path(site.path())
        .with_search_path(user.path());
    let mut manager = PluginManager::from_config(config);

    manager.integrate_feature_plugins().unwrap();

    let names: Vec<_> = manager.plugins().unwrap().iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["Markdown", "silent"]);
    assert_eq!(
        manager.plugins().unwrap()[0].source().to_string(),
        "md_plugin==0.4.1: markdown = md_plugin.core:Markdown"
    );

    assert_eq!(manager.import_errors().len(), 1);
    assert_eq!(
        manager.import_errors()["legacy_plugin"],
        "Error while importing module 'legacy_plugin': legacy API removed"
    );

    let ns = manager.features_of("markdown").unwrap();
    assert_eq!(ns.name(), "myproject.features.markdown");
    let render = ns.get_as::<fn(&str) -> String>("render").unwrap();
    assert_eq!((*render)("hi"), "<p>hi</p>");
    assert_eq!(
        ns.get_as::<Vec<&'static str>>("EXTENSIONS").unwrap().len(),
        2
    );
    assert!(manager.features_of("silent").is_none());
    assert_eq!(manager.namespaces().unwrap().len(), 1);
}

#[test]
fn test_reload_is_noop() {
    let site = tempfile::tempdir().unwrap();
    write(
        site.path(),
        "md.toml",
        r#"
        name = "md_plugin"
        version = "0.4.1"

        [entry-points."myproject.plugins"]
        markdown = "md_plugin.core:Markdown"
        "#,
    );

    let config = PluginConfig::default().with_search_path(site.path());
    let mut manager = PluginManager::from_config(config);
    manager.ensure_plugins_loaded();
    assert_eq!(manager.plugins().unwrap().len(), 1);

    // Explicit second pass: the type is already registered.
    let outcomes = manager.load_entrypoint_plugins();
    assert_eq!(outcomes.len(), 1);
    assert!(matches!(outcomes[0].result, Ok(LoadStatus::Skipped)));
    assert_eq!(manager.plugins().unwrap().len(), 1);
}

#[test]
fn test_settings_drive_manager() {
    let site = tempfile::tempdir().unwrap();
    write(
        site.path(),
        "md.toml",
        r#"
        name = "md_plugin"
        version = "0.4.1"

        [entry-points."editor.extensions"]
        markdown = "md_plugin.core:Markdown"
        "#,
    );

    let settings = Settings::from_toml_str(&format!(
        "[plugins]\n\
         group = \"editor.extensions\"\n\
         features_prefix = \"editor.features\"\n\
         search_paths = [{:?}]\n",
        site.path().display().to_string()
    ))
    .unwrap();

    let mut manager = PluginManager::from_config(settings.plugins);
    manager.integrate_feature_plugins().unwrap();
    assert!(manager.namespace("editor.features.markdown").is_some());
}
