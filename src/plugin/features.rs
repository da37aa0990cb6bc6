//! Feature namespaces.
//!
//! Each plugin with features gets one namespace, published under a dotted
//! name such as `myproject.features.<plugin>`, exposing the contributed
//! objects by their own names.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A named object contributed by a plugin.
#[derive(Clone, Debug)]
pub struct Feature {
    name: String,
    object: Arc<dyn Any + Send + Sync>,
}

impl Feature {
    /// Wrap a value under a name.
    pub fn new<T: Any + Send + Sync>(name: &str, value: T) -> Self {
        Self::from_arc(name, Arc::new(value))
    }

    /// Wrap an already shared value.
    pub fn from_arc(name: &str, object: Arc<dyn Any + Send + Sync>) -> Self {
        Self {
            name: name.to_string(),
            object,
        }
    }

    /// Feature name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Untyped object.
    pub fn object(&self) -> &Arc<dyn Any + Send + Sync> {
        &self.object
    }

    /// Whether the object is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.object.is::<T>()
    }

    /// Typed view of the object.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.object).downcast::<T>().ok()
    }
}

/// A synthetic module holding a plugin's features.
#[derive(Clone, Debug)]
pub struct Namespace {
    /// Full lower-cased dotted name
    name: String,
    /// Last dotted segment
    short_name: String,
    /// All features, in declaration order
    objects: Vec<Feature>,
    /// Features by name, last one wins
    by_name: HashMap<String, Feature>,
}

impl Namespace {
    /// Full dotted name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last segment of the dotted name.
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    /// All features in declaration order, including shadowed ones.
    pub fn objects(&self) -> &[Feature] {
        &self.objects
    }

    /// Look up a feature by name.
    pub fn get(&self, name: &str) -> Option<&Feature> {
        self.by_name.get(name)
    }

    /// Look up a feature by name and downcast it.
    pub fn get_as<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.get(name).and_then(Feature::downcast::<T>)
    }

    /// Whether a feature with this name is exposed.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Exposed feature names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Build a namespace from a list of features.
///
/// Returns `None` for an empty list. The name is lower-cased; features with
/// the same name overwrite earlier ones without error.
pub fn make_namespace(name: &str, objects: Vec<Feature>) -> Option<Namespace> {
    if objects.is_empty() {
        return None;
    }
    debug!(namespace = %name, "Creating feature namespace");

    let name = name.to_lowercase();
    let short_name = name.rsplit('.').next().unwrap_or_default().to_string();
    let by_name = objects
        .iter()
        .map(|feature| (feature.name.clone(), feature.clone()))
        .collect();

    Some(Namespace {
        name,
        short_name,
        objects,
        by_name,
    })
}

/// Built and published feature namespaces.
#[derive(Debug, Default)]
pub struct FeatureTable {
    /// Namespaces in plugin order; `None` until integration ran
    namespaces: Option<Vec<Arc<Namespace>>>,
    /// Published namespaces by dotted name
    published: HashMap<String, Arc<Namespace>>,
}

impl FeatureTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether integration has started.
    pub fn is_integrated(&self) -> bool {
        self.namespaces.is_some()
    }

    /// Mark integration as started.
    pub(crate) fn begin(&mut self) {
        self.namespaces = Some(Vec::new());
    }

    /// Record a namespace and publish it under its dotted name.
    pub(crate) fn publish(&mut self, namespace: Namespace) -> Arc<Namespace> {
        let namespace = Arc::new(namespace);
        self.namespaces
            .get_or_insert_with(Vec::new)
            .push(Arc::clone(&namespace));
        self.published
            .insert(namespace.name().to_string(), Arc::clone(&namespace));
        namespace
    }

    /// Namespaces built by integration, if it ran.
    pub fn namespaces(&self) -> Option<&[Arc<Namespace>]> {
        self.namespaces.as_deref()
    }

    /// Resolve a published namespace by dotted name.
    pub fn resolve(&self, name: &str) -> Option<Arc<Namespace>> {
        self.published.get(&name.to_lowercase()).cloned()
    }

    /// Dotted names of all published namespaces, sorted.
    pub fn published_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.published.keys().cloned().collect();
        names.sort();
        names
    }
}
