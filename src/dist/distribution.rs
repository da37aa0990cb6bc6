//! Installed distributions and the entry points they declare.

use crate::core::canonicalize_name;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named reference to an exported object, declared under a group.
///
/// The value has the form `module[:attr] [extras]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPoint {
    /// Entry point name
    pub name: String,
    /// Group the entry point is declared under
    pub group: String,
    /// Object reference (`module:attr`)
    pub value: String,
}

impl EntryPoint {
    /// Create a new entry point.
    pub fn new(name: &str, group: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            group: group.to_string(),
            value: value.to_string(),
        }
    }

    /// Reference with any `[extras]` suffix removed.
    fn reference(&self) -> &str {
        match self.value.find('[') {
            Some(idx) => self.value[..idx].trim(),
            None => self.value.trim(),
        }
    }

    /// Module part of the reference.
    pub fn module(&self) -> &str {
        let reference = self.reference();
        match reference.split_once(':') {
            Some((module, _)) => module.trim(),
            None => reference,
        }
    }

    /// Attribute part of the reference, if any.
    pub fn attr(&self) -> Option<&str> {
        self.reference()
            .split_once(':')
            .map(|(_, attr)| attr.trim())
            .filter(|attr| !attr.is_empty())
    }
}

impl std::fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.name, self.value)
    }
}

/// An installed unit of packaged software.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Distribution {
    /// Distribution name as declared
    pub name: String,
    /// Distribution version
    pub version: String,
    /// Declared entry points, across all groups
    pub entry_points: Vec<EntryPoint>,
}

impl Distribution {
    /// Create a new distribution without entry points.
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            entry_points: Vec::new(),
        }
    }

    /// Declare an entry point.
    pub fn with_entry_point(mut self, group: &str, name: &str, value: &str) -> Self {
        self.entry_points.push(EntryPoint::new(name, group, value));
        self
    }

    /// Normalized name used for de-duplication.
    pub fn canonical_name(&self) -> String {
        canonicalize_name(&self.name)
    }

    /// Entry points declared under a group.
    pub fn entry_points_in<'a>(
        &'a self,
        group: &'a str,
    ) -> impl Iterator<Item = &'a EntryPoint> + 'a {
        self.entry_points.iter().filter(move |ep| ep.group == group)
    }
}

/// On-disk distribution manifest.
///
/// ```toml
/// name = "pkg-a"
/// version = "1.0.0"
///
/// [entry-points."myproject.plugins"]
/// alpha = "pkg_a.plugin:AlphaPlugin"
/// ```
#[derive(Clone, Debug, Deserialize)]
pub struct DistributionManifest {
    /// Distribution name
    pub name: String,
    /// Distribution version
    pub version: String,
    /// Entry points, keyed by group then by name
    #[serde(default, rename = "entry-points")]
    pub entry_points: BTreeMap<String, BTreeMap<String, String>>,
}

impl DistributionManifest {
    /// Parse a manifest from TOML.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}

impl From<DistributionManifest> for Distribution {
    fn from(manifest: DistributionManifest) -> Self {
        let entry_points = manifest
            .entry_points
            .iter()
            .flat_map(|(group, entries)| {
                entries
                    .iter()
                    .map(move |(name, value)| EntryPoint::new(name, group, value))
            })
            .collect();

        Self {
            name: manifest.name,
            version: manifest.version,
            entry_points,
        }
    }
}
