//! Sources of installed distributions.

use crate::core::{Error, Result};
use crate::dist::distribution::{Distribution, DistributionManifest};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Enumerates installed distributions in search order.
pub trait DistributionSource: Send + Sync {
    /// Iterate over all installed distributions.
    ///
    /// Each call starts a fresh enumeration.
    fn distributions(&self) -> Box<dyn Iterator<Item = Distribution> + '_>;
}

/// A fixed, in-memory set of distributions.
#[derive(Clone, Debug, Default)]
pub struct StaticDistributions {
    distributions: Vec<Distribution>,
}

impl StaticDistributions {
    /// Create a new source.
    pub fn new(distributions: Vec<Distribution>) -> Self {
        Self { distributions }
    }

    /// Append a distribution.
    pub fn push(&mut self, distribution: Distribution) {
        self.distributions.push(distribution);
    }
}

impl DistributionSource for StaticDistributions {
    fn distributions(&self) -> Box<dyn Iterator<Item = Distribution> + '_> {
        Box::new(self.distributions.iter().cloned())
    }
}

/// Distributions described by `*.toml` manifests in a list of directories.
///
/// Directories are visited in order and the manifests inside each one by
/// file name. Missing directories are ignored.
#[derive(Clone, Debug, Default)]
pub struct ManifestDirectory {
    search_paths: Vec<PathBuf>,
}

impl ManifestDirectory {
    /// Create a new source over the given directories.
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }

    /// Configured search paths.
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Read a single manifest file.
    pub fn read_manifest(path: &Path) -> Result<Distribution> {
        let content = std::fs::read_to_string(path)?;
        let manifest =
            DistributionManifest::from_toml_str(&content).map_err(|e| Error::Manifest {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Ok(manifest.into())
    }

    fn manifest_files(dir: &Path) -> Vec<PathBuf> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(path = %dir.display(), error = %e, "Skipping plugin search path");
                return Vec::new();
            }
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        files.sort();
        files
    }
}

impl DistributionSource for ManifestDirectory {
    fn distributions(&self) -> Box<dyn Iterator<Item = Distribution> + '_> {
        Box::new(
            self.search_paths
                .iter()
                .flat_map(|dir| Self::manifest_files(dir))
                .filter_map(|path| match Self::read_manifest(&path) {
                    Ok(dist) => Some(dist),
                    Err(e) => {
                        warn!(
                            path = %path.display(),
                            error = %e,
                            "Ignoring invalid distribution manifest"
                        );
                        None
                    }
                }),
        )
    }
}
