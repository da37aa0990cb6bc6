//! Distribution Module
//!
//! Installed distributions and their declared entry points:
//! - Distribution and entry point model
//! - Distribution sources (in-memory, manifest directories)
//! - Group scanning with canonical-name de-duplication

pub mod distribution;
pub mod scanner;
pub mod source;

pub use distribution::{Distribution, DistributionManifest, EntryPoint};
pub use scanner::entry_points_with_dist;
pub use source::{DistributionSource, ManifestDirectory, StaticDistributions};
