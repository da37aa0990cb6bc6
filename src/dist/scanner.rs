//! Entry point scanning across distributions.

use crate::dist::distribution::{Distribution, EntryPoint};
use crate::dist::source::DistributionSource;
use std::collections::HashSet;
use std::sync::Arc;

/// Iterate over the entry points of `group` together with their distribution.
///
/// A distribution whose canonical name was already seen earlier in the scan
/// is skipped entirely, so duplicate installs further down the search path
/// never contribute entry points.
pub fn entry_points_with_dist<'a>(
    source: &'a dyn DistributionSource,
    group: &'a str,
) -> impl Iterator<Item = (EntryPoint, Arc<Distribution>)> + 'a {
    let mut seen: HashSet<String> = HashSet::new();

    source
        .distributions()
        .filter(move |dist| seen.insert(dist.canonical_name()))
        .flat_map(move |dist| {
            let dist = Arc::new(dist);
            let entry_points: Vec<EntryPoint> = dist.entry_points_in(group).cloned().collect();
            entry_points
                .into_iter()
                .map(move |ep| (ep, Arc::clone(&dist)))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::source::StaticDistributions;

    const GROUP: &str = "myproject.plugins";

    #[test]
    fn test_duplicate_canonical_name_skipped() {
        let source = StaticDistributions::new(vec![
            Distribution::new("pkgA", "1.0").with_entry_point(GROUP, "alpha", "pkg_a:Valid"),
            Distribution::new("PKGA", "0.9").with_entry_point(GROUP, "beta", "pkg_a:Other"),
        ]);

        let found: Vec<_> = entry_points_with_dist(&source, GROUP).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0.name, "alpha");
        assert_eq!(found[0].1.version, "1.0");
    }

    #[test]
    fn test_dedup_uses_normalized_separators() {
        let source = StaticDistributions::new(vec![
            Distribution::new("my_pkg", "1.0").with_entry_point(GROUP, "one", "m:One"),
            Distribution::new("My.Pkg", "1.0").with_entry_point(GROUP, "two", "m:Two"),
            Distribution::new("other", "1.0").with_entry_point(GROUP, "three", "o:Three"),
        ]);

        let names: Vec<_> = entry_points_with_dist(&source, GROUP)
            .map(|(ep, _)| ep.name)
            .collect();
        assert_eq!(names, vec!["one", "three"]);
    }

    #[test]
    fn test_other_groups_ignored() {
        let source = StaticDistributions::new(vec![Distribution::new("pkg", "1.0")
            .with_entry_point("console_scripts", "run", "pkg:main")
            .with_entry_point(GROUP, "plug", "pkg:Plug")]);

        let found: Vec<_> = entry_points_with_dist(&source, GROUP).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0.value, "pkg:Plug");
    }

    #[test]
    fn test_dedup_without_matching_entry_points() {
        // The first install declares nothing in the group but still shadows the second.
        let source = StaticDistributions::new(vec![
            Distribution::new("pkg", "2.0"),
            Distribution::new("pkg", "1.0").with_entry_point(GROUP, "plug", "pkg:Plug"),
        ]);

        assert_eq!(entry_points_with_dist(&source, GROUP).count(), 0);
    }

    #[test]
    fn test_scan_is_repeatable() {
        let source = StaticDistributions::new(vec![
            Distribution::new("pkg", "1.0").with_entry_point(GROUP, "plug", "pkg:Plug")
        ]);

        assert_eq!(entry_points_with_dist(&source, GROUP).count(), 1);
        assert_eq!(entry_points_with_dist(&source, GROUP).count(), 1);
    }
}
