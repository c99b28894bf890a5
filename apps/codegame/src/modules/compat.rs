//! Compatibility resolution between source and target versions.
//!
//! A versions manifest maps a *source* version (a CodeGame protocol version,
//! or a client library version) to the *target* version of an artifact that
//! is compatible with it. Manifests only list the versions where something
//! changed, so a request frequently has no exact entry. [`compatible_version`]
//! then picks the nearest entry inside the same major version:
//!
//! 1. exact key match;
//! 2. the smallest minor above the requested one;
//! 3. the largest minor below the requested one;
//! 4. otherwise the newest release of the artifact.
//!
//! A newer target is always preferred over an older one, even when the older
//! one is numerically closer. Different major versions are never considered.

use std::collections::HashMap;

use super::version::SemanticVersion;

/// Outcome of a compatibility lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetVersion {
    /// The manifest names a target version (as written in the manifest).
    Resolved(String),
    /// No usable entry; the caller should install the newest release.
    UseLatestRelease,
}

/// Selects the target version compatible with `requested`.
///
/// `warn` receives a human-readable message whenever anything other than an
/// exact match is returned. The function never fails: malformed input
/// degrades to [`TargetVersion::UseLatestRelease`].
pub fn compatible_version<F>(
    versions: &HashMap<String, String>,
    requested: &str,
    mut warn: F,
) -> TargetVersion
where
    F: FnMut(&str),
{
    if let Some(target) = versions.get(requested) {
        return TargetVersion::Resolved(target.clone());
    }

    let Ok(wanted) = SemanticVersion::parse_prefix(requested) else {
        warn(&format!(
            "Invalid version '{requested}'. Using latest version."
        ));
        return TargetVersion::UseLatestRelease;
    };

    let Some(entries) = same_major_entries(versions, wanted.major) else {
        warn("Invalid versions.json. Using latest version.");
        return TargetVersion::UseLatestRelease;
    };

    let above = entries
        .iter()
        .map(|entry| entry.source.minor)
        .filter(|minor| *minor > wanted.minor)
        .min();
    let below = entries
        .iter()
        .map(|entry| entry.source.minor)
        .filter(|minor| *minor < wanted.minor)
        .max();

    match above.or(below).and_then(|minor| entry_for_minor(&entries, minor)) {
        Some(target) => {
            warn(&format!(
                "No exact version match found for {requested}. Using version {target}."
            ));
            TargetVersion::Resolved(target.to_string())
        }
        None => {
            warn(&format!(
                "No compatible version found for {requested}. Using latest version."
            ));
            TargetVersion::UseLatestRelease
        }
    }
}

/// A manifest entry whose key has the requested major.
struct Entry<'a> {
    source: SemanticVersion,
    key: &'a str,
    target: &'a str,
}

/// Collects the entries whose key has `major`.
///
/// Returns `None` if any key or value in the manifest is not at least
/// `major.minor`; a manifest with one corrupt entry is not trusted at all.
fn same_major_entries(versions: &HashMap<String, String>, major: u64) -> Option<Vec<Entry<'_>>> {
    let mut entries = Vec::new();
    for (key, target) in versions {
        let source = SemanticVersion::parse_prefix(key).ok()?;
        SemanticVersion::parse_prefix(target).ok()?;
        if source.major == major {
            entries.push(Entry {
                source,
                key,
                target,
            });
        }
    }
    Some(entries)
}

/// Target of the `major.minor` key for `minor`.
///
/// Several keys can share a minor (`0.6`, `0.6.1`). The lowest one wins, and
/// the plain `major.minor` key sorts before its `.0` spelling.
fn entry_for_minor<'a>(entries: &[Entry<'a>], minor: u64) -> Option<&'a str> {
    entries
        .iter()
        .filter(|entry| entry.source.minor == minor)
        .min_by(|a, b| a.source.cmp(&b.source).then_with(|| a.key.cmp(b.key)))
        .map(|entry| entry.target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn manifest(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn resolve(versions: &HashMap<String, String>, requested: &str) -> (TargetVersion, Vec<String>) {
        let warnings = RefCell::new(Vec::new());
        let target = compatible_version(versions, requested, |w| {
            warnings.borrow_mut().push(w.to_string());
        });
        (target, warnings.into_inner())
    }

    #[test]
    fn exact_match_wins_without_warning() {
        let versions = manifest(&[("0.1", "1.2"), ("0.3", "1.4"), ("0.5", "1.6"), ("0.7", "1.8")]);
        let (target, warnings) = resolve(&versions, "0.5");
        assert_eq!(target, TargetVersion::Resolved("1.6".to_string()));
        assert!(warnings.is_empty());
    }

    #[test]
    fn exact_match_holds_for_every_key() {
        let versions = manifest(&[("0.1", "1.2"), ("0.3", "1.4"), ("2.0", "3.1"), ("0.7", "1.8")]);
        for (key, value) in &versions {
            let (target, _) = resolve(&versions, key);
            assert_eq!(target, TargetVersion::Resolved(value.clone()));
        }
    }

    #[test]
    fn nearest_above_is_preferred_over_closer_below() {
        let versions = manifest(&[("0.1", "1.1"), ("0.3", "1.3"), ("0.6", "1.6"), ("0.7", "1.7")]);
        let (target, warnings) = resolve(&versions, "0.5");
        assert_eq!(target, TargetVersion::Resolved("1.6".to_string()));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Using version 1.6"));
    }

    #[test]
    fn above_wins_even_when_below_is_numerically_closer() {
        let versions = manifest(&[("0.4", "1.4"), ("0.9", "1.9")]);
        let (target, _) = resolve(&versions, "0.5");
        assert_eq!(target, TargetVersion::Resolved("1.9".to_string()));
    }

    #[test]
    fn falls_back_to_nearest_below() {
        let versions = manifest(&[("0.1", "1.1"), ("0.3", "1.3")]);
        let (target, warnings) = resolve(&versions, "0.5");
        assert_eq!(target, TargetVersion::Resolved("1.3".to_string()));
        assert!(warnings[0].contains("No exact version match found for 0.5"));
    }

    #[test]
    fn below_fallback_ignores_other_majors() {
        let versions = manifest(&[("0.1", "1.2"), ("0.3", "1.4"), ("1.1", "2.2")]);
        let (target, _) = resolve(&versions, "0.5");
        assert_eq!(target, TargetVersion::Resolved("1.4".to_string()));
    }

    #[test]
    fn different_major_means_latest() {
        let versions = manifest(&[("0.1", "1.0"), ("0.4", "1.3"), ("1.0", "2.0"), ("1.2", "2.4")]);
        let (target, warnings) = resolve(&versions, "2.5");
        assert_eq!(target, TargetVersion::UseLatestRelease);
        assert!(warnings[0].contains("No compatible version found"));
    }

    #[test]
    fn empty_manifest_means_latest() {
        let (target, warnings) = resolve(&HashMap::new(), "0.5");
        assert_eq!(target, TargetVersion::UseLatestRelease);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn malformed_request_means_latest() {
        let versions = manifest(&[("0.1", "1.0")]);
        for requested in ["0", "zero.one", ""] {
            let (target, warnings) = resolve(&versions, requested);
            assert_eq!(target, TargetVersion::UseLatestRelease);
            assert!(warnings[0].starts_with("Invalid version"));
        }
    }

    #[test]
    fn malformed_key_poisons_the_manifest() {
        let versions = manifest(&[("0.1", "1.0"), ("0.x", "1.1"), ("0.9", "1.9")]);
        let (target, warnings) = resolve(&versions, "0.5");
        assert_eq!(target, TargetVersion::UseLatestRelease);
        assert_eq!(warnings, vec!["Invalid versions.json. Using latest version."]);
    }

    #[test]
    fn key_without_minor_poisons_the_manifest() {
        let versions = manifest(&[("0", "1.0"), ("0.9", "1.9")]);
        let (target, _) = resolve(&versions, "0.5");
        assert_eq!(target, TargetVersion::UseLatestRelease);
    }

    #[test]
    fn malformed_value_poisons_the_manifest() {
        let versions = manifest(&[("0.1", "1.0"), ("0.9", "latest")]);
        let (target, _) = resolve(&versions, "0.5");
        assert_eq!(target, TargetVersion::UseLatestRelease);
    }

    #[test]
    fn shared_minor_uses_the_major_minor_key() {
        let versions = manifest(&[("0.6", "1.6"), ("0.6.1", "1.7"), ("0.1", "1.1")]);
        for _ in 0..50 {
            let (target, _) = resolve(&versions, "0.5");
            assert_eq!(target, TargetVersion::Resolved("1.6".to_string()));
        }
    }

    #[test]
    fn shared_minor_without_plain_key_takes_lowest_patch() {
        let versions = manifest(&[("0.2.3", "1.3"), ("0.2.1", "1.1"), ("0.2.10", "1.10")]);
        let (target, _) = resolve(&versions, "0.4");
        assert_eq!(target, TargetVersion::Resolved("1.1".to_string()));
    }

    #[test]
    fn same_minor_with_patch_is_not_an_exact_match() {
        let versions = manifest(&[("0.5", "1.6")]);
        let (target, _) = resolve(&versions, "0.5.1");
        assert_eq!(target, TargetVersion::UseLatestRelease);
    }
}
