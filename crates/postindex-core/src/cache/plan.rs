//! Decide between skipping, incremental and full builds

use std::fmt;

use chrono::{DateTime, Duration, Utc};

use super::{BuildCache, FileHashes, CACHE_FORMAT_VERSION};
use crate::config::BuildConfig;

/// Thresholds that force a full rebuild
#[derive(Debug, Clone)]
pub struct CachePolicy {
    /// Fraction of tracked files that may change before a full rebuild
    pub change_threshold: f64,
    /// Maximum time since the last build
    pub max_age: Duration,
}

impl CachePolicy {
    pub fn from_config(config: &BuildConfig) -> Self {
        Self {
            change_threshold: config.change_threshold,
            max_age: Duration::hours(config.max_cache_age_hours as i64),
        }
    }
}

/// Files added, modified or removed since the last build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub added: Vec<String>,
    pub modified: Vec<String>,
    pub removed: Vec<String>,
}

impl ChangeSet {
    pub fn between(previous: &FileHashes, current: &FileHashes) -> Self {
        let mut changes = ChangeSet::default();
        for (path, digest) in current {
            match previous.get(path) {
                None => changes.added.push(path.clone()),
                Some(old) if old != digest => changes.modified.push(path.clone()),
                Some(_) => {}
            }
        }
        changes.removed = previous
            .keys()
            .filter(|p| !current.contains_key(*p))
            .cloned()
            .collect();
        changes
    }

    pub fn len(&self) -> usize {
        self.added.len() + self.modified.len() + self.removed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.added
            .iter()
            .chain(self.modified.iter())
            .chain(self.removed.iter())
    }
}

/// Why a full rebuild was chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebuildReason {
    Forced,
    FirstBuild,
    SettingsChanged,
    VersionMismatch { found: u32 },
    Stale { hours: i64 },
    MissingOutputs,
    ManyChanges { changed: usize, total: usize },
}

impl fmt::Display for RebuildReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RebuildReason::Forced => write!(f, "forced"),
            RebuildReason::FirstBuild => write!(f, "first build"),
            RebuildReason::SettingsChanged => write!(f, "build settings changed"),
            RebuildReason::VersionMismatch { found } => {
                write!(f, "cache version {} != {}", found, CACHE_FORMAT_VERSION)
            }
            RebuildReason::Stale { hours } => write!(f, "last build {}h ago", hours),
            RebuildReason::MissingOutputs => write!(f, "output files missing"),
            RebuildReason::ManyChanges { changed, total } => {
                write!(f, "{} of {} files changed", changed, total)
            }
        }
    }
}

/// What a build run should do
#[derive(Debug, Clone, PartialEq)]
pub enum BuildPlan {
    /// Nothing changed, outputs are current
    Skip,
    /// Re-extract only directories touched by the change set
    Incremental(ChangeSet),
    /// Re-extract everything
    Full(RebuildReason),
}

/// Choose a build plan from the cache and the current content digests
///
/// `settings` is the digest of the build settings that shape the outputs
/// (see [`super::settings_digest`]).
pub fn plan_build(
    cache: &BuildCache,
    current: &FileHashes,
    settings: &str,
    now: DateTime<Utc>,
    outputs_present: bool,
    policy: &CachePolicy,
    force: bool,
) -> BuildPlan {
    if force {
        return BuildPlan::Full(RebuildReason::Forced);
    }
    if cache.version != CACHE_FORMAT_VERSION {
        return BuildPlan::Full(RebuildReason::VersionMismatch {
            found: cache.version,
        });
    }
    let last_build = match cache.last_build {
        Some(ts) => ts,
        None => return BuildPlan::Full(RebuildReason::FirstBuild),
    };
    if cache.settings != settings {
        return BuildPlan::Full(RebuildReason::SettingsChanged);
    }

    let age = now.signed_duration_since(last_build);
    if age > policy.max_age {
        return BuildPlan::Full(RebuildReason::Stale {
            hours: age.num_hours(),
        });
    }

    let changes = ChangeSet::between(&cache.file_hashes, current);
    if !outputs_present {
        return BuildPlan::Full(RebuildReason::MissingOutputs);
    }
    if changes.is_empty() {
        return BuildPlan::Skip;
    }

    let total = (cache.file_hashes.len() + changes.added.len()).max(1);
    if changes.len() as f64 / total as f64 >= policy.change_threshold {
        return BuildPlan::Full(RebuildReason::ManyChanges {
            changed: changes.len(),
            total,
        });
    }

    BuildPlan::Incremental(changes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hashes(entries: &[(&str, &str)]) -> FileHashes {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn ten_files() -> FileHashes {
        (0..10)
            .map(|i| (format!("post-{}/metadata.ts", i), format!("h{}", i)))
            .collect()
    }

    fn cache_with(files: FileHashes, built: DateTime<Utc>) -> BuildCache {
        BuildCache {
            last_build: Some(built),
            file_hashes: files,
            settings: "cfg".to_string(),
            ..Default::default()
        }
    }

    fn policy() -> CachePolicy {
        CachePolicy::from_config(&BuildConfig::default())
    }

    #[test]
    fn test_change_set() {
        let prev = hashes(&[("a/x", "1"), ("b/x", "2"), ("c/x", "3")]);
        let cur = hashes(&[("a/x", "1"), ("b/x", "9"), ("d/x", "4")]);
        let changes = ChangeSet::between(&prev, &cur);
        assert_eq!(changes.added, vec!["d/x"]);
        assert_eq!(changes.modified, vec!["b/x"]);
        assert_eq!(changes.removed, vec!["c/x"]);
        assert_eq!(changes.len(), 3);
    }

    #[test]
    fn test_first_build_and_force() {
        let now = Utc::now();
        let cache = BuildCache::default();
        assert_eq!(
            plan_build(&cache, &ten_files(), "cfg", now, true, &policy(), false),
            BuildPlan::Full(RebuildReason::FirstBuild)
        );

        let cache = cache_with(ten_files(), now);
        assert_eq!(
            plan_build(&cache, &ten_files(), "cfg", now, true, &policy(), true),
            BuildPlan::Full(RebuildReason::Forced)
        );
    }

    #[test]
    fn test_unchanged_tree_is_skipped() {
        let now = Utc::now();
        let cache = cache_with(ten_files(), now - Duration::hours(1));
        assert_eq!(
            plan_build(&cache, &ten_files(), "cfg", now, true, &policy(), false),
            BuildPlan::Skip
        );
    }

    #[test]
    fn test_missing_outputs_force_rebuild() {
        let now = Utc::now();
        let cache = cache_with(ten_files(), now);
        assert_eq!(
            plan_build(&cache, &ten_files(), "cfg", now, false, &policy(), false),
            BuildPlan::Full(RebuildReason::MissingOutputs)
        );
    }

    #[test]
    fn test_stale_cache() {
        let now = Utc::now();
        let cache = cache_with(ten_files(), now - Duration::hours(25));
        assert_eq!(
            plan_build(&cache, &ten_files(), "cfg", now, true, &policy(), false),
            BuildPlan::Full(RebuildReason::Stale { hours: 25 })
        );
    }

    #[test]
    fn test_small_change_is_incremental() {
        let now = Utc::now();
        let cache = cache_with(ten_files(), now);
        let mut current = ten_files();
        current.insert("post-3/metadata.ts".to_string(), "changed".to_string());

        match plan_build(&cache, &current, "cfg", now, true, &policy(), false) {
            BuildPlan::Incremental(changes) => {
                assert_eq!(changes.modified, vec!["post-3/metadata.ts"]);
            }
            other => panic!("expected incremental plan, got {:?}", other),
        }
    }

    #[test]
    fn test_many_changes_force_full_build() {
        let now = Utc::now();
        let cache = cache_with(ten_files(), now);
        let mut current = ten_files();
        for i in 0..3 {
            current.insert(format!("post-{}/metadata.ts", i), "changed".to_string());
        }

        assert_eq!(
            plan_build(&cache, &current, "cfg", now, true, &policy(), false),
            BuildPlan::Full(RebuildReason::ManyChanges {
                changed: 3,
                total: 10
            })
        );
    }

    #[test]
    fn test_settings_change_forces_rebuild() {
        let now = Utc::now();
        let cache = cache_with(ten_files(), now);
        assert_eq!(
            plan_build(&cache, &ten_files(), "other", now, true, &policy(), false),
            BuildPlan::Full(RebuildReason::SettingsChanged)
        );
    }

    #[test]
    fn test_version_mismatch() {
        let now = Utc::now();
        let mut cache = cache_with(ten_files(), now);
        cache.version = 0;
        assert_eq!(
            plan_build(&cache, &ten_files(), "cfg", now, true, &policy(), false),
            BuildPlan::Full(RebuildReason::VersionMismatch { found: 0 })
        );
    }
}
