//! Cache-aware build pipeline
//!
//! Hash the content tree, plan against the build cache, extract (reusing
//! cached posts where possible), write outputs and refresh the cache.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;

use super::builder::{IndexBuilder, SkippedPost};
use super::stats::BlogStats;
use super::writer::{outputs_present, write_artifacts};
use super::Artifacts;
use crate::cache::{
    hash_content_tree, plan_build, settings_digest, BuildCache, BuildPlan, CachePolicy,
    RebuildReason,
};
use crate::config::SiteConfig;
use crate::error::{PostIndexError, Result};
use crate::logging::ResourceMetrics;
use crate::{log_resource_metrics, trace_time};

/// Per-run switches that are not part of the site configuration
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Ignore the cache and rebuild everything
    pub force: bool,
    /// Set by the host (e.g. a Ctrl-C handler) to abort extraction
    pub interrupted: Option<Arc<AtomicBool>>,
}

/// What a build run ended up doing
#[derive(Debug, Clone, PartialEq)]
pub enum BuildOutcome {
    /// Outputs were current; nothing was written
    UpToDate,
    /// Only changed directories were re-extracted
    Incremental { changed_files: usize },
    /// Every directory was extracted
    Full { reason: RebuildReason },
}

/// Summary of a build run
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub outcome: BuildOutcome,
    /// Posts present in the outputs
    pub posts_indexed: usize,
    pub skipped: Vec<SkippedPost>,
    /// Posts taken from the build cache
    pub reused: u64,
    /// Posts extracted from source
    pub extracted: u64,
    pub files_written: Vec<PathBuf>,
    /// Statistics written this run (absent when up to date)
    pub stats: Option<BlogStats>,
}

impl BuildReport {
    fn up_to_date(posts: usize) -> Self {
        BuildReport {
            outcome: BuildOutcome::UpToDate,
            posts_indexed: posts,
            skipped: Vec::new(),
            reused: 0,
            extracted: 0,
            files_written: Vec::new(),
            stats: None,
        }
    }
}

/// Run a build for the project at `root`
#[tracing::instrument(skip(config, options), fields(root = %root.display()))]
pub fn run_build(root: &Path, config: &SiteConfig, options: &BuildOptions) -> Result<BuildReport> {
    let start = Instant::now();
    let content_root = config.content_root(root);
    if !content_root.is_dir() {
        return Err(PostIndexError::ContentRootNotFound { path: content_root });
    }
    let output_dir = config.output_root(root);
    let cache_path = config.cache_path(root);
    let metrics = ResourceMetrics::new();

    let cache = BuildCache::load(&cache_path);
    let current = hash_content_tree(&content_root, &metrics)?;
    let settings = settings_digest(config);
    let now = Utc::now();
    let plan = plan_build(
        &cache,
        &current,
        &settings,
        now,
        outputs_present(&output_dir),
        &CachePolicy::from_config(&config.build),
        options.force,
    );

    let builder = IndexBuilder::new(config, &content_root).with_metrics(&metrics);
    let builder = match &options.interrupted {
        Some(flag) => builder.with_interrupt(Arc::clone(flag)),
        None => builder,
    };

    let (output, outcome) = match &plan {
        BuildPlan::Skip => {
            tracing::info!(posts = cache.posts.len(), "outputs up to date");
            return Ok(BuildReport::up_to_date(cache.posts.len()));
        }
        BuildPlan::Incremental(changes) => {
            tracing::info!(changed = changes.len(), "incremental build");
            let output = builder.with_cache(&cache, changes).build()?;
            let outcome = BuildOutcome::Incremental {
                changed_files: changes.len(),
            };
            (output, outcome)
        }
        BuildPlan::Full(reason) => {
            tracing::info!(reason = %reason, "full build");
            let outcome = BuildOutcome::Full {
                reason: reason.clone(),
            };
            (builder.build()?, outcome)
        }
    };

    let artifacts = Artifacts::assemble(
        &output.posts,
        config.build.include_content,
        config.build.recent_posts,
        now,
    );
    let files_written = write_artifacts(&output_dir, &artifacts)?;

    let refreshed = BuildCache {
        last_build: Some(now),
        file_hashes: current,
        settings,
        posts: output
            .posts
            .iter()
            .map(|p| (p.slug.clone(), p.clone()))
            .collect::<BTreeMap<_, _>>(),
        ..Default::default()
    };
    if let Err(e) = refreshed.save(&cache_path) {
        tracing::warn!(path = %cache_path.display(), error = %e, "could not save build cache");
    }

    log_resource_metrics!(&metrics, "build");
    trace_time!(start, "run_build", posts = output.posts.len());

    Ok(BuildReport {
        outcome,
        posts_indexed: output.posts.len(),
        skipped: output.skipped,
        reused: metrics.cache_hits(),
        extracted: metrics.cache_misses(),
        files_written,
        stats: Some(artifacts.stats),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BLOG_STATS_FILE, LEARNING_PATHS_FILE, POSTS_INDEX_FILE};
    use std::fs;
    use tempfile::tempdir;

    fn write_post(root: &Path, slug: &str, metadata: &str) {
        let dir = root.join("src").join("posts").join(slug);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("metadata.ts"), metadata).unwrap();
    }

    fn site() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        write_post(
            dir.path(),
            "big-o",
            "export const metadata = { title: 'Big O Notation', date: '2024-03-15', tags: ['algorithms', 'big-o'] }",
        );
        write_post(
            dir.path(),
            "hash-tables",
            "export const metadata = { title: 'Hash Tables', date: '2024-02-10', tags: ['data-structures'] }",
        );
        write_post(dir.path(), "draft", "export const metadata = { excerpt: 'untitled' }");
        dir
    }

    #[test]
    fn test_first_build_writes_outputs() {
        let dir = site();
        let config = SiteConfig::default();
        let report = run_build(dir.path(), &config, &BuildOptions::default()).unwrap();

        assert_eq!(
            report.outcome,
            BuildOutcome::Full {
                reason: RebuildReason::FirstBuild
            }
        );
        assert_eq!(report.posts_indexed, 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.files_written.len(), 4);

        let out = config.output_root(dir.path());
        let index: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join(POSTS_INDEX_FILE)).unwrap())
                .unwrap();
        assert_eq!(index[0]["slug"], "big-o");
        assert_eq!(index[1]["slug"], "hash-tables");
        assert!(config.cache_path(dir.path()).is_file());
    }

    #[test]
    fn test_rebuild_is_byte_identical() {
        let dir = site();
        let config = SiteConfig::default();
        let out = config.output_root(dir.path());
        let force = BuildOptions {
            force: true,
            ..Default::default()
        };

        run_build(dir.path(), &config, &force).unwrap();
        let index = fs::read(out.join(POSTS_INDEX_FILE)).unwrap();
        let paths = fs::read(out.join(LEARNING_PATHS_FILE)).unwrap();

        run_build(dir.path(), &config, &force).unwrap();
        assert_eq!(index, fs::read(out.join(POSTS_INDEX_FILE)).unwrap());
        assert_eq!(paths, fs::read(out.join(LEARNING_PATHS_FILE)).unwrap());
    }

    #[test]
    fn test_second_build_is_skipped() {
        let dir = site();
        let config = SiteConfig::default();
        run_build(dir.path(), &config, &BuildOptions::default()).unwrap();

        let stats_path = config.output_root(dir.path()).join(BLOG_STATS_FILE);
        let stats_before = fs::read_to_string(&stats_path).unwrap();

        let report = run_build(dir.path(), &config, &BuildOptions::default()).unwrap();
        assert_eq!(report.outcome, BuildOutcome::UpToDate);
        assert_eq!(report.posts_indexed, 2);
        assert_eq!(stats_before, fs::read_to_string(&stats_path).unwrap());
    }

    #[test]
    fn test_small_change_rebuilds_incrementally() {
        let dir = site();
        for i in 0..5 {
            write_post(
                dir.path(),
                &format!("extra-{}", i),
                &format!("export const metadata = {{ title: 'Extra {}' }}", i),
            );
        }
        let config = SiteConfig::default();
        run_build(dir.path(), &config, &BuildOptions::default()).unwrap();

        write_post(
            dir.path(),
            "hash-tables",
            "export const metadata = { title: 'Hash Tables Revisited', date: '2024-02-10' }",
        );
        let report = run_build(dir.path(), &config, &BuildOptions::default()).unwrap();

        assert_eq!(
            report.outcome,
            BuildOutcome::Incremental { changed_files: 1 }
        );
        assert_eq!(report.extracted, 2);
        assert_eq!(report.reused, 6);

        let index = fs::read_to_string(config.posts_index_path(dir.path())).unwrap();
        assert!(index.contains("Hash Tables Revisited"));
    }

    #[test]
    fn test_removed_post_rebuilds_incrementally() {
        let dir = site();
        for i in 0..7 {
            write_post(
                dir.path(),
                &format!("extra-{}", i),
                &format!("export const metadata = {{ title: 'Extra {}' }}", i),
            );
        }
        let config = SiteConfig::default();
        let first = run_build(dir.path(), &config, &BuildOptions::default()).unwrap();
        assert_eq!(first.posts_indexed, 9);

        fs::remove_dir_all(dir.path().join("src").join("posts").join("extra-3")).unwrap();
        let report = run_build(dir.path(), &config, &BuildOptions::default()).unwrap();

        assert_eq!(
            report.outcome,
            BuildOutcome::Incremental { changed_files: 1 }
        );
        assert_eq!(report.posts_indexed, 8);
        assert_eq!(report.extracted, 1);
        assert_eq!(report.reused, 8);

        let index = fs::read_to_string(config.posts_index_path(dir.path())).unwrap();
        assert!(!index.contains("extra-3"));
        assert!(index.contains("extra-4"));
    }

    #[test]
    fn test_missing_content_root() {
        let dir = tempdir().unwrap();
        let err = run_build(dir.path(), &SiteConfig::default(), &BuildOptions::default())
            .unwrap_err();
        assert!(matches!(err, PostIndexError::ContentRootNotFound { .. }));
    }
}
