use std::cmp::Ordering as CmpOrdering;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use walkdir::WalkDir;

use crate::cache::{BuildCache, ChangeSet};
use crate::config::SiteConfig;
use crate::error::{PostIndexError, Result};
use crate::logging::ResourceMetrics;
use crate::post::{load_post, Extraction, Post, SkipReason};
use crate::trace_time;

/// A content directory left out of the index
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedPost {
    pub slug: String,
    pub reason: SkipReason,
}

/// Result of scanning the content root
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    /// Extracted posts, date descending then slug ascending
    pub posts: Vec<Post>,
    pub skipped: Vec<SkippedPost>,
}

/// Index builder - scans the content root and extracts one post per directory
pub struct IndexBuilder<'a> {
    config: &'a SiteConfig,
    content_root: PathBuf,
    reuse: Option<(&'a BuildCache, &'a ChangeSet)>,
    interrupted: Option<Arc<AtomicBool>>,
    metrics: Option<&'a ResourceMetrics>,
}

impl<'a> IndexBuilder<'a> {
    /// Create a new index builder
    pub fn new(config: &'a SiteConfig, content_root: impl Into<PathBuf>) -> Self {
        IndexBuilder {
            config,
            content_root: content_root.into(),
            reuse: None,
            interrupted: None,
            metrics: None,
        }
    }

    /// Reuse cached posts for directories untouched by `changes`
    pub fn with_cache(mut self, cache: &'a BuildCache, changes: &'a ChangeSet) -> Self {
        self.reuse = Some((cache, changes));
        self
    }

    /// Abort between directories once `flag` is set
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupted = Some(flag);
        self
    }

    pub fn with_metrics(mut self, metrics: &'a ResourceMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Build the post list
    #[tracing::instrument(skip(self), fields(content_root = %self.content_root.display()))]
    pub fn build(self) -> Result<BuildOutput> {
        let start = Instant::now();
        let dirs = self.list_post_dirs()?;
        let mut output = BuildOutput::default();

        for (slug, dir) in dirs {
            if self
                .interrupted
                .as_ref()
                .is_some_and(|flag| flag.load(Ordering::SeqCst))
            {
                return Err(PostIndexError::Interrupted);
            }

            if let Some(post) = self.cached_post(&slug) {
                tracing::trace!(slug = %slug, "reusing cached post");
                output.posts.push(post);
                continue;
            }
            if let Some(metrics) = self.metrics {
                metrics.record_cache_miss();
            }

            match load_post(&dir, &slug, self.config) {
                Extraction::Loaded(post) => {
                    tracing::debug!(slug = %slug, source = %post.source, "extracted post");
                    output.posts.push(post);
                }
                Extraction::Skipped(reason) => {
                    tracing::warn!(slug = %slug, reason = %reason, "skipping post");
                    output.skipped.push(SkippedPost { slug, reason });
                }
            }
        }

        sort_posts(&mut output.posts);
        trace_time!(start, "index_build", posts = output.posts.len());
        Ok(output)
    }

    fn cached_post(&self, slug: &str) -> Option<Post> {
        let (cache, changes) = self.reuse?;
        if !cache.slug_unchanged(slug, changes) {
            return None;
        }
        let post = cache.posts.get(slug)?.clone();
        if let Some(metrics) = self.metrics {
            metrics.record_cache_hit();
        }
        Some(post)
    }

    /// Visible subdirectories of the content root, sorted by name
    fn list_post_dirs(&self) -> Result<Vec<(String, PathBuf)>> {
        if !self.content_root.is_dir() {
            return Err(PostIndexError::ContentRootNotFound {
                path: self.content_root.clone(),
            });
        }

        let mut dirs = Vec::new();
        let walker = WalkDir::new(&self.content_root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| {
                PostIndexError::io_operation("scan", self.content_root.display(), e)
            })?;
            if !entry.file_type().is_dir() {
                continue;
            }
            let slug = entry.file_name().to_string_lossy().to_string();
            if slug.starts_with('.') {
                continue;
            }
            dirs.push((slug, entry.path().to_path_buf()));
        }

        Ok(dirs)
    }
}

/// Order posts newest first; undated posts last, ties by slug
pub fn sort_posts(posts: &mut [Post]) {
    posts.sort_by(|a, b| match (a.date(), b.date()) {
        (Some(da), Some(db)) => db.cmp(da).then_with(|| a.slug.cmp(&b.slug)),
        (Some(_), None) => CmpOrdering::Less,
        (None, Some(_)) => CmpOrdering::Greater,
        (None, None) => a.slug.cmp(&b.slug),
    });
}
