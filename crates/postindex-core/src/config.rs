//! Site configuration for postindex
//!
//! Configuration is stored in `postindex.toml` at the project root. Every
//! field has a default, so a missing file is equivalent to an empty one.

pub mod types;

use std::fs;
use std::path::{Path, PathBuf};

use crate::bail_invalid;
use crate::error::{PostIndexError, Result};

pub use types::{BuildConfig, SearchConfig, SiteConfig};

/// Configuration file name looked up at the project root
pub const CONFIG_FILE: &str = "postindex.toml";

/// Posts index file name inside the output directory
pub const POSTS_INDEX_FILE: &str = "posts-index.json";

/// Aggregate statistics file name inside the output directory
pub const BLOG_STATS_FILE: &str = "blog-stats.json";

/// Learning paths file name inside the output directory
pub const LEARNING_PATHS_FILE: &str = "learning-paths.json";

/// Combined data file name inside the output directory
pub const BLOG_DATA_FILE: &str = "blog-data.json";

/// Upper bound on `search.max_results`
pub const RESULT_LIMIT: usize = 20;

/// Build cache file name inside the cache directory
pub const BUILD_CACHE_FILE: &str = "build-cache.json";

impl SiteConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| PostIndexError::io_operation("read config", path.display(), e))?;
        let config: SiteConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `postindex.toml` from `root` if present, defaults otherwise
    pub fn discover(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading config");
            Self::load(&path)
        } else {
            tracing::debug!(root = %root.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| PostIndexError::Other(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)
            .map_err(|e| PostIndexError::io_operation("write config", path.display(), e))?;
        Ok(())
    }

    /// Reject values the builder and search engine cannot work with
    pub fn validate(&self) -> Result<()> {
        let threshold = self.build.change_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            bail_invalid!("change_threshold", threshold);
        }
        if self.build.words_per_minute == 0 {
            bail_invalid!("words_per_minute", 0);
        }
        let max_results = self.search.max_results;
        if max_results == 0 || max_results > RESULT_LIMIT {
            bail_invalid!("max_results", max_results);
        }
        if self.metadata_files.is_empty() {
            bail_invalid!("metadata_files", "[]");
        }
        Ok(())
    }

    pub fn content_root(&self, root: &Path) -> PathBuf {
        root.join(&self.content_dir)
    }

    pub fn output_root(&self, root: &Path) -> PathBuf {
        root.join(&self.output_dir)
    }

    pub fn cache_path(&self, root: &Path) -> PathBuf {
        root.join(&self.cache_dir).join(BUILD_CACHE_FILE)
    }

    pub fn posts_index_path(&self, root: &Path) -> PathBuf {
        self.output_root(root).join(POSTS_INDEX_FILE)
    }

    pub fn stats_path(&self, root: &Path) -> PathBuf {
        self.output_root(root).join(BLOG_STATS_FILE)
    }
}
