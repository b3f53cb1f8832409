//! Configuration type definitions

use serde::{Deserialize, Serialize};

/// Site configuration (`postindex.toml`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Directory holding one subdirectory per post
    #[serde(default = "default_content_dir")]
    pub content_dir: String,

    /// Directory receiving the generated JSON files
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Directory holding the build cache
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    /// Metadata declaration file names, tried in order
    #[serde(default = "default_metadata_files")]
    pub metadata_files: Vec<String>,

    /// Content body file names, tried in order
    #[serde(default = "default_content_files")]
    pub content_files: Vec<String>,

    /// Index builder settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Search engine settings
    #[serde(default)]
    pub search: SearchConfig,
}

/// Configuration for the index builder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Number of posts listed under `recentPosts`
    #[serde(default = "default_recent_posts")]
    pub recent_posts: usize,

    /// Write plain-text content into `posts-index.json`
    #[serde(default)]
    pub include_content: bool,

    /// Fraction of changed files that forces a full rebuild
    #[serde(default = "default_change_threshold")]
    pub change_threshold: f64,

    /// Cache age after which a full rebuild is forced
    #[serde(default = "default_max_cache_age_hours")]
    pub max_cache_age_hours: u64,

    /// Reading speed used for reading-time estimates
    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: usize,

    /// Reading time used when a post has no content body
    #[serde(default = "default_reading_time")]
    pub default_reading_time: String,
}

/// Configuration for search ranking parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Trimmed queries shorter than this return no results
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    /// Results must score strictly above this
    #[serde(default = "default_min_score")]
    pub min_score: u32,

    /// Maximum number of results returned
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Quiet period for interactive queries
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_content_dir() -> String {
    "src/posts".to_string()
}

fn default_output_dir() -> String {
    "public/data".to_string()
}

fn default_cache_dir() -> String {
    ".cache/postindex".to_string()
}

fn default_metadata_files() -> Vec<String> {
    vec!["metadata.ts".to_string(), "metadata.json".to_string()]
}

fn default_content_files() -> Vec<String> {
    vec![
        "index.mdx".to_string(),
        "index.md".to_string(),
        "content.md".to_string(),
    ]
}

fn default_recent_posts() -> usize {
    10
}

fn default_change_threshold() -> f64 {
    0.3
}

fn default_max_cache_age_hours() -> u64 {
    24
}

fn default_words_per_minute() -> usize {
    200
}

fn default_reading_time() -> String {
    "5 min read".to_string()
}

fn default_min_query_len() -> usize {
    2
}

fn default_min_score() -> u32 {
    10
}

fn default_max_results() -> usize {
    20
}

fn default_debounce_ms() -> u64 {
    300
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            output_dir: default_output_dir(),
            cache_dir: default_cache_dir(),
            metadata_files: default_metadata_files(),
            content_files: default_content_files(),
            build: BuildConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            recent_posts: default_recent_posts(),
            include_content: false,
            change_threshold: default_change_threshold(),
            max_cache_age_hours: default_max_cache_age_hours(),
            words_per_minute: default_words_per_minute(),
            default_reading_time: default_reading_time(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_len: default_min_query_len(),
            min_score: default_min_score(),
            max_results: default_max_results(),
            debounce_ms: default_debounce_ms(),
        }
    }
}
