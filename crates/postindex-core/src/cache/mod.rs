//! Build cache: per-file content digests and previously extracted posts
//!
//! The cache lets `build` skip regeneration when nothing changed and reuse
//! extracted posts for directories whose files are untouched.

pub mod plan;

use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::config::SiteConfig;
use crate::error::{PostIndexError, Result};
use crate::logging::ResourceMetrics;
use crate::post::Post;

pub use plan::{plan_build, BuildPlan, CachePolicy, ChangeSet, RebuildReason};

/// Current build cache format version
pub const CACHE_FORMAT_VERSION: u32 = 1;

/// Digest map keyed by path relative to the content root (`/` separated)
pub type FileHashes = BTreeMap<String, String>;

/// Persistent state carried between builds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildCache {
    pub version: u32,
    #[serde(default)]
    pub last_build: Option<DateTime<Utc>>,
    #[serde(default)]
    pub file_hashes: FileHashes,
    /// Digest of the settings the outputs were generated with
    #[serde(default)]
    pub settings: String,
    /// Extracted posts keyed by slug
    #[serde(default)]
    pub posts: BTreeMap<String, Post>,
}

impl Default for BuildCache {
    fn default() -> Self {
        Self {
            version: CACHE_FORMAT_VERSION,
            last_build: None,
            file_hashes: FileHashes::new(),
            settings: String::new(),
            posts: BTreeMap::new(),
        }
    }
}

impl BuildCache {
    /// Load the cache, treating a missing or unreadable file as empty
    pub fn load(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read build cache");
                return Self::default();
            }
        };

        match serde_json::from_str::<BuildCache>(&raw) {
            Ok(cache) => cache,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt build cache");
                Self::default()
            }
        }
    }

    /// Write the cache, creating its directory if needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                PostIndexError::io_operation("create cache directory", parent.display(), e)
            })?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .map_err(|e| PostIndexError::io_operation("write build cache", path.display(), e))?;
        Ok(())
    }

    /// Whether every tracked file of `slug` kept its digest
    pub fn slug_unchanged(&self, slug: &str, changes: &ChangeSet) -> bool {
        let prefix = format!("{}/", slug);
        !changes.paths().any(|p| p.starts_with(&prefix))
    }
}

/// Digest of every setting that changes extracted posts or output shape
pub fn settings_digest(config: &SiteConfig) -> String {
    let mut hasher = Sha256::new();
    for name in config.metadata_files.iter().chain(config.content_files.iter()) {
        hasher.update(name.as_bytes());
        hasher.update([0]);
    }
    let build = serde_json::to_string(&config.build).unwrap_or_default();
    hasher.update(build.as_bytes());
    hex::encode(hasher.finalize())
}

/// SHA-256 digest of a file as lowercase hex
pub fn hash_file(path: &Path, metrics: &ResourceMetrics) -> Result<String> {
    let mut file = fs::File::open(path)
        .map_err(|e| PostIndexError::io_operation("open", path.display(), e))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file
            .read(&mut buf)
            .map_err(|e| PostIndexError::io_operation("read", path.display(), e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        metrics.record_hashed(n as u64);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Hash every file under each content subdirectory of `content_root`
///
/// Hidden entries are ignored. Files that disappear or cannot be read
/// between listing and hashing are left out with a warning.
pub fn hash_content_tree(content_root: &Path, metrics: &ResourceMetrics) -> Result<FileHashes> {
    let mut hashes = FileHashes::new();

    let walker = WalkDir::new(content_root)
        .min_depth(2)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

    for entry in walker {
        let entry = entry.map_err(|e| {
            PostIndexError::io_operation("scan", content_root.display(), e)
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = match entry.path().strip_prefix(content_root) {
            Ok(rel) => rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
            Err(_) => continue,
        };

        match hash_file(entry.path(), metrics) {
            Ok(digest) => {
                hashes.insert(relative, digest);
            }
            Err(e) => tracing::warn!(path = %entry.path().display(), error = %e, "skipping unhashable file"),
        }
    }

    Ok(hashes)
}
