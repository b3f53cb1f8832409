//! Where a search engine gets its entries from

use std::fs;
use std::path::PathBuf;

use crate::config::SiteConfig;
use crate::error::{PostIndexError, Result};
use crate::index::{IndexBuilder, IndexedPost};

/// A loadable collection of index entries
pub trait IndexSource {
    /// Short label used in logs
    fn name(&self) -> &str;

    fn load(&self) -> Result<Vec<IndexedPost>>;
}

/// The prebuilt `posts-index.json`
#[derive(Debug, Clone)]
pub struct StaticIndexSource {
    path: PathBuf,
}

impl StaticIndexSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StaticIndexSource { path: path.into() }
    }
}

impl IndexSource for StaticIndexSource {
    fn name(&self) -> &str {
        "static"
    }

    fn load(&self) -> Result<Vec<IndexedPost>> {
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PostIndexError::not_found("index file", self.path.display())
            } else {
                PostIndexError::io_operation("read index", self.path.display(), e)
            }
        })?;
        let entries: Vec<IndexedPost> = serde_json::from_str(&raw)?;
        tracing::debug!(path = %self.path.display(), entries = entries.len(), "loaded static index");
        Ok(entries)
    }
}

/// Recompute entries from the content directory, content text included
#[derive(Debug, Clone)]
pub struct LiveContentSource {
    content_root: PathBuf,
    config: SiteConfig,
}

impl LiveContentSource {
    pub fn new(content_root: impl Into<PathBuf>, config: SiteConfig) -> Self {
        LiveContentSource {
            content_root: content_root.into(),
            config,
        }
    }
}

impl IndexSource for LiveContentSource {
    fn name(&self) -> &str {
        "live"
    }

    fn load(&self) -> Result<Vec<IndexedPost>> {
        let output = IndexBuilder::new(&self.config, &self.content_root).build()?;
        Ok(output
            .posts
            .iter()
            .map(|p| IndexedPost::from_post(p, true))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_static_source() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("posts-index.json");
        fs::write(
            &path,
            r#"[{"slug":"big-o","title":"Big O Notation","excerpt":"e","tags":["algorithms"],"readingTime":"3 min read"}]"#,
        )
        .unwrap();

        let entries = StaticIndexSource::new(&path).load().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].reading_time, "3 min read");
    }

    #[test]
    fn test_static_source_missing_and_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("posts-index.json");
        assert!(matches!(
            StaticIndexSource::new(&path).load(),
            Err(PostIndexError::NotFound { .. })
        ));

        fs::write(&path, "{\"not\": \"an array\"}").unwrap();
        assert!(matches!(
            StaticIndexSource::new(&path).load(),
            Err(PostIndexError::Json(_))
        ));
    }

    #[test]
    fn test_live_source_includes_content() {
        let dir = tempdir().unwrap();
        let post = dir.path().join("big-o");
        fs::create_dir_all(&post).unwrap();
        fs::write(post.join("metadata.ts"), "export const metadata = { title: 'Big O' }").unwrap();
        fs::write(post.join("index.mdx"), "Growth of **functions**.").unwrap();

        let entries = LiveContentSource::new(dir.path(), SiteConfig::default())
            .load()
            .unwrap();
        assert_eq!(entries[0].content.as_deref(), Some("Growth of functions."));
    }
}
