//! Per-directory post extraction
//!
//! Extraction never fails the caller: every problem with a single post turns
//! into an [`Extraction::Skipped`] with the reason attached.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::{pattern, structured, MetadataSource, Post, PostMetadata};
use crate::config::SiteConfig;
use crate::text;

/// Outcome of extracting one content directory
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Loaded(Post),
    Skipped(SkipReason),
}

/// Why a content directory was left out of the index
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Neither a metadata file nor content frontmatter exists
    NoMetadata,
    /// The metadata source could not be read or parsed
    Unreadable { file: PathBuf, reason: String },
    /// Metadata was found but has no non-empty title
    MissingTitle { file: PathBuf },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoMetadata => write!(f, "no metadata file"),
            SkipReason::Unreadable { file, reason } => {
                write!(f, "unreadable metadata in {}: {}", file.display(), reason)
            }
            SkipReason::MissingTitle { file } => {
                write!(f, "missing title in {}", file.display())
            }
        }
    }
}

fn first_existing(dir: &Path, names: &[String]) -> Option<PathBuf> {
    names.iter().map(|n| dir.join(n)).find(|p| p.is_file())
}

/// Extract the post stored in `dir`, identified by `slug`
pub fn load_post(dir: &Path, slug: &str, config: &SiteConfig) -> Extraction {
    let content_doc = first_existing(dir, &config.content_files).and_then(|path| {
        fs::read_to_string(&path)
            .map_err(|e| {
                tracing::warn!(slug, path = %path.display(), error = %e, "unreadable content file");
            })
            .ok()
            .map(|doc| (path, doc))
    });

    let (frontmatter, body) = match &content_doc {
        Some((_, doc)) => text::split_frontmatter(doc),
        None => (None, ""),
    };

    let resolved = match first_existing(dir, &config.metadata_files) {
        Some(file) => resolve_declaration(&file),
        None => match (&content_doc, frontmatter) {
            (Some((file, _)), Some(yaml)) => resolve_frontmatter(file, yaml),
            _ => Err(SkipReason::NoMetadata),
        },
    };

    match resolved {
        Ok((metadata, source)) => Extraction::Loaded(assemble(slug, metadata, source, body, config)),
        Err(reason) => Extraction::Skipped(reason),
    }
}

fn resolve_declaration(file: &Path) -> Result<(PostMetadata, MetadataSource), SkipReason> {
    let raw = fs::read_to_string(file).map_err(|e| SkipReason::Unreadable {
        file: file.to_path_buf(),
        reason: e.to_string(),
    })?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let (metadata, source) = match structured::parse_declaration(&file_name, &raw) {
        Ok(metadata) => (metadata, MetadataSource::Structured),
        Err(e) => {
            tracing::debug!(path = %file.display(), error = %e, "structured load failed, using pattern fallback");
            match pattern::extract(&raw) {
                Some(metadata) => (metadata, MetadataSource::Pattern),
                None => {
                    return Err(SkipReason::MissingTitle {
                        file: file.to_path_buf(),
                    })
                }
            }
        }
    };

    require_title(metadata, source, file)
}

fn resolve_frontmatter(
    file: &Path,
    yaml: &str,
) -> Result<(PostMetadata, MetadataSource), SkipReason> {
    let metadata = structured::parse_frontmatter(yaml).map_err(|e| SkipReason::Unreadable {
        file: file.to_path_buf(),
        reason: e.to_string(),
    })?;
    require_title(metadata, MetadataSource::Frontmatter, file)
}

fn require_title(
    mut metadata: PostMetadata,
    source: MetadataSource,
    file: &Path,
) -> Result<(PostMetadata, MetadataSource), SkipReason> {
    metadata.title = metadata.title.trim().to_string();
    if metadata.title.is_empty() {
        return Err(SkipReason::MissingTitle {
            file: file.to_path_buf(),
        });
    }
    Ok((metadata, source))
}

fn assemble(
    slug: &str,
    metadata: PostMetadata,
    source: MetadataSource,
    body: &str,
    config: &SiteConfig,
) -> Post {
    let plain = Some(text::to_plain_text(body)).filter(|p| !p.is_empty());

    let excerpt = metadata
        .excerpt
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .or_else(|| plain.as_deref().map(text::generate_excerpt))
        .unwrap_or_else(|| format!("Learn about {}", metadata.title));

    let reading_time = match &plain {
        Some(p) => text::reading_time(p, config.build.words_per_minute),
        None => config.build.default_reading_time.clone(),
    };

    Post {
        slug: slug.to_string(),
        metadata,
        excerpt,
        reading_time,
        content: plain,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn loaded(extraction: Extraction) -> Post {
        match extraction {
            Extraction::Loaded(post) => post,
            Extraction::Skipped(reason) => panic!("unexpected skip: {}", reason),
        }
    }

    #[test]
    fn test_structured_metadata_with_content() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("metadata.ts"),
            "export const metadata = { title: 'Big O Notation', tags: ['algorithms', 'big-o'], date: '2024-03-15' }",
        )
        .unwrap();
        fs::write(dir.path().join("index.mdx"), "# Intro\n\nBig O describes growth.").unwrap();

        let post = loaded(load_post(dir.path(), "big-o", &SiteConfig::default()));
        assert_eq!(post.slug, "big-o");
        assert_eq!(post.source, MetadataSource::Structured);
        assert_eq!(post.title(), "Big O Notation");
        assert_eq!(post.content.as_deref(), Some("Intro Big O describes growth."));
        assert_eq!(post.excerpt, "Intro Big O describes growth.");
        assert_eq!(post.reading_time, "1 min read");
    }

    #[test]
    fn test_pattern_fallback() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("metadata.ts"),
            "export const metadata = { ...shared, title: 'Fallback Post', tags: ['x'] }",
        )
        .unwrap();

        let post = loaded(load_post(dir.path(), "fallback", &SiteConfig::default()));
        assert_eq!(post.source, MetadataSource::Pattern);
        assert_eq!(post.title(), "Fallback Post");
        assert_eq!(post.excerpt, "Learn about Fallback Post");
        assert_eq!(post.reading_time, "5 min read");
        assert!(post.content.is_none());
    }

    #[test]
    fn test_frontmatter_metadata() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("index.md"),
            "---\ntitle: Frontmatter Post\nexcerpt: From YAML\n---\nBody text here.",
        )
        .unwrap();

        let post = loaded(load_post(dir.path(), "fm", &SiteConfig::default()));
        assert_eq!(post.source, MetadataSource::Frontmatter);
        assert_eq!(post.excerpt, "From YAML");
        assert_eq!(post.content.as_deref(), Some("Body text here."));
    }

    #[test]
    fn test_missing_title_is_skipped() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("metadata.ts"),
            "export const metadata = { excerpt: 'no title here', tags: [] }",
        )
        .unwrap();

        assert!(matches!(
            load_post(dir.path(), "untitled", &SiteConfig::default()),
            Extraction::Skipped(SkipReason::MissingTitle { .. })
        ));
    }

    #[test]
    fn test_no_metadata_is_skipped() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("index.mdx"), "# Just a body").unwrap();

        assert_eq!(
            load_post(dir.path(), "bare", &SiteConfig::default()),
            Extraction::Skipped(SkipReason::NoMetadata)
        );
    }
}
