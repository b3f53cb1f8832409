//! Post model and metadata extraction
//!
//! A post is one subdirectory of the content root. Its metadata comes from a
//! declaration file (`metadata.ts`, `metadata.json`) or, failing that, from
//! YAML frontmatter at the top of its content body.

pub mod loader;
pub mod pattern;
pub mod structured;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use loader::{load_post, Extraction, SkipReason};

/// Typed metadata schema shared by every extraction strategy
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMetadata {
    /// Post title (required for indexing)
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Tags in declaration order, duplicates preserved
    #[serde(default, deserialize_with = "nullable_vec")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Declared kind, e.g. `series`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<SeriesInfo>,
}

/// Series membership declared by a post
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "nullable_vec")]
    pub parts: Vec<SeriesPart>,
}

/// One entry of a series table of contents
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl PostMetadata {
    /// Series name used to group posts into learning paths
    ///
    /// An explicit `series.name` wins; a `seriesId` or `type: series`
    /// declaration without a name falls back to the id or the title.
    pub fn series_name(&self) -> Option<String> {
        if let Some(name) = self.series.as_ref().and_then(|s| s.name.clone()) {
            return Some(name);
        }
        if let Some(id) = &self.series_id {
            return Some(id.clone());
        }
        if self.kind.as_deref() == Some("series") {
            return Some(self.title.clone());
        }
        None
    }

    /// Position within the series, if declared
    pub fn series_order(&self) -> Option<u32> {
        self.series.as_ref().and_then(|s| s.order)
    }
}

/// Which strategy produced a post's metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataSource {
    /// Typed load of the metadata declaration
    Structured,
    /// YAML frontmatter in the content body
    Frontmatter,
    /// Regex extraction from the raw declaration
    Pattern,
}

impl fmt::Display for MetadataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataSource::Structured => write!(f, "structured"),
            MetadataSource::Frontmatter => write!(f, "frontmatter"),
            MetadataSource::Pattern => write!(f, "pattern"),
        }
    }
}

/// A fully extracted post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Directory name, unique within the content root
    pub slug: String,
    pub metadata: PostMetadata,
    /// Resolved excerpt (declared, generated from content, or placeholder)
    pub excerpt: String,
    pub reading_time: String,
    /// Markup-free body text, when a content file exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub source: MetadataSource,
}

impl Post {
    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    pub fn tags(&self) -> &[String] {
        &self.metadata.tags
    }

    pub fn date(&self) -> Option<&str> {
        self.metadata.date.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_name_resolution() {
        let mut meta = PostMetadata {
            title: "GenAI Mastery".to_string(),
            ..Default::default()
        };
        assert_eq!(meta.series_name(), None);

        meta.kind = Some("series".to_string());
        assert_eq!(meta.series_name().as_deref(), Some("GenAI Mastery"));

        meta.series_id = Some("genai".to_string());
        assert_eq!(meta.series_name().as_deref(), Some("genai"));

        meta.series = Some(SeriesInfo {
            name: Some("GenAI Mastery Series".to_string()),
            order: Some(2),
            ..Default::default()
        });
        assert_eq!(meta.series_name().as_deref(), Some("GenAI Mastery Series"));
        assert_eq!(meta.series_order(), Some(2));
    }

    #[test]
    fn test_null_tags_deserialize_as_empty() {
        let meta: PostMetadata = serde_json::from_str(r#"{"title":"T","tags":null}"#).unwrap();
        assert!(meta.tags.is_empty());
    }
}
