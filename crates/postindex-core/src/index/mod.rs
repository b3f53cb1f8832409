//! Generated index artifacts
//!
//! A build produces four JSON documents in the output directory:
//! `posts-index.json` (the search corpus), `blog-stats.json`,
//! `learning-paths.json` and `blog-data.json`.

pub mod builder;
pub mod pipeline;
pub mod stats;
pub mod writer;

use serde::{Deserialize, Serialize};

use crate::post::{Post, SeriesInfo};

pub use builder::{BuildOutput, IndexBuilder, SkippedPost};
pub use pipeline::{run_build, BuildOptions, BuildOutcome, BuildReport};
pub use stats::{compute_stats, learning_paths, BlogStats, LearningPath, PostSummary};
pub use writer::{outputs_present, write_artifacts};

/// One entry of the search corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedPost {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub reading_time: String,
    /// Plain-text body, present only when the index was built with content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl IndexedPost {
    pub fn from_post(post: &Post, include_content: bool) -> Self {
        IndexedPost {
            slug: post.slug.clone(),
            title: post.title().to_string(),
            excerpt: post.excerpt.clone(),
            tags: post.tags().to_vec(),
            reading_time: post.reading_time.clone(),
            content: if include_content {
                post.content.clone()
            } else {
                None
            },
        }
    }
}

/// Post listing entry of `blog-data.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogDataPost {
    pub slug: String,
    pub title: String,
    pub date: Option<String>,
    pub excerpt: String,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub reading_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<SeriesInfo>,
}

impl From<&Post> for BlogDataPost {
    fn from(post: &Post) -> Self {
        BlogDataPost {
            slug: post.slug.clone(),
            title: post.title().to_string(),
            date: post.metadata.date.clone(),
            excerpt: post.excerpt.clone(),
            author: post.metadata.author.clone(),
            tags: post.tags().to_vec(),
            reading_time: post.reading_time.clone(),
            series: post.metadata.series.clone(),
        }
    }
}

/// Combined document for consumers that want everything in one fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogData {
    pub posts: Vec<BlogDataPost>,
    pub learning_paths: Vec<LearningPath>,
    pub stats: BlogStats,
}

/// Everything a build writes
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub index: Vec<IndexedPost>,
    pub stats: BlogStats,
    pub learning_paths: Vec<LearningPath>,
    pub data: BlogData,
}

impl Artifacts {
    /// Derive every output document from the ordered post list
    pub fn assemble(
        posts: &[Post],
        include_content: bool,
        recent: usize,
        generated: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        let index = posts
            .iter()
            .map(|p| IndexedPost::from_post(p, include_content))
            .collect();
        let paths = learning_paths(posts);
        let stats = compute_stats(posts, &paths, recent, generated);
        let data = BlogData {
            posts: posts.iter().map(BlogDataPost::from).collect(),
            learning_paths: paths.clone(),
            stats: stats.clone(),
        };
        Artifacts {
            index,
            stats,
            learning_paths: paths,
            data,
        }
    }
}
