//! Aggregate statistics and learning paths

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::post::Post;

/// Short post reference used by `recentPosts` and learning paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub date: Option<String>,
    pub reading_time: String,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        PostSummary {
            slug: post.slug.clone(),
            title: post.title().to_string(),
            date: post.metadata.date.clone(),
            reading_time: post.reading_time.clone(),
        }
    }
}

/// Contents of `blog-stats.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogStats {
    pub total_posts: usize,
    #[serde(default)]
    pub total_series: usize,
    #[serde(default)]
    pub total_independent_posts: usize,
    pub last_generated: String,
    pub tags: Vec<String>,
    pub recent_posts: Vec<PostSummary>,
}

/// Posts sharing a series name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPath {
    pub name: String,
    pub total_posts: usize,
    pub tags: Vec<String>,
    pub posts: Vec<PostSummary>,
}

/// Group posts into learning paths, sorted by series name
///
/// Posts within a path are ordered by declared series order (undeclared
/// last), then by slug.
pub fn learning_paths(posts: &[Post]) -> Vec<LearningPath> {
    let mut groups: BTreeMap<String, Vec<&Post>> = BTreeMap::new();
    for post in posts {
        if let Some(name) = post.metadata.series_name() {
            groups.entry(name).or_default().push(post);
        }
    }

    groups
        .into_iter()
        .map(|(name, mut members)| {
            members.sort_by(|a, b| {
                let ka = a.metadata.series_order().unwrap_or(u32::MAX);
                let kb = b.metadata.series_order().unwrap_or(u32::MAX);
                ka.cmp(&kb).then_with(|| a.slug.cmp(&b.slug))
            });
            let tags: BTreeSet<&String> = members.iter().flat_map(|p| p.tags()).collect();
            LearningPath {
                name,
                total_posts: members.len(),
                tags: tags.into_iter().cloned().collect(),
                posts: members.into_iter().map(PostSummary::from).collect(),
            }
        })
        .collect()
}

/// Compute `blog-stats.json` from the ordered post list
pub fn compute_stats(
    posts: &[Post],
    paths: &[LearningPath],
    recent: usize,
    generated: DateTime<Utc>,
) -> BlogStats {
    let tags: BTreeSet<&String> = posts.iter().flat_map(|p| p.tags()).collect();
    let in_series = posts
        .iter()
        .filter(|p| p.metadata.series_name().is_some())
        .count();

    BlogStats {
        total_posts: posts.len(),
        total_series: paths.len(),
        total_independent_posts: posts.len() - in_series,
        last_generated: generated.to_rfc3339_opts(SecondsFormat::Millis, true),
        tags: tags.into_iter().cloned().collect(),
        recent_posts: posts.iter().take(recent).map(PostSummary::from).collect(),
    }
}
