//! Weighted substring scoring
//!
//! Every post is scored against the whole query and against each query word
//! across title, tags, content and excerpt. Points are additive; the first
//! field that claims a match decides the reported `matchType`.

use serde::{Deserialize, Serialize};

use crate::config::{SearchConfig, RESULT_LIMIT};
use crate::index::IndexedPost;

pub const TITLE_MATCH: u32 = 100;
pub const TITLE_WORD_MATCH: u32 = 50;
pub const TAG_MATCH: u32 = 75;
pub const CONTENT_MATCH: u32 = 25;
pub const CONTENT_WORD_OCCURRENCE: u32 = 5;
pub const EXCERPT_MATCH: u32 = 15;
pub const EXACT_TITLE_BONUS: u32 = 200;
pub const EXACT_TAG_BONUS: u32 = 100;

/// Characters of context kept on each side of a content match
const SNIPPET_RADIUS: usize = 50;

/// Field that produced the reported match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Title,
    Content,
    Tag,
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchType::Title => write!(f, "title"),
            MatchType::Content => write!(f, "content"),
            MatchType::Tag => write!(f, "tag"),
        }
    }
}

/// A scored post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub reading_time: String,
    pub match_type: MatchType,
    pub match_text: String,
    pub score: u32,
}

/// A normalized query, computed once per search
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    /// Trimmed, lower-cased query
    pub text: String,
    /// Whitespace-separated words longer than one character
    pub words: Vec<String>,
}

impl PreparedQuery {
    /// Normalize `query`; `None` when it is shorter than `min_len` characters
    pub fn new(query: &str, min_len: usize) -> Option<Self> {
        let trimmed = query.trim();
        if trimmed.chars().count() < min_len {
            return None;
        }
        let text = trimmed.to_lowercase();
        let words = text
            .split_whitespace()
            .filter(|w| w.chars().count() > 1)
            .map(str::to_string)
            .collect();
        Some(PreparedQuery { text, words })
    }
}

/// Score a single post; always returns a result, callers filter by score
pub fn score_post(post: &IndexedPost, query: &PreparedQuery) -> SearchResult {
    let q = query.text.as_str();
    let title = post.title.to_lowercase();
    let excerpt = post.excerpt.to_lowercase();
    let tags: Vec<String> = post.tags.iter().map(|t| t.to_lowercase()).collect();

    let mut score = 0;
    let mut match_type = MatchType::Content;
    let mut match_text = String::new();

    if title.contains(q) {
        score += TITLE_MATCH;
        match_type = MatchType::Title;
        match_text = post.title.clone();
    }
    for word in &query.words {
        if title.contains(word.as_str()) {
            score += TITLE_WORD_MATCH;
        }
    }

    let matching_tags: Vec<&String> = post
        .tags
        .iter()
        .zip(&tags)
        .filter(|(_, lower)| {
            lower.contains(q) || query.words.iter().any(|w| lower.contains(w.as_str()))
        })
        .map(|(original, _)| original)
        .collect();
    if !matching_tags.is_empty() {
        score += TAG_MATCH * matching_tags.len() as u32;
        if match_type != MatchType::Title {
            match_type = MatchType::Tag;
            match_text = matching_tags
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", ");
        }
    }

    if let Some(content) = post.content.as_deref() {
        let lower = content.to_lowercase();
        if let Some(pos) = lower.find(q) {
            score += CONTENT_MATCH;
            if match_type == MatchType::Content && match_text.is_empty() {
                match_text = snippet(&lower, content, pos, q.len());
            }
        }
        for word in &query.words {
            score += CONTENT_WORD_OCCURRENCE * lower.matches(word.as_str()).count() as u32;
        }
    }

    if excerpt.contains(q) {
        score += EXCERPT_MATCH;
        if match_type == MatchType::Content && match_text.is_empty() {
            match_text = post.excerpt.clone();
        }
    }

    if title == q {
        score += EXACT_TITLE_BONUS;
    }
    if tags.iter().any(|t| t == q) {
        score += EXACT_TAG_BONUS;
    }

    if match_text.is_empty() {
        match_text = post.excerpt.clone();
    }

    SearchResult {
        slug: post.slug.clone(),
        title: post.title.clone(),
        excerpt: post.excerpt.clone(),
        tags: post.tags.clone(),
        reading_time: post.reading_time.clone(),
        match_type,
        match_text,
        score,
    }
}

/// `...` + up to 50 characters either side of the match + `...`
///
/// `pos` and `len` are byte offsets into `lower`. Lower-casing can change
/// byte lengths, so the window is cut by character index and applied to the
/// original text only when both have the same character count.
fn snippet(lower: &str, original: &str, pos: usize, len: usize) -> String {
    let start_char = lower[..pos].chars().count();
    let match_chars = lower[pos..pos + len].chars().count();
    let from = start_char.saturating_sub(SNIPPET_RADIUS);
    let to = start_char + match_chars + SNIPPET_RADIUS;

    let source = if original.chars().count() == lower.chars().count() {
        original
    } else {
        lower
    };
    let window: String = source.chars().skip(from).take(to - from).collect();
    format!("...{}...", window)
}

/// Score, filter, rank and cap
pub fn rank(posts: &[IndexedPost], query: &PreparedQuery, config: &SearchConfig) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = posts
        .iter()
        .map(|p| score_post(p, query))
        .filter(|r| r.score > config.min_score)
        .collect();
    // stable: equal scores keep index order
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results.truncate(config.max_results.min(RESULT_LIMIT));
    results
}
