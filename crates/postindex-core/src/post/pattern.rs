//! Best-effort metadata extraction by pattern matching
//!
//! Used when the structured load fails. Only simple `key: "string"` and
//! `key: ["a", "b"]` shapes are recognised; the first occurrence of each key
//! wins, so top-level fields must precede nested ones with the same name.

use regex::Regex;
use std::sync::OnceLock;

use super::PostMetadata;

static TITLE: OnceLock<Regex> = OnceLock::new();
static EXCERPT: OnceLock<Regex> = OnceLock::new();
static DATE: OnceLock<Regex> = OnceLock::new();
static AUTHOR: OnceLock<Regex> = OnceLock::new();
static TAGS: OnceLock<Regex> = OnceLock::new();

fn string_field(cell: &'static OnceLock<Regex>, key: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(&format!(
            r#"["']?\b{}\b["']?\s*:\s*["'`]([^"'`]+)["'`]"#,
            key
        ))
        .expect("valid regex")
    })
}

fn tags_field() -> &'static Regex {
    TAGS.get_or_init(|| Regex::new(r#"(?s)["']?\btags\b["']?\s*:\s*\[(.*?)\]"#).expect("valid regex"))
}

fn capture(re: &Regex, raw: &str) -> Option<String> {
    re.captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extract metadata from raw declaration text
///
/// Returns `None` when no title can be found.
pub fn extract(raw: &str) -> Option<PostMetadata> {
    let title = capture(string_field(&TITLE, "title"), raw)?;

    let tags = tags_field()
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| {
            m.as_str()
                .split(',')
                .map(|t| t.trim().trim_matches(|c| matches!(c, '"' | '\'' | '`')).trim())
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(PostMetadata {
        title,
        excerpt: capture(string_field(&EXCERPT, "excerpt"), raw),
        tags,
        date: capture(string_field(&DATE, "date"), raw),
        author: capture(string_field(&AUTHOR, "author"), raw),
        ..Default::default()
    })
}
