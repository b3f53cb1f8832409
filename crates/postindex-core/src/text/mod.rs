//! Text processing utilities: markup stripping, excerpts, reading time

use regex::Regex;
use std::sync::OnceLock;

/// Excerpt length in characters before truncation
pub const EXCERPT_LEN: usize = 160;

static HTML_TAG: OnceLock<Regex> = OnceLock::new();
static MD_IMAGE: OnceLock<Regex> = OnceLock::new();
static MD_LINK: OnceLock<Regex> = OnceLock::new();
static MDX_MODULE_LINE: OnceLock<Regex> = OnceLock::new();
static MD_MARKERS: OnceLock<Regex> = OnceLock::new();
static WHITESPACE: OnceLock<Regex> = OnceLock::new();

fn html_tag() -> &'static Regex {
    HTML_TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid regex"))
}

fn md_image() -> &'static Regex {
    MD_IMAGE.get_or_init(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").expect("valid regex"))
}

fn md_link() -> &'static Regex {
    MD_LINK.get_or_init(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("valid regex"))
}

fn mdx_module_line() -> &'static Regex {
    MDX_MODULE_LINE
        .get_or_init(|| Regex::new(r"(?m)^(?:import|export)\s.*$").expect("valid regex"))
}

fn md_markers() -> &'static Regex {
    MD_MARKERS.get_or_init(|| Regex::new(r"[#*`>_~|]").expect("valid regex"))
}

fn whitespace() -> &'static Regex {
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

/// Remove HTML/JSX tags, keeping the text between them
pub fn strip_html(text: &str) -> String {
    html_tag().replace_all(text, "").into_owned()
}

/// Split a leading YAML frontmatter block from a document
///
/// Returns `(Some(yaml), body)` when the document starts with a `---` fence
/// that is closed later on, `(None, document)` otherwise.
pub fn split_frontmatter(document: &str) -> (Option<&str>, &str) {
    let rest = match document
        .strip_prefix("---\n")
        .or_else(|| document.strip_prefix("---\r\n"))
    {
        Some(rest) => rest,
        None => return (None, document),
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }

    (None, document)
}

/// Convert a markdown/MDX body into searchable plain text
pub fn to_plain_text(body: &str) -> String {
    let text = mdx_module_line().replace_all(body, "");
    let text = html_tag().replace_all(&text, "");
    let text = md_image().replace_all(&text, "");
    let text = md_link().replace_all(&text, "$1");
    let text = md_markers().replace_all(&text, "");
    whitespace().replace_all(&text, " ").trim().to_string()
}

/// Build an excerpt from plain text: the first 160 characters plus `...`
pub fn generate_excerpt(plain: &str) -> String {
    let trimmed = plain.trim();
    if trimmed.chars().count() > EXCERPT_LEN {
        let head: String = trimmed.chars().take(EXCERPT_LEN).collect();
        format!("{}...", head.trim_end())
    } else {
        trimmed.to_string()
    }
}

/// Estimate reading time as `N min read`, never less than one minute
pub fn reading_time(plain: &str, words_per_minute: usize) -> String {
    let words = plain.split_whitespace().count();
    let minutes = words.div_ceil(words_per_minute.max(1)).max(1);
    format!("{} min read", minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Hash <b>tables</b></p>"), "Hash tables");
    }

    #[test]
    fn test_split_frontmatter() {
        let doc = "---\ntitle: Hello\ntags: [a]\n---\n\n# Body\n";
        let (yaml, body) = split_frontmatter(doc);
        assert_eq!(yaml, Some("title: Hello\ntags: [a]\n"));
        assert_eq!(body, "\n# Body\n");
    }

    #[test]
    fn test_split_frontmatter_absent_or_unclosed() {
        assert_eq!(split_frontmatter("# Title\n"), (None, "# Title\n"));
        let unclosed = "---\ntitle: x\n";
        assert_eq!(split_frontmatter(unclosed), (None, unclosed));
    }

    #[test]
    fn test_to_plain_text() {
        let body = "import Chart from './chart'\n\n# Big O\n\nSee [the guide](/posts/x) and ![img](a.png).\n\n**Bold** `code` <Chart />";
        assert_eq!(to_plain_text(body), "Big O See the guide and . Bold code");
    }

    #[test]
    fn test_generate_excerpt_truncates() {
        let long = "word ".repeat(50);
        let excerpt = generate_excerpt(&long);
        assert!(excerpt.ends_with("..."));
        assert!(excerpt.chars().count() <= EXCERPT_LEN + 3);

        assert_eq!(generate_excerpt("short text"), "short text");
    }

    #[test]
    fn test_reading_time() {
        assert_eq!(reading_time("", 200), "1 min read");
        assert_eq!(reading_time(&"w ".repeat(200), 200), "1 min read");
        assert_eq!(reading_time(&"w ".repeat(201), 200), "2 min read");
    }
}
