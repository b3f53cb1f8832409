//! Structured metadata loading
//!
//! `metadata.json` is deserialized directly. `metadata.ts` declares the
//! metadata as an object literal (`export const metadata = { ... }`); the
//! literal is rewritten into JSON and deserialized into [`PostMetadata`].
//! Anything the rewrite cannot express (spreads, calls, computed keys) is an
//! error, which sends the caller to the pattern fallback.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use super::PostMetadata;

/// Reasons a structured load can fail
#[derive(Error, Debug)]
pub enum StructuredError {
    #[error("no metadata declaration found")]
    NoDeclaration,

    #[error("unterminated {0}")]
    Unterminated(&'static str),

    #[error("unsupported token {token:?} at offset {offset}")]
    Unsupported { token: char, offset: usize },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid frontmatter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

static DECLARATION: OnceLock<Regex> = OnceLock::new();

fn declaration() -> &'static Regex {
    DECLARATION.get_or_init(|| {
        Regex::new(r"(?:\bmetadata\b\s*(?::\s*[\w<>\[\]., ]+?)?\s*=|\bexport\s+default)\s*\{")
            .expect("valid regex")
    })
}

/// Load a metadata declaration file
///
/// The file name decides the format: `.json` files are plain JSON, anything
/// else is treated as a script module declaring an object literal.
pub fn parse_declaration(file_name: &str, raw: &str) -> Result<PostMetadata, StructuredError> {
    if file_name.ends_with(".json") {
        return Ok(serde_json::from_str(raw)?);
    }

    let start = declaration()
        .find(raw)
        .map(|m| m.end() - 1)
        .ok_or(StructuredError::NoDeclaration)?;
    let json = object_literal_to_json(&raw[start..])?;
    Ok(serde_json::from_str(&json)?)
}

/// Load YAML frontmatter into the metadata schema
pub fn parse_frontmatter(yaml: &str) -> Result<PostMetadata, StructuredError> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Rewrite the first object literal in `source` as JSON
///
/// Bare keys are quoted, single-quoted and template strings become JSON
/// strings, comments and trailing commas are dropped, and `undefined` or
/// identifier references become `null`. Text after the closing brace is
/// ignored.
pub fn object_literal_to_json(source: &str) -> Result<String, StructuredError> {
    let chars: Vec<char> = source.chars().collect();
    let mut i = chars
        .iter()
        .position(|&c| c == '{')
        .ok_or(StructuredError::NoDeclaration)?;
    let mut out = String::with_capacity(source.len());
    let mut depth = 0usize;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '{' | '[' => {
                depth += 1;
                out.push(c);
                i += 1;
            }
            '}' | ']' => {
                trim_trailing_comma(&mut out);
                out.push(c);
                i += 1;
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Ok(out);
                }
            }
            '"' | '\'' | '`' => {
                let (value, next) = read_string(&chars, i)?;
                out.push_str(&serde_json::to_string(&value)?);
                i = next;
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                loop {
                    if i + 1 >= chars.len() {
                        return Err(StructuredError::Unterminated("comment"));
                    }
                    if chars[i] == '*' && chars[i + 1] == '/' {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
            }
            c if c.is_alphabetic() || c == '_' || c == '$' => {
                let begin = i;
                while i < chars.len()
                    && (chars[i].is_alphanumeric() || matches!(chars[i], '_' | '$' | '.'))
                {
                    i += 1;
                }
                let ident: String = chars[begin..i].iter().collect();

                if next_significant(&chars, i) == Some(':') {
                    out.push_str(&serde_json::to_string(&ident)?);
                } else {
                    match ident.as_str() {
                        "true" | "false" | "null" => out.push_str(&ident),
                        _ => out.push_str("null"),
                    }
                }
            }
            c if c.is_ascii_digit() || c == '-' || c == '.' => {
                let begin = i;
                i += 1;
                while i < chars.len()
                    && (chars[i].is_ascii_alphanumeric() || matches!(chars[i], '.' | '_' | '+' | '-'))
                {
                    i += 1;
                }
                let literal: String = chars[begin..i].iter().filter(|&&ch| ch != '_').collect();
                let literal = if literal.starts_with('.') {
                    format!("0{}", literal)
                } else {
                    literal
                };
                out.push_str(&literal);
            }
            c if c.is_whitespace() || c == ':' || c == ',' => {
                out.push(c);
                i += 1;
            }
            other => {
                return Err(StructuredError::Unsupported {
                    token: other,
                    offset: i,
                })
            }
        }
    }

    Err(StructuredError::Unterminated("object literal"))
}

fn next_significant(chars: &[char], from: usize) -> Option<char> {
    chars[from..].iter().copied().find(|c| !c.is_whitespace())
}

fn trim_trailing_comma(out: &mut String) {
    let trimmed_len = out.trim_end().len();
    if out[..trimmed_len].ends_with(',') {
        out.remove(trimmed_len - 1);
    }
}

/// Read a quoted string starting at `start`, returning the decoded value
/// and the index just past the closing quote
fn read_string(chars: &[char], start: usize) -> Result<(String, usize), StructuredError> {
    let quote = chars[start];
    let mut value = String::new();
    let mut i = start + 1;

    while i < chars.len() {
        let c = chars[i];
        if c == quote {
            return Ok((value, i + 1));
        }
        if c != '\\' {
            value.push(c);
            i += 1;
            continue;
        }

        let escaped = *chars
            .get(i + 1)
            .ok_or(StructuredError::Unterminated("string"))?;
        i += 2;
        match escaped {
            'n' => value.push('\n'),
            't' => value.push('\t'),
            'r' => value.push('\r'),
            'b' => value.push('\u{8}'),
            'f' => value.push('\u{c}'),
            '0' => value.push('\0'),
            '\n' => {}
            'u' => {
                let (decoded, next) = read_unicode_escape(chars, i);
                value.push(decoded);
                i = next;
            }
            other => value.push(other),
        }
    }

    Err(StructuredError::Unterminated("string"))
}

/// Decode `XXXX` or `{X...}` after a `\u`; malformed escapes decode to U+FFFD
fn read_unicode_escape(chars: &[char], start: usize) -> (char, usize) {
    let (digits, next) = if chars.get(start) == Some(&'{') {
        let end = chars[start..]
            .iter()
            .position(|&c| c == '}')
            .map(|p| start + p)
            .unwrap_or(chars.len());
        (
            chars[(start + 1).min(end)..end].iter().collect::<String>(),
            (end + 1).min(chars.len()),
        )
    } else {
        let end = (start + 4).min(chars.len());
        (chars[start..end].iter().collect::<String>(), end)
    };

    let decoded = u32::from_str_radix(&digits, 16)
        .ok()
        .and_then(char::from_u32)
        .unwrap_or('\u{fffd}');
    (decoded, next)
}
