use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a Command for postindex
pub fn postindex() -> Command {
    cargo_bin_cmd!("postindex")
}

/// Write `<root>/src/posts/<slug>/metadata.ts`
#[allow(dead_code)]
pub fn write_metadata(root: &Path, slug: &str, declaration: &str) {
    let dir = root.join("src").join("posts").join(slug);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("metadata.ts"), declaration).unwrap();
}

/// Write `<root>/src/posts/<slug>/index.mdx`
#[allow(dead_code)]
pub fn write_body(root: &Path, slug: &str, body: &str) {
    let dir = root.join("src").join("posts").join(slug);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("index.mdx"), body).unwrap();
}

/// A small blog: two standalone posts, a two-part series and an untitled draft
#[allow(dead_code)]
pub fn sample_site() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write_metadata(
        root,
        "big-o-notation",
        r#"export const metadata = {
  title: "Big O Notation",
  excerpt: "How algorithm cost grows with input size",
  date: "2024-03-15",
  tags: ["algorithms", "complexity"],
};"#,
    );
    write_body(
        root,
        "big-o-notation",
        "# Big O\n\nAsymptotic analysis describes **growth**, not speed.",
    );

    write_metadata(
        root,
        "hash-tables",
        r#"export const metadata = {
  title: 'Hash Tables: The Ultimate Guide',
  excerpt: 'Constant-time lookup explained',
  date: '2024-02-10',
  tags: ['data-structures', 'hashing'],
}"#,
    );

    write_metadata(
        root,
        "llm-part-1",
        r#"export const metadata = {
  title: "LLM Engineering: Prompting",
  date: "2024-01-05",
  tags: ["llm", "genai"],
  series: { name: "LLM Engineering", order: 1, total: 2 },
}"#,
    );
    write_metadata(
        root,
        "llm-part-2",
        r#"export const metadata = {
  title: "LLM Engineering: Evaluation",
  date: "2024-01-12",
  tags: ["llm"],
  series: { name: "LLM Engineering", order: 2, total: 2 },
}"#,
    );

    write_metadata(
        root,
        "draft",
        "export const metadata = { excerpt: 'no title yet', tags: ['draft'] }",
    );

    dir
}

/// Run `postindex build` in `dir` and assert success
#[allow(dead_code)]
pub fn build(dir: &Path) {
    postindex()
        .current_dir(dir)
        .arg("build")
        .assert()
        .success();
}
