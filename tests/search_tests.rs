//! Integration tests for `postindex search` and `postindex interactive`

mod support;

use predicates::prelude::*;
use serde_json::Value;
use support::{build, postindex, sample_site};

#[test]
fn test_search_title_match_ranks_first() {
    let dir = sample_site();
    build(dir.path());

    let output = postindex()
        .current_dir(dir.path())
        .args(["search", "big o"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let first = stdout.lines().next().unwrap();
    assert_eq!(first, "big-o-notation Big O Notation [title]");
}

#[test]
fn test_search_by_tag() {
    let dir = sample_site();
    build(dir.path());

    postindex()
        .current_dir(dir.path())
        .args(["search", "data-structures"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "hash-tables Hash Tables: The Ultimate Guide [tag]",
        ));
}

#[test]
fn test_search_no_results() {
    let dir = sample_site();
    build(dir.path());

    postindex()
        .current_dir(dir.path())
        .args(["search", "xyzzy-nonexistent"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No results found for 'xyzzy-nonexistent'",
        ));
}

#[test]
fn test_search_short_query_is_empty() {
    let dir = sample_site();
    build(dir.path());

    postindex()
        .current_dir(dir.path())
        .args(["--format", "json", "search", " b "])
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
}

#[test]
fn test_search_json_results() {
    let dir = sample_site();
    build(dir.path());

    let output = postindex()
        .current_dir(dir.path())
        .args(["--format", "json", "search", "llm"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let results: Value = serde_json::from_slice(&output.stdout).unwrap();
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 2);
    for result in results {
        assert_eq!(result["matchType"], "title");
        assert!(result["score"].as_u64().unwrap() > 10);
        assert!(result.get("readingTime").is_some());
    }
}

#[test]
fn test_search_falls_back_to_content_scan() {
    let dir = sample_site();

    postindex()
        .current_dir(dir.path())
        .args(["search", "asymptotic"])
        .assert()
        .success()
        .stdout(predicate::str::contains("big-o-notation Big O Notation [content]"))
        .stdout(predicate::str::contains("...Big O Asymptotic analysis"));
}

#[test]
fn test_search_without_fallback_is_empty() {
    let dir = sample_site();

    postindex()
        .current_dir(dir.path())
        .args(["search", "big o", "--no-fallback"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No results found"));
}

#[test]
fn test_search_limit() {
    let dir = sample_site();
    build(dir.path());

    let output = postindex()
        .current_dir(dir.path())
        .args(["--format", "json", "search", "engineering", "--limit", "1"])
        .output()
        .unwrap();
    let results: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(results.as_array().unwrap().len(), 1);

    postindex()
        .current_dir(dir.path())
        .args(["search", "engineering", "--limit", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--limit"));

    postindex()
        .current_dir(dir.path())
        .args(["search", "engineering", "--limit", "21"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("between 1 and 20"));
}

#[test]
fn test_interactive_runs_only_settled_query() {
    let dir = sample_site();
    build(dir.path());

    let output = postindex()
        .current_dir(dir.path())
        .arg("interactive")
        .write_stdin("bi\nbig o\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let queries: Vec<_> = stdout.lines().filter(|l| l.starts_with("> ")).collect();
    assert_eq!(queries, vec!["> big o"]);
    assert!(stdout.contains("big-o-notation Big O Notation [title]"));
}

#[test]
fn test_interactive_json_lines() {
    let dir = sample_site();
    build(dir.path());

    let output = postindex()
        .current_dir(dir.path())
        .args(["--format", "json", "interactive", "--debounce-ms", "0"])
        .write_stdin("hashing\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let line: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(line["query"], "hashing");
    assert_eq!(line["results"][0]["slug"], "hash-tables");
}
