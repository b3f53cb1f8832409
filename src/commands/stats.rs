//! `postindex stats` command - summarize blog-stats.json

use std::fs;
use std::path::Path;

use chrono::DateTime;

use crate::cli::{output, Cli, OutputFormat};
use postindex_core::config::SiteConfig;
use postindex_core::error::{PostIndexError, Result};
use postindex_core::index::BlogStats;

/// Execute the stats command
pub fn execute(cli: &Cli, root: &Path, config: &SiteConfig) -> Result<()> {
    let path = config.stats_path(root);
    let raw = fs::read_to_string(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PostIndexError::not_found("stats file (run `postindex build`)", path.display())
        } else {
            PostIndexError::io_operation("read stats", path.display(), e)
        }
    })?;
    let stats: BlogStats = serde_json::from_str(&raw)?;

    match cli.format {
        OutputFormat::Json => output::print_json(&stats)?,
        OutputFormat::Human => print_human(cli, &stats),
    }
    Ok(())
}

fn print_human(cli: &Cli, stats: &BlogStats) {
    println!(
        "Posts: {} ({} in {} learning paths, {} independent)",
        stats.total_posts,
        stats.total_posts - stats.total_independent_posts.min(stats.total_posts),
        stats.total_series,
        stats.total_independent_posts
    );
    println!("Tags: {}", stats.tags.len());

    let generated = DateTime::parse_from_rfc3339(&stats.last_generated)
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|_| stats.last_generated.clone());
    println!("Last generated: {}", generated);

    if cli.quiet || stats.recent_posts.is_empty() {
        return;
    }
    println!("Recent posts:");
    for post in &stats.recent_posts {
        println!(
            "  {:<10} {} {}",
            post.date.as_deref().unwrap_or("-"),
            post.slug,
            post.title
        );
    }
    if cli.verbose {
        println!("All tags: {}", stats.tags.join(", "));
    }
}
