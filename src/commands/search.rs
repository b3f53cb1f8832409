//! `postindex search` command - one-shot query against the posts index

use std::path::Path;

use crate::cli::{output, Cli, OutputFormat};
use postindex_core::bail_usage;
use postindex_core::config::{SiteConfig, RESULT_LIMIT};
use postindex_core::error::Result;
use postindex_core::search::{
    BoxedSource, LiveContentSource, SearchEngine, SearchResult, StaticIndexSource,
};

/// Build an engine over the static index, optionally backed by a live scan
pub fn open_engine(
    root: &Path,
    config: &SiteConfig,
    index: Option<&Path>,
    fallback: bool,
) -> SearchEngine {
    let index_path = match index {
        Some(path) => path.to_path_buf(),
        None => config.posts_index_path(root),
    };
    let primary: BoxedSource = Box::new(StaticIndexSource::new(index_path));
    let fallback: Option<BoxedSource> = if fallback {
        Some(Box::new(LiveContentSource::new(
            config.content_root(root),
            config.clone(),
        )))
    } else {
        None
    };
    SearchEngine::with_config(primary, fallback, config.search.clone())
}

/// Execute the search command
pub fn execute(
    cli: &Cli,
    root: &Path,
    mut config: SiteConfig,
    query: &str,
    index: Option<&Path>,
    no_fallback: bool,
    limit: Option<usize>,
) -> Result<()> {
    if let Some(limit) = limit {
        if limit == 0 || limit > RESULT_LIMIT {
            bail_usage!(format!("--limit must be between 1 and {}", RESULT_LIMIT));
        }
        config.search.max_results = limit;
    }

    let engine = open_engine(root, &config, index, !no_fallback);
    let results = engine.search(query);
    tracing::debug!(query, results = results.len(), indexed = engine.len(), "search complete");

    match cli.format {
        OutputFormat::Json => output::print_json(&results)?,
        OutputFormat::Human => print_results(cli, query, &results),
    }
    Ok(())
}

/// Human-readable result listing shared with `interactive`
pub fn print_results(cli: &Cli, query: &str, results: &[SearchResult]) {
    if results.is_empty() {
        if !cli.quiet {
            println!("No results found for '{}'", query);
        }
        return;
    }

    for result in results {
        println!("{} {} [{}]", result.slug, result.title, result.match_type);
        if !cli.quiet {
            println!("    {}", result.match_text);
        }
        if cli.verbose {
            println!(
                "    score={} tags={} reading_time={}",
                result.score,
                result.tags.join(","),
                result.reading_time
            );
        }
    }
}
