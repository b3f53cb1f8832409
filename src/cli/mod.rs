//! CLI argument parsing for postindex
//!
//! Global flags: --root, --config, --format, --quiet, --verbose, --log-level,
//! --log-json

pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use output::OutputFormat;

/// postindex - static posts index generator and search CLI
#[derive(Parser, Debug)]
#[command(name = "postindex")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Configuration file (defaults to <root>/postindex.toml)
    #[arg(long, global = true, env = "POSTINDEX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log filter level or directive (e.g. `debug`, `postindex_core=trace`)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default postindex.toml
    Init,

    /// Generate the posts index, statistics and learning paths
    Build {
        /// Content directory (overrides config)
        #[arg(long)]
        content_dir: Option<String>,

        /// Output directory (overrides config)
        #[arg(long)]
        output_dir: Option<String>,

        /// Ignore the build cache and rebuild everything
        #[arg(long)]
        force: bool,

        /// Include plain-text content in posts-index.json
        #[arg(long)]
        include_content: bool,

        /// Number of posts listed as recent
        #[arg(long)]
        recent: Option<usize>,
    },

    /// Search posts
    Search {
        /// Search query
        query: String,

        /// Index file (defaults to <output_dir>/posts-index.json)
        #[arg(long)]
        index: Option<PathBuf>,

        /// Do not fall back to scanning the content directory
        #[arg(long)]
        no_fallback: bool,

        /// Maximum number of results
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Show index statistics
    Stats,

    /// Read queries from stdin and print debounced results
    Interactive {
        /// Quiet period before a query runs
        #[arg(long)]
        debounce_ms: Option<u64>,

        /// Index file (defaults to <output_dir>/posts-index.json)
        #[arg(long)]
        index: Option<PathBuf>,
    },
}
