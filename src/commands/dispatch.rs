//! Command dispatch logic for postindex
use std::env;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cli::{Cli, Commands};
use crate::commands;
use crate::commands::build::BuildOverrides;
use postindex_core::config::SiteConfig;
use postindex_core::error::Result;

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let root = cli
        .root
        .clone()
        .unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    tracing::debug!(root = %root.display(), elapsed = ?start.elapsed(), "resolve_root");

    match &cli.command {
        None => handle_no_command(),

        Some(Commands::Init) => commands::init::execute(cli, &root),

        Some(Commands::Build {
            content_dir,
            output_dir,
            force,
            include_content,
            recent,
        }) => {
            let config = load_config(cli, &root)?;
            let overrides = BuildOverrides {
                content_dir: content_dir.clone(),
                output_dir: output_dir.clone(),
                include_content: *include_content,
                recent: *recent,
            };
            commands::build::execute(cli, &root, config, &overrides, *force)
        }

        Some(Commands::Search {
            query,
            index,
            no_fallback,
            limit,
        }) => {
            let config = load_config(cli, &root)?;
            commands::search::execute(
                cli,
                &root,
                config,
                query,
                index.as_deref(),
                *no_fallback,
                *limit,
            )
        }

        Some(Commands::Stats) => {
            let config = load_config(cli, &root)?;
            commands::stats::execute(cli, &root, &config)
        }

        Some(Commands::Interactive { debounce_ms, index }) => {
            let config = load_config(cli, &root)?;
            commands::interactive::execute(cli, &root, config, *debounce_ms, index.as_deref())
        }
    }
}

fn handle_no_command() -> Result<()> {
    println!("postindex {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Static posts index generator and search for blogs.");
    println!();
    println!("Run `postindex --help` for usage information.");
    Ok(())
}

/// `--config` if given, otherwise `<root>/postindex.toml` or defaults
fn load_config(cli: &Cli, root: &Path) -> Result<SiteConfig> {
    match &cli.config {
        Some(path) => SiteConfig::load(path),
        None => SiteConfig::discover(root),
    }
}
