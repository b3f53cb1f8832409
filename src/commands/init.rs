//! `postindex init` command - write a default configuration file

use std::path::Path;

use crate::cli::{output, Cli, OutputFormat};
use postindex_core::config::{SiteConfig, CONFIG_FILE};
use postindex_core::error::{PostIndexError, Result};

/// Execute the init command
pub fn execute(cli: &Cli, root: &Path) -> Result<()> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => root.join(CONFIG_FILE),
    };
    if path.exists() {
        return Err(PostIndexError::already_exists("config file", path.display()));
    }

    SiteConfig::default().save(&path)?;
    tracing::info!(path = %path.display(), "wrote default config");

    match cli.format {
        OutputFormat::Json => output::print_json(&serde_json::json!({
            "status": "ok",
            "config": path.display().to_string(),
        }))?,
        OutputFormat::Human => {
            if !cli.quiet {
                println!("Created {}", path.display());
            }
        }
    }
    Ok(())
}
