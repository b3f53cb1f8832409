//! `postindex build` command - generate the posts index and statistics

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::cli::{output, Cli, OutputFormat};
use postindex_core::bail_usage;
use postindex_core::config::SiteConfig;
use postindex_core::error::Result;
use postindex_core::index::{run_build, BuildOptions, BuildOutcome, BuildReport};

/// Command-line values that take precedence over `postindex.toml`
#[derive(Debug, Clone, Default)]
pub struct BuildOverrides {
    pub content_dir: Option<String>,
    pub output_dir: Option<String>,
    pub include_content: bool,
    pub recent: Option<usize>,
}

impl BuildOverrides {
    fn apply(&self, config: &mut SiteConfig) {
        if let Some(dir) = &self.content_dir {
            config.content_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if self.include_content {
            config.build.include_content = true;
        }
        if let Some(recent) = self.recent {
            config.build.recent_posts = recent;
        }
    }
}

#[derive(Serialize)]
struct SkippedJson<'a> {
    slug: &'a str,
    reason: String,
}

#[derive(Serialize)]
struct BuildJson<'a> {
    status: &'static str,
    outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    posts_indexed: usize,
    reused: u64,
    extracted: u64,
    skipped: Vec<SkippedJson<'a>>,
    files: Vec<String>,
}

/// Execute the build command
pub fn execute(
    cli: &Cli,
    root: &Path,
    mut config: SiteConfig,
    overrides: &BuildOverrides,
    force: bool,
) -> Result<()> {
    overrides.apply(&mut config);
    if config.content_dir.trim().is_empty() {
        bail_usage!("--content-dir must not be empty");
    }

    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = Arc::clone(&interrupted);
    let _ = ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::SeqCst);
    });

    let options = BuildOptions {
        force,
        interrupted: Some(interrupted),
    };
    let report = run_build(root, &config, &options)?;

    match cli.format {
        OutputFormat::Json => output::print_json(&to_json(&report))?,
        OutputFormat::Human => print_human(cli, &report),
    }
    Ok(())
}

fn to_json(report: &BuildReport) -> BuildJson<'_> {
    let (outcome, reason) = match &report.outcome {
        BuildOutcome::UpToDate => ("up_to_date", None),
        BuildOutcome::Incremental { .. } => ("incremental", None),
        BuildOutcome::Full { reason } => ("full", Some(reason.to_string())),
    };
    BuildJson {
        status: "ok",
        outcome,
        reason,
        posts_indexed: report.posts_indexed,
        reused: report.reused,
        extracted: report.extracted,
        skipped: report
            .skipped
            .iter()
            .map(|s| SkippedJson {
                slug: &s.slug,
                reason: s.reason.to_string(),
            })
            .collect(),
        files: report
            .files_written
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
    }
}

fn print_human(cli: &Cli, report: &BuildReport) {
    if cli.quiet {
        return;
    }

    match &report.outcome {
        BuildOutcome::UpToDate => {
            println!("Index up to date ({} posts)", report.posts_indexed);
            return;
        }
        BuildOutcome::Incremental { changed_files } => println!(
            "Indexed {} posts (incremental: {} changed files, {} reused)",
            report.posts_indexed, changed_files, report.reused
        ),
        BuildOutcome::Full { reason } => {
            println!("Indexed {} posts (full build: {})", report.posts_indexed, reason)
        }
    }

    for skipped in &report.skipped {
        println!("  skipped {}: {}", skipped.slug, skipped.reason);
    }

    if let Some(stats) = &report.stats {
        println!(
            "  {} tags, {} learning paths, {} independent posts",
            stats.tags.len(),
            stats.total_series,
            stats.total_independent_posts
        );
    }

    if cli.verbose {
        for path in &report.files_written {
            println!("  wrote {}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply() {
        let mut config = SiteConfig::default();
        BuildOverrides {
            content_dir: Some("content".to_string()),
            output_dir: None,
            include_content: true,
            recent: Some(3),
        }
        .apply(&mut config);

        assert_eq!(config.content_dir, "content");
        assert_eq!(config.output_dir, "public/data");
        assert!(config.build.include_content);
        assert_eq!(config.build.recent_posts, 3);
    }
}
