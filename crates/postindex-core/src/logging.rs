//! Tracing setup and build counters
//!
//! Logs go to stderr so that stdout stays clean for `--format json`. The
//! filter is taken from `RUST_LOG`, then `POSTINDEX_LOG`, then the CLI
//! flags.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable consulted when `RUST_LOG` is unset
pub const LOG_ENV: &str = "POSTINDEX_LOG";

/// Counters collected over one build run
///
/// A post served from the build cache is a hit, a post read from its
/// directory is a miss.
#[derive(Debug, Default)]
pub struct ResourceMetrics {
    bytes_hashed: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
}

impl ResourceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hashed(&self, bytes: u64) {
        self.bytes_hashed.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn bytes_hashed(&self) -> u64 {
        self.bytes_hashed.load(Ordering::Relaxed)
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> u64 {
        self.cache_misses.load(Ordering::Relaxed)
    }

    /// Share of posts served from the cache, in percent
    pub fn reuse_percent(&self) -> f64 {
        let hits = self.cache_hits();
        match hits + self.cache_misses() {
            0 => 0.0,
            total => hits as f64 * 100.0 / total as f64,
        }
    }
}

/// Emit one debug event summarising a [`ResourceMetrics`]
#[macro_export]
macro_rules! log_resource_metrics {
    ($metrics:expr, $name:expr) => {
        tracing::debug!(
            operation = $name,
            bytes_hashed = $metrics.bytes_hashed(),
            reused = $metrics.cache_hits(),
            extracted = $metrics.cache_misses(),
            reuse_percent = $metrics.reuse_percent(),
            "resource_metrics"
        );
    };
}

/// Emit a trace event with the time elapsed since `$start`
///
/// ```rust,ignore
/// trace_time!(start, "run_build", posts = output.posts.len());
/// ```
#[macro_export]
macro_rules! trace_time {
    ($start:expr, $name:expr) => {
        tracing::trace!(elapsed = ?$start.elapsed(), $name);
    };
    ($start:expr, $name:expr $(, $field:ident = $value:expr)*) => {
        tracing::trace!(elapsed = ?$start.elapsed(), $($field = $value),*, $name);
    };
}

/// Filter directive implied by the CLI flags
///
/// A bare level applies to both crates; anything containing `=` is used
/// as written.
fn flag_directive(verbose: bool, log_level: Option<&str>) -> String {
    let level = match log_level {
        Some(level) if level.contains('=') => return level.to_string(),
        Some(level) => level,
        None if verbose => "debug",
        None => "warn",
    };
    format!("postindex={level},postindex_core={level}")
}

/// Install the global subscriber
pub fn init_tracing(
    verbose: bool,
    log_level: Option<&str>,
    log_json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env(LOG_ENV))
        .unwrap_or_else(|_| EnvFilter::new(flag_directive(verbose, log_level)));
    let registry = tracing_subscriber::registry().with(filter);

    if log_json {
        let layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);
        registry.with(layer).try_init()?;
    } else {
        let layer = fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_ansi(false);
        registry.with(layer).try_init()?;
    }
    Ok(())
}
