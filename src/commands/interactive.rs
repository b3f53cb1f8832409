//! `postindex interactive` command - debounced queries from stdin
//!
//! One reader thread forwards stdin lines over a channel. The main thread
//! waits with `recv_timeout` until the pending query has been quiet for the
//! debounce period, then runs it. Lines superseded before they settle are
//! never searched, and lines arriving during a search discard its results.

use std::io::{self, BufRead};
use std::path::Path;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crate::cli::{Cli, OutputFormat};
use crate::commands::search::{open_engine, print_results};
use postindex_core::config::SiteConfig;
use postindex_core::error::Result;
use postindex_core::search::{SearchResult, SearchSession};

/// Wait used when nothing is pending
const IDLE_WAIT: Duration = Duration::from_secs(3600);

/// Execute the interactive command
pub fn execute(
    cli: &Cli,
    root: &Path,
    config: SiteConfig,
    debounce_ms: Option<u64>,
    index: Option<&Path>,
) -> Result<()> {
    let quiet = Duration::from_millis(debounce_ms.unwrap_or(config.search.debounce_ms));
    let engine = open_engine(root, &config, index, true);
    let mut session = SearchSession::new(&engine, quiet);

    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "stdin read failed");
                    break;
                }
            }
        }
    });

    if !cli.quiet && cli.format == OutputFormat::Human {
        eprintln!("Type a query per line; results appear after {:?} of quiet.", quiet);
    }

    loop {
        let wait = session.wait_hint(Instant::now()).unwrap_or(IDLE_WAIT);
        match rx.recv_timeout(wait) {
            Ok(line) => session.input(line, Instant::now()),
            Err(RecvTimeoutError::Timeout) => {
                if let Some(pending) = session.poll(Instant::now()) {
                    let results = session.run(&pending);
                    // lines typed while searching supersede this query
                    while let Ok(line) = rx.try_recv() {
                        session.input(line, Instant::now());
                    }
                    if let Some((query, results)) = session.complete(pending, results) {
                        render(cli, &query, &results)?;
                    }
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                if let Some(pending) = session.flush() {
                    let results = session.run(&pending);
                    if let Some((query, results)) = session.complete(pending, results) {
                        render(cli, &query, &results)?;
                    }
                }
                break;
            }
        }
    }
    Ok(())
}

fn render(cli: &Cli, query: &str, results: &[SearchResult]) -> Result<()> {
    match cli.format {
        OutputFormat::Json => {
            let line = serde_json::json!({ "query": query, "results": results });
            println!("{}", serde_json::to_string(&line)?);
        }
        OutputFormat::Human => {
            println!("> {}", query);
            print_results(cli, query, results);
        }
    }
    Ok(())
}
