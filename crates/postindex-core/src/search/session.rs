//! Interactive query session: debouncing and stale-result suppression
//!
//! Every input change takes a new ticket. A search started for an older
//! ticket is discarded on completion, so results never arrive for a query
//! the user has already moved past.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use super::{SearchEngine, SearchResult};

/// Holds the latest input until it has been quiet for the full period
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    pending: Option<(String, Instant)>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Debouncer {
            quiet,
            pending: None,
        }
    }

    /// Record new input at `now`, replacing anything pending
    pub fn push(&mut self, input: impl Into<String>, now: Instant) {
        self.pending = Some((input.into(), now));
    }

    /// Take the pending input if it has been quiet long enough
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, at)) if now.duration_since(*at) >= self.quiet => {
                self.pending.take().map(|(input, _)| input)
            }
            _ => None,
        }
    }

    /// Time left until the pending input settles
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, at)| self.quiet.saturating_sub(now.duration_since(*at)))
    }

    /// Take the pending input regardless of the quiet period
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|(input, _)| input)
    }
}

/// Issues increasing tickets; only the latest one is current
#[derive(Debug, Default)]
pub struct QuerySequencer {
    latest: AtomicU64,
}

impl QuerySequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_ticket(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    pub fn is_latest(&self, ticket: u64) -> bool {
        self.current() == ticket
    }

    /// Pass `results` through only if `ticket` is still current
    pub fn accept<T>(&self, ticket: u64, results: T) -> Option<T> {
        if self.is_latest(ticket) {
            Some(results)
        } else {
            tracing::trace!(ticket, latest = self.current(), "discarding stale results");
            None
        }
    }
}

/// A settled query waiting to be run and delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSearch {
    ticket: u64,
    query: String,
}

impl PendingSearch {
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Debounced search over a shared engine
///
/// A settled query goes through three steps: [`poll`](Self::poll) or
/// [`flush`](Self::flush) hands out a [`PendingSearch`], [`run`](Self::run)
/// searches it, and [`complete`](Self::complete) delivers the results
/// unless newer input arrived in between.
pub struct SearchSession<'a> {
    engine: &'a SearchEngine,
    debouncer: Debouncer,
    sequencer: QuerySequencer,
}

impl<'a> SearchSession<'a> {
    pub fn new(engine: &'a SearchEngine, quiet: Duration) -> Self {
        SearchSession {
            engine,
            debouncer: Debouncer::new(quiet),
            sequencer: QuerySequencer::new(),
        }
    }

    /// Record a keystroke-level input change
    pub fn input(&mut self, query: impl Into<String>, now: Instant) {
        self.sequencer.next_ticket();
        self.debouncer.push(query, now);
    }

    /// How long the caller may wait before polling again
    pub fn wait_hint(&self, now: Instant) -> Option<Duration> {
        self.debouncer.remaining(now)
    }

    /// The settled query, if any
    pub fn poll(&mut self, now: Instant) -> Option<PendingSearch> {
        let query = self.debouncer.poll(now)?;
        Some(self.pending(query))
    }

    /// Whatever is pending, settled or not (end of input)
    pub fn flush(&mut self) -> Option<PendingSearch> {
        let query = self.debouncer.flush()?;
        Some(self.pending(query))
    }

    fn pending(&self, query: String) -> PendingSearch {
        PendingSearch {
            ticket: self.sequencer.current(),
            query,
        }
    }

    pub fn run(&self, pending: &PendingSearch) -> Vec<SearchResult> {
        self.engine.search(&pending.query)
    }

    /// Deliver results, or `None` if input changed since the query settled
    pub fn complete(
        &self,
        pending: PendingSearch,
        results: Vec<SearchResult>,
    ) -> Option<(String, Vec<SearchResult>)> {
        self.sequencer
            .accept(pending.ticket, results)
            .map(|results| (pending.query, results))
    }
}
