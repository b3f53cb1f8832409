//! Search engine over the posts index
//!
//! A [`SearchEngine`] owns its entries. They are loaded at most once, on the
//! first call to [`SearchEngine::initialize`] or [`SearchEngine::search`],
//! from the primary source and, if that fails, from the fallback source.

pub mod scoring;
pub mod session;
pub mod source;

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

use crate::config::SearchConfig;
use crate::index::IndexedPost;
use crate::trace_time;

pub use scoring::{rank, score_post, MatchType, PreparedQuery, SearchResult};
pub use session::{Debouncer, PendingSearch, QuerySequencer, SearchSession};
pub use source::{IndexSource, LiveContentSource, StaticIndexSource};

/// Boxed index source shared across threads
pub type BoxedSource = Box<dyn IndexSource + Send + Sync>;

/// Observable engine lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Loading,
    Ready,
}

const UNINITIALIZED: u8 = 0;
const LOADING: u8 = 1;
const READY: u8 = 2;

/// Load-once, read-only search engine
pub struct SearchEngine {
    primary: BoxedSource,
    fallback: Option<BoxedSource>,
    config: SearchConfig,
    entries: OnceLock<Vec<IndexedPost>>,
    state: AtomicU8,
}

impl SearchEngine {
    /// Create an engine with default ranking parameters
    pub fn create(primary: BoxedSource, fallback: Option<BoxedSource>) -> Self {
        Self::with_config(primary, fallback, SearchConfig::default())
    }

    pub fn with_config(
        primary: BoxedSource,
        fallback: Option<BoxedSource>,
        config: SearchConfig,
    ) -> Self {
        SearchEngine {
            primary,
            fallback,
            config,
            entries: OnceLock::new(),
            state: AtomicU8::new(UNINITIALIZED),
        }
    }

    pub fn state(&self) -> EngineState {
        match self.state.load(Ordering::Acquire) {
            UNINITIALIZED => EngineState::Uninitialized,
            LOADING => EngineState::Loading,
            _ => EngineState::Ready,
        }
    }

    /// Number of loaded entries (zero before initialization)
    pub fn len(&self) -> usize {
        self.entries.get().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load entries if not already loaded
    ///
    /// Concurrent callers block until the first one finishes loading.
    pub fn initialize(&self) {
        self.entries();
    }

    fn entries(&self) -> &[IndexedPost] {
        self.entries.get_or_init(|| {
            self.state.store(LOADING, Ordering::Release);
            let entries = self.load();
            self.state.store(READY, Ordering::Release);
            entries
        })
    }

    fn load(&self) -> Vec<IndexedPost> {
        let start = Instant::now();
        let sources = std::iter::once(&self.primary).chain(self.fallback.as_ref());

        for source in sources {
            match source.load() {
                Ok(entries) => {
                    tracing::debug!(source = source.name(), entries = entries.len(), "search index ready");
                    trace_time!(start, "search_index_load");
                    return entries;
                }
                Err(e) => {
                    tracing::warn!(source = source.name(), error = %e, "failed to load search index");
                }
            }
        }

        tracing::warn!("no index source available, search results will be empty");
        Vec::new()
    }

    /// Rank entries against `query`
    ///
    /// Queries shorter than the minimum length return nothing without
    /// loading the index.
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        let prepared = match PreparedQuery::new(query, self.config.min_query_len) {
            Some(prepared) => prepared,
            None => return Vec::new(),
        };
        let start = Instant::now();
        let results = rank(self.entries(), &prepared, &self.config);
        trace_time!(start, "search", results = results.len());
        results
    }
}
