//! Run events and the sinks that receive them.
//!
//! The resolver and the batch orchestrator report progress, retry decisions
//! and failures as [`RunEvent`]s through an injected [`EventSink`]. The
//! production sink forwards to `tracing`, whose subscriber is set up once at
//! process start; tests use [`MemoryEventSink`].

use std::fmt;
use std::sync::Mutex;
use std::time::Duration;

use tracing::{error, info, warn};

/// Something that happened during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// The batch is about to process `total` queries.
    BatchStarted {
        /// Number of queries in the batch.
        total: usize,
    },
    /// Query `index` (1-based) of `total` is starting.
    QueryStarted {
        /// 1-based position in the batch.
        index: usize,
        /// Batch size.
        total: usize,
        /// The original query.
        query: String,
    },
    /// The provider returned `url` for `query`.
    CandidateSeen {
        /// The search phrase sent to the provider.
        query: String,
        /// Candidate URL.
        url: String,
    },
    /// The provider throttled attempt `attempt`; the resolver waits `wait`.
    RateLimited {
        /// The search phrase sent to the provider.
        query: String,
        /// The attempt that was throttled (1-based).
        attempt: u32,
        /// How long the resolver will wait before the next attempt.
        wait: Duration,
    },
    /// Still throttled after `attempts` attempts; the resolver waits
    /// `cooldown`, then leaves the query unresolved.
    RetriesExhausted {
        /// The search phrase sent to the provider.
        query: String,
        /// Attempts made.
        attempts: u32,
        /// Wait before moving on.
        cooldown: Duration,
    },
    /// A non-retryable provider failure ended resolution of `query`.
    ProviderFailed {
        /// The search phrase sent to the provider.
        query: String,
        /// The attempt that failed (1-based).
        attempt: u32,
        /// Provider error text.
        error: String,
    },
    /// `query` resolved to `link`.
    Matched {
        /// The original query.
        query: String,
        /// Resolved link.
        link: String,
    },
    /// No candidate for `query` was on the target domain.
    NoMatch {
        /// The original query.
        query: String,
    },
    /// The batch finished.
    BatchFinished {
        /// Number of queries processed.
        total: usize,
        /// Number of queries with a link.
        matched: usize,
    },
}

impl fmt::Display for RunEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BatchStarted { total } => {
                write!(f, "Found {total} queries, starting search process")
            }
            Self::QueryStarted {
                index,
                total,
                query,
            } => write!(f, "[{index}/{total}] Processing query: {query}"),
            Self::CandidateSeen { url, .. } => write!(f, "URL found for query: {url}"),
            Self::RateLimited {
                query,
                attempt,
                wait,
            } => write!(
                f,
                "Rate limited searching '{query}' on attempt {attempt}; waiting {} seconds",
                wait.as_secs()
            ),
            Self::RetriesExhausted {
                query,
                attempts,
                cooldown,
            } => write!(
                f,
                "Still rate limited after {attempts} attempts for '{query}'; waiting {} seconds before giving up",
                cooldown.as_secs()
            ),
            Self::ProviderFailed {
                query,
                attempt,
                error,
            } => write!(
                f,
                "Search failed for '{query}' on attempt {attempt}: {error}"
            ),
            Self::Matched { query, link } => write!(f, "Matched '{query}' to {link}"),
            Self::NoMatch { query } => write!(f, "No suitable link found for query: {query}"),
            Self::BatchFinished { total, matched } => write!(
                f,
                "Search process completed: {matched}/{total} queries matched"
            ),
        }
    }
}

/// Receives run events in the order they happen.
///
/// Implementations must not block for long; the batch runs on one task and
/// waits for every `emit` to return.
pub trait EventSink: Send + Sync {
    /// Records one event.
    fn emit(&self, event: &RunEvent);
}

/// Forwards events to the process-wide `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: &RunEvent) {
        match event {
            RunEvent::BatchStarted { total } => info!(total, "{event}"),
            RunEvent::QueryStarted {
                index,
                total,
                query,
            } => info!(index, total, query = %query, "{event}"),
            RunEvent::CandidateSeen { query, url } => {
                info!(query = %query, url = %url, "{event}");
            }
            RunEvent::RateLimited {
                query,
                attempt,
                wait,
            } => warn!(
                query = %query,
                attempt,
                wait_secs = wait.as_secs(),
                "{event}"
            ),
            RunEvent::RetriesExhausted {
                query,
                attempts,
                cooldown,
            } => warn!(
                query = %query,
                attempts,
                wait_secs = cooldown.as_secs(),
                "{event}"
            ),
            RunEvent::ProviderFailed {
                query,
                attempt,
                error,
            } => error!(query = %query, attempt, error = %error, "{event}"),
            RunEvent::Matched { query, link } => info!(query = %query, link = %link, "{event}"),
            RunEvent::NoMatch { query } => info!(query = %query, "{event}"),
            RunEvent::BatchFinished { total, matched } => info!(total, matched, "{event}"),
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    events: Mutex<Vec<RunEvent>>,
}

impl MemoryEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of recorded events in emit order.
    #[must_use]
    pub fn events(&self) -> Vec<RunEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Returns the rendered message of every recorded event.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.events().iter().map(ToString::to_string).collect()
    }
}

impl EventSink for MemoryEventSink {
    fn emit(&self, event: &RunEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
