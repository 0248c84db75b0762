//! Batch orchestration across an ordered list of queries.
//!
//! [`QueryBatchOrchestrator`] drives a [`SearchResolver`] over every query in
//! input order, one at a time, sleeping a random throttle interval between
//! queries. Individual failures never stop the batch: each query yields
//! exactly one [`ResolutionRecord`], possibly with an empty link.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::clock::Sleeper;
use crate::events::{EventSink, RunEvent};
use crate::resolver::SearchResolver;

/// Literal appended to every query to steer the provider toward the target site.
pub const SEARCH_SUFFIX: &str = " akakce";

/// Default lower bound of the inter-query throttle.
pub const DEFAULT_THROTTLE_MIN: Duration = Duration::from_secs(2);

/// Default upper bound of the inter-query throttle.
pub const DEFAULT_THROTTLE_MAX: Duration = Duration::from_secs(4);

/// Builds the phrase sent to the provider for `query`.
#[must_use]
pub fn search_phrase(query: &str) -> String {
    format!("{query}{SEARCH_SUFFIX}")
}

/// One input query paired with its resolved link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionRecord {
    /// The original query, without the search suffix.
    #[serde(rename = "Search")]
    pub query: String,
    /// The resolved link; empty when nothing matched.
    #[serde(rename = "Link")]
    pub link: String,
}

impl ResolutionRecord {
    /// Creates a record.
    #[must_use]
    pub fn new(query: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            link: link.into(),
        }
    }

    /// Returns true when the record carries a link.
    #[must_use]
    pub fn is_matched(&self) -> bool {
        !self.link.is_empty()
    }
}

/// Closed interval the inter-query sleep is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleWindow {
    min: Duration,
    max: Duration,
}

impl Default for ThrottleWindow {
    fn default() -> Self {
        Self {
            min: DEFAULT_THROTTLE_MIN,
            max: DEFAULT_THROTTLE_MAX,
        }
    }
}

impl ThrottleWindow {
    /// Creates a window; the bounds are swapped if given in reverse.
    #[must_use]
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// A window that never sleeps.
    #[must_use]
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Lower bound.
    #[must_use]
    pub fn min(&self) -> Duration {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub fn max(&self) -> Duration {
        self.max
    }

    /// Draws a duration uniformly from `[min, max]` at millisecond resolution.
    #[allow(clippy::cast_possible_truncation)]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let min_ms = self.min.as_millis() as u64;
        let max_ms = self.max.as_millis() as u64;
        Duration::from_millis(rng.gen_range(min_ms..=max_ms))
    }
}

/// Totals for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    total: usize,
    matched: usize,
}

impl BatchStats {
    /// Counts matched and unmatched records.
    #[must_use]
    pub fn from_records(records: &[ResolutionRecord]) -> Self {
        Self {
            total: records.len(),
            matched: records.iter().filter(|record| record.is_matched()).count(),
        }
    }

    /// Number of records.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Records with a link.
    #[must_use]
    pub fn matched(&self) -> usize {
        self.matched
    }

    /// Records without a link.
    #[must_use]
    pub fn unmatched(&self) -> usize {
        self.total - self.matched
    }
}

/// Runs a resolver across a batch of queries, strictly sequentially.
pub struct QueryBatchOrchestrator {
    resolver: SearchResolver,
    sleeper: Arc<dyn Sleeper>,
    events: Arc<dyn EventSink>,
    throttle: ThrottleWindow,
}

impl QueryBatchOrchestrator {
    /// Creates an orchestrator with the default 2–4 s throttle window.
    #[must_use]
    pub fn new(
        resolver: SearchResolver,
        sleeper: Arc<dyn Sleeper>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            resolver,
            sleeper,
            events,
            throttle: ThrottleWindow::default(),
        }
    }

    /// Replaces the throttle window.
    #[must_use]
    pub fn with_throttle(mut self, throttle: ThrottleWindow) -> Self {
        self.throttle = throttle;
        self
    }

    /// Resolves every query in order and returns one record per query.
    ///
    /// Sleeps for a throttle interval between consecutive queries; the last
    /// query is not followed by a sleep.
    #[tracing::instrument(skip_all, fields(total = queries.len()))]
    pub async fn run<S: AsRef<str>>(&self, queries: &[S]) -> Vec<ResolutionRecord> {
        let total = queries.len();
        let mut records = Vec::with_capacity(total);
        self.events.emit(&RunEvent::BatchStarted { total });

        for (position, query) in queries.iter().enumerate() {
            let query = query.as_ref();
            let index = position + 1;
            self.events.emit(&RunEvent::QueryStarted {
                index,
                total,
                query: query.to_string(),
            });

            let link = self.resolver.resolve(&search_phrase(query)).await;
            if link.is_empty() {
                self.events.emit(&RunEvent::NoMatch {
                    query: query.to_string(),
                });
            } else {
                self.events.emit(&RunEvent::Matched {
                    query: query.to_string(),
                    link: link.clone(),
                });
            }
            records.push(ResolutionRecord::new(query, link));

            if index < total {
                let pause = self.throttle.sample(&mut rand::thread_rng());
                debug!(pause_ms = pause.as_millis(), "Throttling before next query");
                self.sleeper.sleep(pause).await;
            }
        }

        let stats = BatchStats::from_records(&records);
        self.events.emit(&RunEvent::BatchFinished {
            total: stats.total(),
            matched: stats.matched(),
        });
        records
    }
}

impl std::fmt::Debug for QueryBatchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryBatchOrchestrator")
            .field("resolver", &self.resolver)
            .field("throttle", &self.throttle)
            .finish_non_exhaustive()
    }
}
