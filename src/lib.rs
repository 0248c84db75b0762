//! Akakce Search Core Library
//!
//! Resolves free-text product queries to akakce.com product pages through a
//! web search provider, with rate-limit backoff and batch throttling.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`search`] - Provider boundary, DuckDuckGo adapter, proxy settings
//! - [`resolver`] - Per-query resolution with backoff and domain filtering
//! - [`batch`] - Sequential batch orchestration with throttling
//! - [`table`] - CSV query input and result output
//! - [`events`] - Run events and the sinks that receive them
//! - [`clock`] - Injectable sleeping

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod batch;
pub mod clock;
pub mod events;
pub mod resolver;
pub mod search;
pub mod table;

mod user_agent;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use batch::{
    BatchStats, QueryBatchOrchestrator, ResolutionRecord, SEARCH_SUFFIX, ThrottleWindow,
};
pub use clock::{RecordingSleeper, Sleeper, TokioSleeper};
pub use events::{EventSink, MemoryEventSink, RunEvent, TracingEventSink};
pub use resolver::{BackoffDecision, BackoffPolicy, DomainFilter, ResolutionOutcome, SearchResolver};
pub use search::{
    DEFAULT_RESULT_CAP, DuckDuckGoProvider, ProviderError, ProviderFailure, ProxyConfig,
    SearchCandidate, SearchProvider,
};
pub use table::{QueryColumn, QuerySheet, TableError, load_queries, write_records};
