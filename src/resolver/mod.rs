//! Query resolution: one search phrase in, at most one target-domain link out.
//!
//! # Architecture
//!
//! - [`SearchResolver`] - Runs the provider call, retries throttled attempts,
//!   filters candidates by domain
//! - [`BackoffPolicy`] - Retry eligibility and linear wait calculation
//! - [`DomainFilter`] - Prefix test deciding which candidate is accepted
//! - [`ResolutionOutcome`] - Intermediate result before it is reduced to a link
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use akakce_search_core::clock::TokioSleeper;
//! use akakce_search_core::events::TracingEventSink;
//! use akakce_search_core::resolver::SearchResolver;
//! use akakce_search_core::search::{DuckDuckGoProvider, ProxyConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = DuckDuckGoProvider::new(&ProxyConfig::default())?;
//! let resolver = SearchResolver::new(
//!     Arc::new(provider),
//!     Arc::new(TokioSleeper),
//!     Arc::new(TracingEventSink),
//! );
//! let link = resolver.resolve("iphone 15 akakce").await;
//! println!("Resolved: {link}");
//! # Ok(())
//! # }
//! ```

mod backoff;
mod domain;

pub use backoff::{BackoffDecision, BackoffPolicy, DEFAULT_BASE_WAIT, DEFAULT_MAX_ATTEMPTS};
pub use domain::{AKAKCE_PREFIXES, DomainFilter};

use std::sync::Arc;

use crate::clock::Sleeper;
use crate::events::{EventSink, RunEvent};
use crate::search::{DEFAULT_RESULT_CAP, ProviderFailure, SearchProvider};

/// Result of resolving one search phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// A candidate on the target domain.
    Matched(String),
    /// The provider answered but no candidate was on the target domain.
    NotFound,
    /// The provider failed; `RateLimited` means the attempts ran out.
    Failed(ProviderFailure),
}

impl ResolutionOutcome {
    /// Reduces the outcome to a link; empty for anything but a match.
    #[must_use]
    pub fn into_link(self) -> String {
        match self {
            Self::Matched(link) => link,
            Self::NotFound | Self::Failed(_) => String::new(),
        }
    }

    /// Returns true for [`ResolutionOutcome::Matched`].
    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched(_))
    }
}

/// Resolves a search phrase to the first candidate on the target domain.
///
/// Provider failures never escape: a throttled call is retried according to
/// the [`BackoffPolicy`], anything else ends the attempt. Either way the
/// caller gets an empty link rather than an error.
pub struct SearchResolver {
    provider: Arc<dyn SearchProvider>,
    sleeper: Arc<dyn Sleeper>,
    events: Arc<dyn EventSink>,
    policy: BackoffPolicy,
    filter: DomainFilter,
    result_cap: usize,
}

impl SearchResolver {
    /// Creates a resolver with the default policy, akakce.com filter and a
    /// result cap of [`DEFAULT_RESULT_CAP`].
    #[must_use]
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        sleeper: Arc<dyn Sleeper>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            provider,
            sleeper,
            events,
            policy: BackoffPolicy::default(),
            filter: DomainFilter::default(),
            result_cap: DEFAULT_RESULT_CAP,
        }
    }

    /// Replaces the backoff policy.
    #[must_use]
    pub fn with_policy(mut self, policy: BackoffPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the domain filter.
    #[must_use]
    pub fn with_filter(mut self, filter: DomainFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Replaces the per-call result cap.
    #[must_use]
    pub fn with_result_cap(mut self, result_cap: usize) -> Self {
        self.result_cap = result_cap;
        self
    }

    /// Resolves `query` to a link, or an empty string when nothing matched.
    pub async fn resolve(&self, query: &str) -> String {
        self.resolve_outcome(query).await.into_link()
    }

    /// Resolves `query` and reports how resolution ended.
    #[tracing::instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn resolve_outcome(&self, query: &str) -> ResolutionOutcome {
        let mut attempt = 1;
        loop {
            let error = match self.provider.search(query, self.result_cap).await {
                Ok(candidates) => {
                    for candidate in &candidates {
                        self.events.emit(&RunEvent::CandidateSeen {
                            query: query.to_string(),
                            url: candidate.url.clone(),
                        });
                        if self.filter.accepts(&candidate.url) {
                            return ResolutionOutcome::Matched(candidate.url.clone());
                        }
                    }
                    return ResolutionOutcome::NotFound;
                }
                Err(error) => error,
            };

            match error.failure() {
                ProviderFailure::Other => {
                    self.events.emit(&RunEvent::ProviderFailed {
                        query: query.to_string(),
                        attempt,
                        error: error.to_string(),
                    });
                    return ResolutionOutcome::Failed(ProviderFailure::Other);
                }
                ProviderFailure::RateLimited => match self.policy.decide(attempt) {
                    BackoffDecision::Retry { wait, next_attempt } => {
                        self.events.emit(&RunEvent::RateLimited {
                            query: query.to_string(),
                            attempt,
                            wait,
                        });
                        self.sleeper.sleep(wait).await;
                        attempt = next_attempt;
                    }
                    BackoffDecision::GiveUp { attempts, cooldown } => {
                        self.events.emit(&RunEvent::RetriesExhausted {
                            query: query.to_string(),
                            attempts,
                            cooldown,
                        });
                        self.sleeper.sleep(cooldown).await;
                        return ResolutionOutcome::Failed(ProviderFailure::RateLimited);
                    }
                },
            }
        }
    }
}

impl std::fmt::Debug for SearchResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchResolver")
            .field("provider", &self.provider.name())
            .field("policy", &self.policy)
            .field("filter", &self.filter)
            .field("result_cap", &self.result_cap)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::clock::RecordingSleeper;
    use crate::events::MemoryEventSink;
    use crate::search::{ProviderError, SearchCandidate};

    /// Replays scripted responses in order and counts calls.
    struct ScriptedProvider {
        responses: Mutex<VecDeque<Result<Vec<SearchCandidate>, ProviderError>>>,
        calls: Mutex<Vec<(String, usize)>>,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<Result<Vec<SearchCandidate>, ProviderError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SearchProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn search(
            &self,
            query: &str,
            max_results: usize,
        ) -> Result<Vec<SearchCandidate>, ProviderError> {
            self.calls
                .lock()
                .unwrap()
                .push((query.to_string(), max_results));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn urls(urls: &[&str]) -> Result<Vec<SearchCandidate>, ProviderError> {
        Ok(urls.iter().map(|url| SearchCandidate::new(*url)).collect())
    }

    fn throttled() -> Result<Vec<SearchCandidate>, ProviderError> {
        Err(ProviderError::rate_limited("scripted", 429))
    }

    struct Harness {
        provider: Arc<ScriptedProvider>,
        sleeper: Arc<RecordingSleeper>,
        events: Arc<MemoryEventSink>,
        resolver: SearchResolver,
    }

    fn harness(responses: Vec<Result<Vec<SearchCandidate>, ProviderError>>) -> Harness {
        let provider = Arc::new(ScriptedProvider::new(responses));
        let sleeper = Arc::new(RecordingSleeper::new());
        let events = Arc::new(MemoryEventSink::new());
        let resolver = SearchResolver::new(provider.clone(), sleeper.clone(), events.clone());
        Harness {
            provider,
            sleeper,
            events,
            resolver,
        }
    }

    #[tokio::test]
    async fn test_resolve_returns_first_matching_candidate() {
        let h = harness(vec![urls(&[
            "http://example.com/x",
            "https://www.akakce.com/y",
            "http://www.akakce.com/z",
        ])]);

        let link = h.resolver.resolve("phone akakce").await;

        assert_eq!(link, "https://www.akakce.com/y");
        assert_eq!(h.provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_resolve_passes_result_cap_to_provider() {
        let h = harness(vec![urls(&[])]);
        let resolver = h.resolver.with_result_cap(25);

        resolver.resolve("q").await;

        let calls = h.provider.calls.lock().unwrap().clone();
        assert_eq!(calls, vec![("q".to_string(), 25)]);
    }

    #[tokio::test]
    async fn test_resolve_emits_candidate_events_until_match() {
        let h = harness(vec![urls(&[
            "http://example.com/x",
            "https://www.akakce.com/y",
            "https://never-seen.example/z",
        ])]);

        h.resolver.resolve("q").await;

        let seen: Vec<String> = h
            .events
            .events()
            .into_iter()
            .filter_map(|event| match event {
                RunEvent::CandidateSeen { url, .. } => Some(url),
                _ => None,
            })
            .collect();
        assert_eq!(seen, ["http://example.com/x", "https://www.akakce.com/y"]);
    }

    #[tokio::test]
    async fn test_resolve_no_match_is_not_found_without_retry() {
        let h = harness(vec![urls(&["https://example.com/a"])]);

        let outcome = h.resolver.resolve_outcome("q").await;

        assert_eq!(outcome, ResolutionOutcome::NotFound);
        assert_eq!(h.provider.call_count(), 1);
        assert!(h.sleeper.calls().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_other_failure_stops_immediately() {
        let h = harness(vec![
            Err(ProviderError::http_status("scripted", 500)),
            urls(&["https://www.akakce.com/never"]),
        ]);

        let outcome = h.resolver.resolve_outcome("q").await;

        assert_eq!(outcome, ResolutionOutcome::Failed(ProviderFailure::Other));
        assert_eq!(h.provider.call_count(), 1);
        assert!(h.sleeper.calls().is_empty());
        assert!(matches!(
            h.events.events().last(),
            Some(RunEvent::ProviderFailed { attempt: 1, .. })
        ));
    }

    #[tokio::test]
    async fn test_resolve_retries_after_rate_limit_with_linear_waits() {
        let h = harness(vec![
            throttled(),
            throttled(),
            urls(&["https://www.akakce.com/found"]),
        ]);

        let link = h.resolver.resolve("q").await;

        assert_eq!(link, "https://www.akakce.com/found");
        assert_eq!(h.provider.call_count(), 3);
        assert_eq!(
            h.sleeper.calls(),
            vec![Duration::from_secs(30), Duration::from_secs(60)]
        );
    }

    #[tokio::test]
    async fn test_resolve_gives_up_after_max_attempts() {
        let h = harness(vec![throttled(), throttled(), throttled(), throttled()]);

        let outcome = h.resolver.resolve_outcome("q").await;

        assert_eq!(
            outcome,
            ResolutionOutcome::Failed(ProviderFailure::RateLimited)
        );
        assert_eq!(h.provider.call_count(), 3);
        assert_eq!(
            h.sleeper.calls(),
            vec![
                Duration::from_secs(30),
                Duration::from_secs(60),
                Duration::from_secs(90)
            ]
        );
        assert!(matches!(
            h.events.events().last(),
            Some(RunEvent::RetriesExhausted { attempts: 3, .. })
        ));
    }

    #[tokio::test]
    async fn test_resolve_single_attempt_policy_only_cools_down() {
        let h = harness(vec![throttled()]);
        let resolver = h
            .resolver
            .with_policy(BackoffPolicy::new(1, Duration::from_secs(30)));

        let link = resolver.resolve("q").await;

        assert!(link.is_empty());
        assert_eq!(h.provider.call_count(), 1);
        assert_eq!(h.sleeper.calls(), vec![Duration::from_secs(30)]);
    }

    #[tokio::test]
    async fn test_resolve_custom_filter() {
        let h = harness(vec![urls(&[
            "https://www.akakce.com/y",
            "https://www.cimri.com/z",
        ])]);
        let resolver = h
            .resolver
            .with_filter(DomainFilter::new(["https://www.cimri.com"]));

        assert_eq!(resolver.resolve("q").await, "https://www.cimri.com/z");
    }

    #[test]
    fn test_outcome_into_link() {
        assert_eq!(
            ResolutionOutcome::Matched("https://www.akakce.com/a".to_string()).into_link(),
            "https://www.akakce.com/a"
        );
        assert_eq!(ResolutionOutcome::NotFound.into_link(), "");
        assert_eq!(
            ResolutionOutcome::Failed(ProviderFailure::RateLimited).into_link(),
            ""
        );
        assert!(ResolutionOutcome::Matched(String::new()).is_match());
        assert!(!ResolutionOutcome::NotFound.is_match());
    }
}
