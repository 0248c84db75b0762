//! Search provider boundary.
//!
//! - [`SearchProvider`] - Async trait a provider adapter implements
//! - [`SearchCandidate`] - One ranked result returned for a query
//! - [`ProviderError`] / [`ProviderFailure`] - Classified provider failures
//! - [`DuckDuckGoProvider`] - Adapter for the DuckDuckGo HTML endpoint
//! - [`ProxyConfig`] - Static per-scheme proxy endpoints

mod duckduckgo;
mod error;
mod http_client;
mod proxy;

pub use duckduckgo::DuckDuckGoProvider;
pub use error::{ProviderError, ProviderFailure};
pub use proxy::ProxyConfig;

use async_trait::async_trait;

/// Default number of results requested per query.
pub const DEFAULT_RESULT_CAP: usize = 10;

/// One ranked result returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCandidate {
    /// Target URL of the result.
    pub url: String,
    /// Result title, when the provider exposes one.
    pub title: Option<String>,
}

impl SearchCandidate {
    /// Creates a candidate with only a URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
        }
    }

    /// Creates a candidate with a URL and a title.
    #[must_use]
    pub fn with_title(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: Some(title.into()),
        }
    }
}

/// A search service returning ranked candidates for a query.
///
/// Implementations classify every failure into [`ProviderFailure`] when they
/// build the [`ProviderError`]. Uses `async_trait` so resolvers can hold an
/// `Arc<dyn SearchProvider>`.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Returns the provider's name (e.g., "duckduckgo").
    fn name(&self) -> &str;

    /// Runs one search and returns at most `max_results` candidates in rank order.
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchCandidate>, ProviderError>;
}
