//! DuckDuckGo search provider.
//!
//! Uses the HTML-only endpoint at `https://html.duckduckgo.com/html/`, which
//! needs no JavaScript and no API key. Result links are wrapped in a DDG
//! redirect (`//duckduckgo.com/l/?uddg=...`); the adapter unwraps them so
//! callers see the target URL.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, trace, warn};
use url::Url;

use super::http_client::build_search_http_client;
use super::{ProviderError, ProxyConfig, SearchCandidate, SearchProvider};

/// Default DuckDuckGo HTML endpoint base URL.
const DEFAULT_BASE_URL: &str = "https://html.duckduckgo.com";

const PROVIDER_NAME: &str = "duckduckgo";

/// Searches DuckDuckGo through its HTML endpoint.
pub struct DuckDuckGoProvider {
    client: Client,
    base_url: String,
}

impl DuckDuckGoProvider {
    /// Creates a provider that routes traffic through `proxy`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Client`] if a proxy URL is invalid or the HTTP
    /// client cannot be built.
    #[tracing::instrument(skip_all)]
    pub fn new(proxy: &ProxyConfig) -> Result<Self, ProviderError> {
        Self::with_base_url(proxy, DEFAULT_BASE_URL)
    }

    /// Creates a provider with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Client`] if the HTTP client cannot be built.
    #[tracing::instrument(skip_all, fields(base_url))]
    pub fn with_base_url(
        proxy: &ProxyConfig,
        base_url: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let client = build_search_http_client(PROVIDER_NAME, proxy)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self, query: &str) -> Result<Url, ProviderError> {
        Url::parse_with_params(&format!("{}/html/", self.base_url), &[("q", query)])
            .map_err(|error| ProviderError::request(PROVIDER_NAME, format!("invalid URL: {error}")))
    }
}

impl std::fmt::Debug for DuckDuckGoProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckDuckGoProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    #[tracing::instrument(skip(self), fields(provider = PROVIDER_NAME))]
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchCandidate>, ProviderError> {
        let url = self.search_url(query)?;

        let response = self
            .client
            .get(url)
            .header("Accept-Language", "tr-TR,tr;q=0.9,en-US;q=0.8,en;q=0.7")
            .send()
            .await
            .map_err(|error| {
                warn!(error = %error, "DuckDuckGo request failed");
                ProviderError::request(PROVIDER_NAME, error)
            })?;

        let status = response.status().as_u16();
        if let Some(error) = classify_status(status) {
            debug!(status, error = %error, "DuckDuckGo returned an error status");
            return Err(error);
        }

        let html = response
            .text()
            .await
            .map_err(|error| ProviderError::parse(PROVIDER_NAME, error))?;
        trace!(bytes = html.len(), "DuckDuckGo response received");

        parse_results(&html, max_results)
    }
}

/// Maps a response status to a classified error, or `None` for a usable page.
///
/// | Status | Outcome | Rationale |
/// |--------|---------|-----------|
/// | 200 | page | Normal result page |
/// | 202 | RateLimited | DDG serves its anomaly challenge with 202 |
/// | 403 | RateLimited | Blocked for request volume |
/// | 418 | RateLimited | Bot challenge |
/// | 429 | RateLimited | Too Many Requests |
/// | other 2xx | page | Treated as a result page |
/// | anything else | Other | Not recoverable by waiting |
#[allow(clippy::match_same_arms)]
fn classify_status(status: u16) -> Option<ProviderError> {
    match status {
        202 | 403 | 418 | 429 => Some(ProviderError::rate_limited(PROVIDER_NAME, status)),
        200..=299 => None,
        _ => Some(ProviderError::http_status(PROVIDER_NAME, status)),
    }
}

/// Extracts the target URL from DuckDuckGo's redirect wrapper.
///
/// Protocol-relative links get `https:`; links that are not DDG redirects are
/// returned unchanged.
fn extract_url(href: &str) -> Option<String> {
    let full_href = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };

    let parsed = Url::parse(&full_href).ok()?;

    if parsed.host_str() == Some("duckduckgo.com") && parsed.path().starts_with("/l/") {
        parsed
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, value)| value.into_owned())
    } else {
        Some(full_href)
    }
}

/// Parses a DuckDuckGo HTML result page into ranked candidates.
pub(crate) fn parse_results(
    html: &str,
    max_results: usize,
) -> Result<Vec<SearchCandidate>, ProviderError> {
    let document = Html::parse_document(html);

    let result_sel = Selector::parse(
        ".result.results_links.results_links_deep:not(.result--ad), .web-result:not(.result--ad)",
    )
    .map_err(|error| ProviderError::parse(PROVIDER_NAME, format!("result selector: {error:?}")))?;
    let link_sel = Selector::parse(".result__a")
        .map_err(|error| ProviderError::parse(PROVIDER_NAME, format!("link selector: {error:?}")))?;

    let mut candidates = Vec::new();
    if max_results == 0 {
        return Ok(candidates);
    }

    for element in document.select(&result_sel) {
        let Some(link) = element.select(&link_sel).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let Some(url) = extract_url(href) else {
            continue;
        };

        let title = link.text().collect::<String>().trim().to_string();
        candidates.push(if title.is_empty() {
            SearchCandidate::new(url)
        } else {
            SearchCandidate::with_title(url, title)
        });

        if candidates.len() >= max_results {
            break;
        }
    }

    debug!(count = candidates.len(), "DuckDuckGo results parsed");
    Ok(candidates)
}
