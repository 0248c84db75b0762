//! Error types for search provider calls.
//!
//! Every provider failure is classified exactly once, where the raw transport
//! or HTTP error is received. Callers read the classification through
//! [`ProviderError::failure`] and never inspect message text.

use thiserror::Error;

/// Two-valued classification of a provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderFailure {
    /// The provider throttled the request; the same call may succeed later.
    RateLimited,
    /// Anything else. Retrying the same query will not help.
    Other,
}

impl std::fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimited => f.write_str("rate limited"),
            Self::Other => f.write_str("other"),
        }
    }
}

/// Errors returned by a [`SearchProvider`](super::SearchProvider).
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The provider answered with a throttling status.
    #[error("{provider} rate limited the request (HTTP {status})")]
    RateLimited {
        /// Provider name.
        provider: String,
        /// The HTTP status that signalled throttling.
        status: u16,
    },

    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("{provider} request failed: {reason}")]
    Request {
        /// Provider name.
        provider: String,
        /// Transport error description.
        reason: String,
    },

    /// The provider answered with a non-success status that is not throttling.
    #[error("{provider} returned HTTP {status}")]
    HttpStatus {
        /// Provider name.
        provider: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The response body could not be read or parsed.
    #[error("could not parse {provider} response: {reason}")]
    Parse {
        /// Provider name.
        provider: String,
        /// What went wrong.
        reason: String,
    },

    /// The HTTP client could not be constructed (bad proxy URL, TLS backend).
    #[error("could not build HTTP client for {provider}: {reason}\n  Suggestion: {suggestion}")]
    Client {
        /// Provider name.
        provider: String,
        /// Why construction failed.
        reason: String,
        /// How to fix the issue.
        suggestion: String,
    },
}

impl ProviderError {
    /// Creates a `RateLimited` error.
    #[must_use]
    pub fn rate_limited(provider: &str, status: u16) -> Self {
        Self::RateLimited {
            provider: provider.to_string(),
            status,
        }
    }

    /// Creates a `Request` error.
    #[must_use]
    pub fn request(provider: &str, reason: impl std::fmt::Display) -> Self {
        Self::Request {
            provider: provider.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates an `HttpStatus` error.
    #[must_use]
    pub fn http_status(provider: &str, status: u16) -> Self {
        Self::HttpStatus {
            provider: provider.to_string(),
            status,
        }
    }

    /// Creates a `Parse` error.
    #[must_use]
    pub fn parse(provider: &str, reason: impl std::fmt::Display) -> Self {
        Self::Parse {
            provider: provider.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a `Client` error.
    #[must_use]
    pub fn client(provider: &str, reason: impl std::fmt::Display) -> Self {
        Self::Client {
            provider: provider.to_string(),
            reason: reason.to_string(),
            suggestion: "Check the proxy URLs in the config file or command line".to_string(),
        }
    }

    /// Returns the retry classification of this error.
    #[must_use]
    pub fn failure(&self) -> ProviderFailure {
        match self {
            Self::RateLimited { .. } => ProviderFailure::RateLimited,
            Self::Request { .. }
            | Self::HttpStatus { .. }
            | Self::Parse { .. }
            | Self::Client { .. } => ProviderFailure::Other,
        }
    }
}
