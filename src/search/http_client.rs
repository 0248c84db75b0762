//! Shared HTTP client construction for search providers.
//!
//! Centralizes timeouts, user-agent, compression, cookies and proxy settings
//! so every provider adapter talks to the network the same way.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use reqwest::{Client, ClientBuilder, Proxy};
use tracing::{debug, warn};

use crate::user_agent;

use super::{ProviderError, ProxyConfig};

const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 30;

/// Builds a provider HTTP client using the static proxy configuration.
///
/// `provider` is used only in error messages and logs.
///
/// # Errors
///
/// Returns [`ProviderError::Client`] when a proxy URL is invalid or client
/// construction fails.
pub(crate) fn build_search_http_client(
    provider: &str,
    proxy: &ProxyConfig,
) -> Result<Client, ProviderError> {
    let proxies = build_proxies(provider, proxy)?;

    match try_build_client(&proxies, false) {
        Ok(client) => Ok(client),
        Err(BuildClientFailure::Panic) => {
            // Some sandboxed macOS environments panic when reading system
            // proxy settings; retry without the system lookup.
            warn!(
                provider,
                "HTTP client hit system proxy panic; building without system proxy lookup"
            );
            match try_build_client(&proxies, true) {
                Ok(client) => Ok(client),
                Err(BuildClientFailure::Panic) => Err(ProviderError::client(
                    provider,
                    "HTTP client construction panicked",
                )),
                Err(BuildClientFailure::Build(error)) => {
                    Err(ProviderError::client(provider, error))
                }
            }
        }
        Err(BuildClientFailure::Build(error)) => Err(ProviderError::client(provider, error)),
    }
}

enum BuildClientFailure {
    Panic,
    Build(reqwest::Error),
}

fn build_proxies(provider: &str, proxy: &ProxyConfig) -> Result<Vec<Proxy>, ProviderError> {
    let mut proxies = Vec::new();
    if let Some(endpoint) = proxy.http.as_deref() {
        let resolved = Proxy::http(endpoint)
            .map_err(|error| ProviderError::client(provider, format!("http proxy: {error}")))?;
        proxies.push(resolved);
    }
    if let Some(endpoint) = proxy.https.as_deref() {
        let resolved = Proxy::https(endpoint)
            .map_err(|error| ProviderError::client(provider, format!("https proxy: {error}")))?;
        proxies.push(resolved);
    }
    debug!(provider, proxies = proxies.len(), "Configured search proxies");
    Ok(proxies)
}

fn try_build_client(
    proxies: &[Proxy],
    disable_system_proxy_lookup: bool,
) -> Result<Client, BuildClientFailure> {
    let proxies = proxies.to_vec();
    catch_unwind(AssertUnwindSafe(move || {
        let mut builder = base_builder();
        if disable_system_proxy_lookup {
            builder = builder.no_proxy();
        }
        for proxy in proxies {
            builder = builder.proxy(proxy);
        }
        builder.build().map_err(BuildClientFailure::Build)
    }))
    .map_err(|_| BuildClientFailure::Panic)?
}

fn base_builder() -> ClientBuilder {
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
        .user_agent(user_agent::default_search_user_agent())
        .cookie_store(true)
        .gzip(true)
}
