//! Static proxy endpoints for provider traffic.

/// One proxy endpoint per URL scheme, fixed for the life of a run.
///
/// There is no rotation: whatever pair is configured at startup is used for
/// every request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Proxy for `http://` requests.
    pub http: Option<String>,
    /// Proxy for `https://` requests.
    pub https: Option<String>,
}

impl ProxyConfig {
    /// Creates a config from optional per-scheme endpoints, dropping blank values.
    #[must_use]
    pub fn new(http: Option<String>, https: Option<String>) -> Self {
        Self {
            http: non_blank(http),
            https: non_blank(https),
        }
    }

    /// Reads `HTTP_PROXY` / `HTTPS_PROXY` / `ALL_PROXY` (either case).
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            http: find_first_proxy_var(&["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"]),
            https: find_first_proxy_var(&[
                "HTTPS_PROXY",
                "https_proxy",
                "ALL_PROXY",
                "all_proxy",
            ]),
        }
    }

    /// Fills unset schemes from `fallback`.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            http: self.http.or(fallback.http),
            https: self.https.or(fallback.https),
        }
    }

    /// Returns true when no proxy is configured for either scheme.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.http.is_none() && self.https.is_none()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn find_first_proxy_var(names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| non_blank(std::env::var(name).ok()))
}
