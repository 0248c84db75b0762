//! Target-domain filter for candidate links.

/// Link prefixes accepted by default.
pub const AKAKCE_PREFIXES: [&str; 2] = ["http://www.akakce.com", "https://www.akakce.com"];

/// Accepts candidate URLs that begin with one of a fixed set of prefixes.
///
/// Matching is a case-sensitive byte-prefix test with no URL normalization:
/// `https://akakce.com/x` and `HTTPS://www.akakce.com/x` are both rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainFilter {
    prefixes: Vec<String>,
}

impl Default for DomainFilter {
    fn default() -> Self {
        Self::new(AKAKCE_PREFIXES)
    }
}

impl DomainFilter {
    /// Creates a filter accepting any of `prefixes`.
    #[must_use]
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if `url` begins with an accepted prefix.
    #[must_use]
    pub fn accepts(&self, url: &str) -> bool {
        self.prefixes.iter().any(|prefix| url.starts_with(prefix.as_str()))
    }
}
