//! Shared User-Agent string for search provider traffic.

/// Default User-Agent for search requests.
///
/// Starts with a browser-compatible token; HTML search endpoints reject bare
/// tool identifiers more often.
#[must_use]
pub(crate) fn default_search_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("Mozilla/5.0 (compatible; akakce-search/{version})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_ua_contains_version() {
        let ua = default_search_user_agent();
        assert!(ua.starts_with("Mozilla/5.0"), "UA must be browser-compatible: {ua}");
        assert!(
            ua.contains(&format!("akakce-search/{}", env!("CARGO_PKG_VERSION"))),
            "UA must contain crate version: {ua}"
        );
    }

    #[test]
    fn test_search_ua_carries_no_contact_url() {
        let ua = default_search_user_agent();
        assert!(!ua.contains("+http"), "UA must not advertise a project URL: {ua}");
    }
}
