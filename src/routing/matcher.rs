//! Path matching against a compiled route table.
//!
//! # Responsibilities
//! - Match a request path against a route prefix at segment boundaries
//! - Select the single best route for a request (longest prefix wins)
//!
//! # Design Decisions
//! - Path matching is case-sensitive and byte-for-byte; percent-encoding,
//!   duplicate slashes, and trailing dots are the caller's problem
//! - A prefix only matches where the path continues with `/` or ends,
//!   so `/api` never claims `/api-docs`
//! - No regex, no allocation, single O(n) scan over the pre-sorted table;
//!   at tens to low hundreds of routes a trie buys nothing

use crate::routing::table::{RouteEntry, RouteTable};

/// True when `path` matches `prefix` at a path-segment boundary.
///
/// A match requires `path` to start with `prefix` and then either end,
/// continue with `/`, or `prefix` to be the root catch-all `/`. The
/// boundary requirement is what keeps `/api` from matching `/api-docs`
/// and `/travel-plan` from matching `/travel-plans`.
pub fn matches_at_boundary(path: &str, prefix: &str) -> bool {
    path.starts_with(prefix)
        && (path.len() == prefix.len() || path.as_bytes()[prefix.len()] == b'/' || prefix == "/")
}

impl RouteTable {
    /// Select the route for `path`, or `None` when nothing matches.
    ///
    /// Entries are pre-sorted most-specific first, so the first boundary
    /// match is the longest matching prefix. With a root entry present
    /// this never returns `None`; without one, `None` means the caller
    /// decides the fallback (typically a 404).
    ///
    /// Read-only and synchronous; any number of requests may match
    /// against the same table concurrently.
    pub fn match_path(&self, path: &str) -> Option<&RouteEntry> {
        self.entries()
            .iter()
            .find(|entry| matches_at_boundary(path, &entry.prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouteConfig;

    fn table(routes: &[(&str, &str)]) -> RouteTable {
        let routes: Vec<RouteConfig> = routes
            .iter()
            .map(|(prefix, backend)| RouteConfig {
                prefix: prefix.to_string(),
                backend: backend.to_string(),
                priority: None,
            })
            .collect();
        RouteTable::from_config(&routes).unwrap()
    }

    fn matched_backend<'t>(table: &'t RouteTable, path: &str) -> Option<&'t str> {
        table.match_path(path).map(|entry| entry.backend_id.as_str())
    }

    #[test]
    fn test_exact_match() {
        assert!(matches_at_boundary("/api", "/api"));
        assert!(matches_at_boundary("/travel-plan", "/travel-plan"));
        assert!(matches_at_boundary("/", "/"));
    }

    #[test]
    fn test_match_at_segment_boundary() {
        assert!(matches_at_boundary("/api/", "/api"));
        assert!(matches_at_boundary("/api/users", "/api"));
        assert!(matches_at_boundary("/api/users/123", "/api"));
        assert!(matches_at_boundary("/uploads/file.txt", "/uploads"));
    }

    #[test]
    fn test_no_match_past_boundary() {
        assert!(!matches_at_boundary("/api-docs", "/api"));
        assert!(!matches_at_boundary("/apiv2", "/api"));
        assert!(!matches_at_boundary("/api_v2", "/api"));
        assert!(!matches_at_boundary("/api.json", "/api"));
        assert!(!matches_at_boundary("/travel-plans", "/travel-plan"));
        assert!(!matches_at_boundary("/travel-planning", "/travel-plan"));
    }

    #[test]
    fn test_no_match_on_shorter_path() {
        assert!(!matches_at_boundary("/ap", "/api"));
        assert!(!matches_at_boundary("/a", "/api"));
    }

    #[test]
    fn test_no_match_on_different_segment() {
        assert!(!matches_at_boundary("/users", "/api"));
        assert!(!matches_at_boundary("/v2/api", "/api"));
    }

    #[test]
    fn test_root_prefix_matches_everything() {
        assert!(matches_at_boundary("/", "/"));
        assert!(matches_at_boundary("/anything", "/"));
        assert!(matches_at_boundary("/foo/bar", "/"));
        assert!(matches_at_boundary("/api", "/"));
    }

    #[test]
    fn test_longest_prefix_wins() {
        let t = table(&[("/a", "b1"), ("/a/b", "b2"), ("/a/b/c", "b3")]);
        assert_eq!(matched_backend(&t, "/a/b/c/d/e"), Some("b3"));
        assert_eq!(matched_backend(&t, "/a/b/x"), Some("b2"));
        assert_eq!(matched_backend(&t, "/a/x"), Some("b1"));
    }

    #[test]
    fn test_exact_match_beats_root() {
        let t = table(&[("/api", "b1"), ("/", "b0")]);
        assert_eq!(matched_backend(&t, "/api"), Some("b1"));
    }

    #[test]
    fn test_similar_prefixes_resolve_independently() {
        let t = table(&[("/api", "b1"), ("/api-docs", "b2"), ("/", "b0")]);
        assert_eq!(matched_backend(&t, "/api/users"), Some("b1"));
        assert_eq!(matched_backend(&t, "/api-docs/intro"), Some("b2"));
        // Neither /api nor /api-docs matches at a boundary; root catches it.
        assert_eq!(matched_backend(&t, "/apiv2"), Some("b0"));
    }

    #[test]
    fn test_unmatched_without_root() {
        let t = table(&[("/travel-plan", "b1")]);
        assert_eq!(matched_backend(&t, "/travel-plans"), None);
        assert_eq!(matched_backend(&t, "/travel-plan/abc123"), Some("b1"));
    }

    #[test]
    fn test_empty_table_never_matches() {
        let t = RouteTable::default();
        assert_eq!(t.match_path("/"), None);
        assert_eq!(t.match_path("/anything"), None);
    }

    #[test]
    fn test_root_only_catches_all() {
        let t = table(&[("/", "b0")]);
        assert_eq!(matched_backend(&t, "/"), Some("b0"));
        assert_eq!(matched_backend(&t, "/anything"), Some("b0"));
        assert_eq!(matched_backend(&t, "/foo/bar"), Some("b0"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let t = table(&[("/api", "b1")]);
        assert_eq!(matched_backend(&t, "/API"), None);
        assert_eq!(matched_backend(&t, "/Api/users"), None);
    }

    #[test]
    fn test_match_is_deterministic() {
        let t = table(&[("/api", "b1"), ("/api/v2", "b2"), ("/", "b0")]);
        let first = matched_backend(&t, "/api/v2/users");
        for _ in 0..100 {
            assert_eq!(matched_backend(&t, "/api/v2/users"), first);
        }
        assert_eq!(first, Some("b2"));
    }
}
