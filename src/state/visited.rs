/// The visited registry: every URL the crawl has claimed
///
/// Owned by the controller alone. URLs are compared byte-for-byte, so
/// `https://a.com` and `https://a.com/` are distinct entries.
use std::collections::HashSet;

/// Set of claimed URLs. Entries are added at most once and never removed.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    visited: HashSet<String>,
}

impl VisitedRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `url` if nobody has claimed it yet
    ///
    /// Returns `true` and records the URL the first time it is seen. Returns
    /// `false` and leaves the registry untouched for every later call.
    /// Callers must hold `&mut self`, so check-and-insert can never interleave.
    pub fn try_accept(&mut self, url: &str) -> bool {
        if self.visited.contains(url) {
            return false;
        }
        self.visited.insert(url.to_string())
    }

    /// Returns true if `url` has been claimed
    pub fn contains(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Number of claimed URLs
    pub fn len(&self) -> usize {
        self.visited.len()
    }

    /// Returns true if nothing has been claimed yet
    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_claim_wins() {
        let mut registry = VisitedRegistry::new();
        assert!(registry.try_accept("https://example.com/a"));
        assert!(!registry.try_accept("https://example.com/a"));
        assert!(registry.contains("https://example.com/a"));
    }

    #[test]
    fn test_rejection_has_no_side_effects() {
        let mut registry = VisitedRegistry::new();
        registry.try_accept("https://example.com/a");
        let before = registry.len();

        assert!(!registry.try_accept("https://example.com/a"));
        assert_eq!(registry.len(), before);
    }

    #[test]
    fn test_grows_by_one_per_acceptance() {
        let mut registry = VisitedRegistry::new();
        let urls = [
            "https://example.com/a",
            "https://example.com/b",
            "https://example.com/a",
            "https://example.com/c",
            "https://example.com/b",
        ];

        let mut expected = 0;
        for url in urls {
            let before = registry.len();
            if registry.try_accept(url) {
                expected += 1;
                assert_eq!(registry.len(), before + 1);
            } else {
                assert_eq!(registry.len(), before);
            }
        }
        assert_eq!(registry.len(), expected);
        assert_eq!(expected, 3);
    }

    #[test]
    fn test_exact_string_equality() {
        let mut registry = VisitedRegistry::new();
        assert!(registry.try_accept("https://example.com"));
        assert!(registry.try_accept("https://example.com/"));
        assert!(registry.try_accept("HTTPS://example.com/"));
        assert!(registry.try_accept("https://example.com/?a=1&b=2"));
        assert!(registry.try_accept("https://example.com/?b=2&a=1"));
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_empty_registry() {
        let registry = VisitedRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.contains("https://example.com/"));
    }
}
