//! In-memory page source
//!
//! Serves a fixed link graph without touching the network. Unknown URLs
//! yield no links, exactly like a failed fetch. Clones share the recorded
//! fetch history.

use crate::crawler::fetcher::PageSource;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Fixed link graph keyed by URL
#[derive(Debug, Clone, Default)]
pub struct StaticPages {
    pages: Arc<HashMap<String, Vec<String>>>,
    fetched: Arc<Mutex<Vec<String>>>,
}

impl StaticPages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a page whose content yields `links`
    pub fn with_page(mut self, url: &str, links: &[&str]) -> Self {
        let mut pages = (*self.pages).clone();
        pages.insert(
            url.to_string(),
            links.iter().map(|link| link.to_string()).collect(),
        );
        self.pages = Arc::new(pages);
        self
    }

    /// URLs fetched so far, in call order
    pub fn fetched(&self) -> Vec<String> {
        self.fetched
            .lock()
            .map(|fetched| fetched.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PageSource for StaticPages {
    async fn fetch_links(&self, url: &str) -> Vec<String> {
        if let Ok(mut fetched) = self.fetched.lock() {
            fetched.push(url.to_string());
        }
        self.pages.get(url).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_and_unknown_pages() {
        let pages = StaticPages::new().with_page("https://a.com/", &["https://b.com/"]);

        assert_eq!(pages.fetch_links("https://a.com/").await, vec!["https://b.com/"]);
        assert!(pages.fetch_links("https://zzz.com/").await.is_empty());
        assert_eq!(pages.fetched(), vec!["https://a.com/", "https://zzz.com/"]);
    }
}
