//! Page Location
//!
//! Stands in for `window.location`: assigning a URL replaces the current
//! location and is broadcast to anyone watching.

use std::sync::{Mutex, PoisonError};

use clicktrack_core::{ClickTrackError, Navigator};
use reqwest::Url;
use tokio::sync::watch;
use tracing::info;

pub struct PageLocation {
    current: watch::Sender<Option<String>>,
    history: Mutex<Vec<String>>,
}

impl PageLocation {
    /// A page with no location yet. Relative targets are stored as given.
    pub fn new() -> Self {
        Self::with_location(None)
    }

    /// A page currently showing `url`. Relative targets resolve against it.
    pub fn at(url: impl Into<String>) -> Self {
        Self::with_location(Some(url.into()))
    }

    fn with_location(initial: Option<String>) -> Self {
        let (current, _) = watch::channel(initial);
        Self {
            current,
            history: Mutex::new(Vec::new()),
        }
    }

    /// Receiver that wakes on every navigation after this call.
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.current.subscribe()
    }

    /// Every navigation so far, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn resolve(&self, target: &str) -> String {
        let base = self.current.borrow().clone();
        base.and_then(|base| Url::parse(&base).ok())
            .and_then(|base| base.join(target).ok())
            .map(String::from)
            .unwrap_or_else(|| target.to_string())
    }
}

impl Default for PageLocation {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for PageLocation {
    fn navigate(&self, url: &str) -> Result<(), ClickTrackError> {
        let resolved = self.resolve(url);
        info!(url = %resolved, "Navigating page");
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(resolved.clone());
        self.current.send_replace(Some(resolved));
        Ok(())
    }

    fn location(&self) -> Option<String> {
        self.current.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_history() {
        let page = PageLocation::new();
        assert_eq!(page.location(), None);
        page.navigate("/a").unwrap();
        page.navigate("/b").unwrap();
        assert_eq!(page.location().as_deref(), Some("/b"));
        assert_eq!(page.history(), vec!["/a", "/b"]);
    }

    #[test]
    fn resolves_against_current_location() {
        let page = PageLocation::at("http://news.example/index/");
        page.navigate("/articles/42").unwrap();
        assert_eq!(
            page.location().as_deref(),
            Some("http://news.example/articles/42")
        );
        page.navigate("https://elsewhere.example/x").unwrap();
        assert_eq!(
            page.location().as_deref(),
            Some("https://elsewhere.example/x")
        );
    }

    #[tokio::test]
    async fn subscribers_see_navigation() {
        let page = PageLocation::new();
        let mut rx = page.subscribe();
        page.navigate("/a").unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_deref(), Some("/a"));
    }
}
