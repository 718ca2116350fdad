//! Click Ledger
//!
//! In-memory article registry with per-article view counters.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

/// One article as listed in a seed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSeed {
    pub code: String,
    pub url: String,
}

/// Public view of an article's counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleStats {
    pub code: String,
    pub url: String,
    pub views: u64,
}

struct ArticleEntry {
    url: String,
    views: u64,
}

#[derive(Clone, Default)]
pub struct ClickLedger {
    articles: Arc<RwLock<HashMap<String, ArticleEntry>>>,
}

impl ClickLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `code`. Re-registering points the code at the newer URL and
    /// keeps its count.
    pub async fn register(&self, code: impl Into<String>, url: impl Into<String>) {
        let url = url.into();
        let mut articles = self.articles.write().await;
        articles
            .entry(code.into())
            .and_modify(|entry| entry.url = url.clone())
            .or_insert(ArticleEntry { url, views: 0 });
    }

    /// Register every article in a YAML list of `{code, url}`.
    pub async fn load_seed(&self, path: &Path) -> Result<usize> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read article seed: {}", path.display()))?;
        let seeds: Vec<ArticleSeed> = serde_yaml::from_str(&raw)
            .with_context(|| format!("Failed to parse article seed: {}", path.display()))?;

        let count = seeds.len();
        for seed in seeds {
            self.register(seed.code, seed.url).await;
        }
        info!(path = %path.display(), count, "Loaded article seed");
        Ok(count)
    }

    /// Count one click on `code`. Returns the article URL, or `None` for an
    /// unknown code (nothing is recorded).
    pub async fn record_click(&self, code: &str) -> Option<String> {
        let mut articles = self.articles.write().await;
        let entry = articles.get_mut(code)?;
        entry.views += 1;
        Some(entry.url.clone())
    }

    pub async fn views(&self, code: &str) -> Option<u64> {
        self.articles.read().await.get(code).map(|entry| entry.views)
    }

    /// All articles, most viewed first.
    pub async fn snapshot(&self) -> Vec<ArticleStats> {
        let articles = self.articles.read().await;
        let mut stats: Vec<ArticleStats> = articles
            .iter()
            .map(|(code, entry)| ArticleStats {
                code: code.clone(),
                url: entry.url.clone(),
                views: entry.views,
            })
            .collect();
        stats.sort_by(|a, b| b.views.cmp(&a.views).then_with(|| a.code.cmp(&b.code)));
        stats
    }
}
