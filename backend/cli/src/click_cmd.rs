//! `clicktrack click`
//!
//! Runs the real handler and HTTP transport against a page described in YAML.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clicktrack_browser::{ArticleClickHandler, Document, HttpTransport, PageLocation, PageSpec};
use clicktrack_config::ClickTrackConfig;
use reqwest::Url;
use tracing::info;

pub async fn run(config: &ClickTrackConfig, page_path: &Path, index: usize, wait_ms: u64) -> Result<()> {
    let raw = tokio::fs::read_to_string(page_path)
        .await
        .with_context(|| format!("Failed to read page: {}", page_path.display()))?;
    let spec: PageSpec = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse page: {}", page_path.display()))?;

    let document = Document::from_page(&spec);
    let page = Arc::new(match &spec.url {
        Some(url) => PageLocation::at(url.clone()),
        None => PageLocation::new(),
    });
    document.set_default_navigator(page.clone());

    // Relative data-link endpoints resolve against the page unless configured otherwise.
    let mut transport = HttpTransport::from_config(&config.tracking)?;
    if config.tracking.base_url.is_none() {
        if let Some(url) = &spec.url {
            let base = Url::parse(url).with_context(|| format!("Invalid page url: {url}"))?;
            transport = transport.with_base_url(base);
        }
    }

    let handler = Arc::new(ArticleClickHandler::new(config, Arc::new(transport), page.clone()));
    let handles = handler
        .attach_when_ready(&document, std::future::ready(()))
        .await;
    println!("Bound {} tracked link(s)", handles.len());

    let links = document.elements_by_class(&config.selector.class_name);
    let Some(link) = links.get(index) else {
        bail!("No tracked link at index {index} ({} found)", links.len());
    };

    let mut location = page.subscribe();
    let event = link.click()?;
    info!(element = %link.id(), prevented = event.default_prevented(), "Clicked");

    match tokio::time::timeout(Duration::from_millis(wait_ms), location.changed()).await {
        Ok(Ok(())) => {
            let at = location.borrow().clone().unwrap_or_default();
            println!("Navigated to {at} after {}ms", handler.delay().as_millis());
            Ok(())
        }
        Ok(Err(_)) | Err(_) => bail!("No navigation within {wait_ms}ms"),
    }
}
