use async_trait::async_trait;

use crate::error::ClickTrackError;
use crate::types::{TrackingRequest, TransportResponse};

/// Delivers tracking requests.
///
/// Delivery is best effort. Callers on the click path spawn `send` and drop
/// whatever it returns: a failed or hanging request is discarded, never
/// retried, and never delays navigation.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Short name used in logs (e.g., "http").
    fn name(&self) -> &str;

    /// Send one request. Non-2xx statuses are not errors.
    async fn send(&self, request: TrackingRequest) -> Result<TransportResponse, ClickTrackError>;
}

/// The page's location, i.e. what `window.location.href = url` assigns to.
pub trait Navigator: Send + Sync {
    /// Replace the current page with `url`.
    fn navigate(&self, url: &str) -> Result<(), ClickTrackError>;

    /// Current location, if the page has one yet.
    fn location(&self) -> Option<String>;
}
