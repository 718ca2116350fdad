//! Click Event Logger
//!
//! Structured click handler events, emitted on the `click_events` target so
//! the NDJSON file layer can be filtered down to them. Records never carry
//! the clicked item's identifier.

use clicktrack_core::ClickEvent;
use tracing::info;

use crate::redact::redact_url;

pub const CLICK_EVENTS_TARGET: &str = "click_events";

pub struct ClickEventLogger;

impl ClickEventLogger {
    /// Redact `event` and hand it to the tracing system.
    pub fn log_event(event: ClickEvent) {
        let entry = Self::redacted(event);
        let json = serde_json::to_string(&entry).unwrap_or_default();
        info!(
            target: CLICK_EVENTS_TARGET,
            kind = %entry.kind,
            element = ?entry.element,
            event = %json,
            "Click event"
        );
    }

    /// The event as it will be written to the log: URLs lose their query and
    /// fragment, the identifier is dropped.
    pub fn redacted(mut event: ClickEvent) -> ClickEvent {
        event.identifier = None;
        event.destination = event.destination.as_deref().map(redact_url);
        event.endpoint = event.endpoint.as_deref().map(redact_url);
        event
    }
}
