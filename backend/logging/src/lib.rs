//! Structured logging for click tracking.
//!
//! Handles subscriber setup (console + rolling NDJSON), click event records, and URL redaction.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{CLICK_EVENTS_TARGET, ClickEventLogger};
pub use logger::init_logger;
pub use redact::redact_url;
