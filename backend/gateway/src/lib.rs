//! Click-recording HTTP gateway.
//!
//! Receives the tracking POSTs the click handler sends, counts them per
//! article, and serves the counted redirect route.

pub mod click_api;
pub mod ledger;
pub mod server;

pub use ledger::{ArticleSeed, ArticleStats, ClickLedger};
pub use server::{GatewayState, build_router, serve, start_server};
