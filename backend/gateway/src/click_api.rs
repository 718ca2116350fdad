//! Click recording routes.
//!
//! Identifiers stay out of info-level logs so the server keeps no trail of
//! who clicked what.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::Redirect,
};
use tracing::debug;

use crate::ledger::ArticleStats;
use crate::server::GatewayState;

/// Field name older pages used for the identifier.
pub const LEGACY_BODY_KEY: &str = "code";

/// Handler for `POST <clickPath>`.
///
/// Always `204 No Content`: unknown codes, missing fields, and unparsable
/// bodies look the same as a counted click from the outside.
pub async fn record_click(State(state): State<GatewayState>, body: Bytes) -> StatusCode {
    match form_value(&body, &state.body_key) {
        Some(code) => {
            if state.ledger.record_click(&code).await.is_some() {
                debug!("Click recorded");
            } else {
                debug!("Click for unknown article ignored");
            }
        }
        None => debug!("Click without identifier ignored"),
    }
    StatusCode::NO_CONTENT
}

/// Handler for `GET /article/{code}/`: count the click and send the visitor on.
pub async fn follow_article(
    State(state): State<GatewayState>,
    Path(code): Path<String>,
) -> Result<Redirect, StatusCode> {
    state
        .ledger
        .record_click(&code)
        .await
        .map(|url| Redirect::temporary(&url))
        .ok_or(StatusCode::NOT_FOUND)
}

/// Handler for `GET /api/articles`
pub async fn list_articles(State(state): State<GatewayState>) -> Json<Vec<ArticleStats>> {
    Json(state.ledger.snapshot().await)
}

/// First value for `key` in a URL-encoded body, falling back to the legacy key.
fn form_value(body: &[u8], key: &str) -> Option<String> {
    let pairs: Vec<(String, String)> = url::form_urlencoded::parse(body).into_owned().collect();
    let lookup = |wanted: &str| {
        pairs
            .iter()
            .find(|(k, v)| k == wanted && !v.is_empty())
            .map(|(_, v)| v.clone())
    };
    lookup(key).or_else(|| lookup(LEGACY_BODY_KEY))
}
