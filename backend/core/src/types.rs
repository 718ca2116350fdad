use std::fmt;

use serde::{Deserialize, Serialize};

/// Content type sent with every tracking request.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Form field that carries the link identifier.
pub const ARTICLE_BODY_KEY: &str = "article";

/// Opaque handle for an element inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The attributes the click handler reads off a link element.
///
/// Each field is `None` when the markup does not carry the attribute. Nothing
/// here is validated; a missing endpoint or identifier degrades into an empty
/// value in the tracking request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkAttributes {
    /// Navigation target (`href`).
    pub href: Option<String>,
    /// Tracking endpoint (`data-link`).
    pub endpoint: Option<String>,
    /// Opaque identifier forwarded to the endpoint (`data-pk`).
    pub identifier: Option<String>,
}

impl LinkAttributes {
    /// Build the tracking request for this link.
    pub fn tracking_request(&self, body_key: &str, content_type: &str) -> TrackingRequest {
        TrackingRequest::form(
            self.endpoint.clone().unwrap_or_default(),
            body_key,
            self.identifier.as_deref().unwrap_or_default(),
            content_type,
        )
    }
}

/// An outbound, fire-and-forget POST recording a link click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingRequest {
    pub endpoint: String,
    pub content_type: String,
    pub body: String,
}

impl TrackingRequest {
    /// `POST endpoint` with body `article=<identifier>`.
    pub fn article(endpoint: impl Into<String>, identifier: &str) -> Self {
        Self::form(endpoint, ARTICLE_BODY_KEY, identifier, FORM_CONTENT_TYPE)
    }

    /// `POST endpoint` with a single URL-encoded form field.
    pub fn form(
        endpoint: impl Into<String>,
        key: &str,
        value: &str,
        content_type: &str,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            content_type: content_type.to_string(),
            body: format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            ),
        }
    }
}

/// What the transport saw come back. The click path never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportResponse {
    pub status: u16,
}
