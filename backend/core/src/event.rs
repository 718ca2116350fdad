use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{ElementId, LinkAttributes};

/// A structured record of something the click handler did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickEvent {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub kind: ClickEventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<ElementId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Categories of click handler events.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClickEventKind {
    /// A click listener was bound to a link
    ListenerAttached,
    /// A click listener was removed through its handle
    ListenerRemoved,
    /// A link was clicked and default navigation suppressed
    LinkClicked,
    /// The tracking request left and got a response
    TrackingSent,
    /// The tracking request failed and was discarded
    TrackingDropped,
    /// The delayed navigation fired
    Navigated,
}

impl ClickEvent {
    pub fn new(kind: ClickEventKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            kind,
            element: None,
            destination: None,
            endpoint: None,
            identifier: None,
            detail: None,
        }
    }

    pub fn with_element(mut self, element: ElementId) -> Self {
        self.element = Some(element);
        self
    }

    pub fn with_link(mut self, link: &LinkAttributes) -> Self {
        self.destination = link.href.clone();
        self.endpoint = link.endpoint.clone();
        self.identifier = link.identifier.clone();
        self
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl std::fmt::Display for ClickEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(String::from))
            .unwrap_or_else(|| format!("{:?}", self));
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_from_link() {
        let link = LinkAttributes {
            href: Some("/articles/42".into()),
            endpoint: Some("/track".into()),
            identifier: Some("42".into()),
        };
        let event = ClickEvent::new(ClickEventKind::LinkClicked)
            .with_element(ElementId(3))
            .with_link(&link);
        assert_eq!(event.element, Some(ElementId(3)));
        assert_eq!(event.destination.as_deref(), Some("/articles/42"));
        assert_eq!(event.endpoint.as_deref(), Some("/track"));
        assert_eq!(event.identifier.as_deref(), Some("42"));
    }

    #[test]
    fn test_event_serialization_skips_empty_fields() {
        let event = ClickEvent::new(ClickEventKind::Navigated).with_destination("/a");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "navigated");
        assert_eq!(json["destination"], "/a");
        assert!(json.get("endpoint").is_none());
        assert!(json.get("element").is_none());
    }

    #[test]
    fn test_event_kind_display() {
        assert_eq!(ClickEventKind::LinkClicked.to_string(), "link_clicked");
        assert_eq!(ClickEventKind::TrackingDropped.to_string(), "tracking_dropped");
    }
}
