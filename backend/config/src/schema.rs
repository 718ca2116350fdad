//! Click tracking configuration schema.
//!
//! Typed for serde YAML/JSON. Every section falls back to its defaults, so an
//! empty file (or no file) yields the stock `article-link` behavior.

use serde::{Deserialize, Serialize};

use crate::defaults::*;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClickTrackConfig {
    /// Which elements get intercepted and which attributes are read
    pub selector: SelectorConfig,

    /// Shape of the outbound tracking request
    pub tracking: TrackingConfig,

    /// Delayed navigation
    pub navigation: NavigationConfig,

    /// Click-recording HTTP server
    pub gateway: GatewayConfig,

    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectorConfig {
    /// Class marker on intercepted links
    pub class_name: String,
    /// Attribute holding the navigation target
    pub href_attribute: String,
    /// Attribute holding the tracking endpoint
    pub endpoint_attribute: String,
    /// Attribute holding the opaque identifier
    pub identifier_attribute: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            class_name: DEFAULT_CLASS_NAME.to_string(),
            href_attribute: DEFAULT_HREF_ATTRIBUTE.to_string(),
            endpoint_attribute: DEFAULT_ENDPOINT_ATTRIBUTE.to_string(),
            identifier_attribute: DEFAULT_IDENTIFIER_ATTRIBUTE.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tracking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackingConfig {
    /// Form field name carrying the identifier
    pub body_key: String,
    pub content_type: String,
    /// HTTP client timeout. Never delays navigation.
    pub timeout_ms: u64,
    /// Origin that relative endpoints resolve against (e.g. "http://localhost:8000")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            body_key: DEFAULT_BODY_KEY.to_string(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            timeout_ms: DEFAULT_TRACKING_TIMEOUT_MS,
            base_url: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationConfig {
    pub delay_ms: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_NAVIGATION_DELAY_MS,
        }
    }
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayConfig {
    pub bind: String,
    pub port: u16,
    /// Route receiving tracking POSTs
    pub click_path: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_GATEWAY_BIND.to_string(),
            port: DEFAULT_GATEWAY_PORT,
            click_path: DEFAULT_CLICK_PATH.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for the rolling NDJSON log
    pub dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            dir: DEFAULT_LOG_DIR.to_string(),
        }
    }
}
