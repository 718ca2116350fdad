//! Config defaults and normalization applied after parsing.

use crate::schema::ClickTrackConfig;

pub const DEFAULT_CLASS_NAME: &str = "article-link";
pub const DEFAULT_HREF_ATTRIBUTE: &str = "href";
pub const DEFAULT_ENDPOINT_ATTRIBUTE: &str = "data-link";
pub const DEFAULT_IDENTIFIER_ATTRIBUTE: &str = "data-pk";

pub const DEFAULT_BODY_KEY: &str = "article";
pub const DEFAULT_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const DEFAULT_TRACKING_TIMEOUT_MS: u64 = 5_000;

/// Time between the click and the navigation it replaces.
pub const DEFAULT_NAVIGATION_DELAY_MS: u64 = 100;

pub const DEFAULT_GATEWAY_BIND: &str = "127.0.0.1";
pub const DEFAULT_GATEWAY_PORT: u16 = 8000;
pub const DEFAULT_CLICK_PATH: &str = "/article/click/";

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Apply all normalization to a freshly loaded config.
pub fn apply_all_defaults(config: ClickTrackConfig) -> ClickTrackConfig {
    let config = apply_selector_defaults(config);
    let config = apply_tracking_defaults(config);
    let config = apply_gateway_defaults(config);
    apply_logging_defaults(config)
}

/// Trim attribute names; markup attribute names are case-insensitive.
fn apply_selector_defaults(mut config: ClickTrackConfig) -> ClickTrackConfig {
    let selector = &mut config.selector;
    selector.class_name = selector.class_name.trim().to_string();
    for attr in [
        &mut selector.href_attribute,
        &mut selector.endpoint_attribute,
        &mut selector.identifier_attribute,
    ] {
        *attr = attr.trim().to_ascii_lowercase();
    }
    config
}

fn apply_tracking_defaults(mut config: ClickTrackConfig) -> ClickTrackConfig {
    let tracking = &mut config.tracking;
    tracking.body_key = tracking.body_key.trim().to_string();
    if tracking.content_type.trim().is_empty() {
        tracking.content_type = DEFAULT_CONTENT_TYPE.to_string();
    }
    if tracking.timeout_ms == 0 {
        tracking.timeout_ms = DEFAULT_TRACKING_TIMEOUT_MS;
    }
    if let Some(base) = &tracking.base_url {
        if base.trim().is_empty() {
            tracking.base_url = None;
        }
    }
    config
}

/// Ensure the click path is rooted.
fn apply_gateway_defaults(mut config: ClickTrackConfig) -> ClickTrackConfig {
    let gateway = &mut config.gateway;
    let path = gateway.click_path.trim();
    gateway.click_path = if path.is_empty() {
        DEFAULT_CLICK_PATH.to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    if gateway.bind.trim().is_empty() {
        gateway.bind = DEFAULT_GATEWAY_BIND.to_string();
    }
    config
}

fn apply_logging_defaults(mut config: ClickTrackConfig) -> ClickTrackConfig {
    let logging = &mut config.logging;
    logging.level = logging.level.trim().to_ascii_lowercase();
    if logging.level.is_empty() {
        logging.level = DEFAULT_LOG_LEVEL.to_string();
    }
    if logging.dir.trim().is_empty() {
        logging.dir = DEFAULT_LOG_DIR.to_string();
    }
    config
}
