//! Config validation with field paths.

use crate::schema::ClickTrackConfig;
use thiserror::Error;

/// Navigation delays above this are almost certainly a unit mistake.
const MAX_SENSIBLE_DELAY_MS: u64 = 1_000;

#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

pub fn validate(config: &ClickTrackConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_selector(config, &mut report);
    validate_tracking(config, &mut report);
    validate_navigation(config, &mut report);
    validate_gateway(config, &mut report);
    report
}

fn validate_selector(config: &ClickTrackConfig, report: &mut ValidationReport) {
    let selector = &config.selector;
    if selector.class_name.is_empty() {
        report.error("selector.className", "Class marker must not be empty");
    } else if selector.class_name.contains(char::is_whitespace) {
        report.error("selector.className", "Class marker must be a single class");
    }
    for (path, name) in [
        ("selector.hrefAttribute", &selector.href_attribute),
        ("selector.endpointAttribute", &selector.endpoint_attribute),
        ("selector.identifierAttribute", &selector.identifier_attribute),
    ] {
        if name.is_empty() {
            report.error(path, "Attribute name must not be empty");
        }
    }
}

fn validate_tracking(config: &ClickTrackConfig, report: &mut ValidationReport) {
    if config.tracking.body_key.is_empty() {
        report.error("tracking.bodyKey", "Form field name must not be empty");
    }
    if let Some(base) = &config.tracking.base_url {
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            report.error("tracking.baseUrl", format!("Not an http(s) URL: {base}"));
        }
    }
}

fn validate_navigation(config: &ClickTrackConfig, report: &mut ValidationReport) {
    let delay = config.navigation.delay_ms;
    if delay == 0 {
        report.warn(
            "navigation.delayMs",
            "Zero delay; tracking requests may not leave before the page unloads",
        );
    } else if delay > MAX_SENSIBLE_DELAY_MS {
        report.warn(
            "navigation.delayMs",
            format!("Delay of {delay}ms will be noticeable to users"),
        );
    }
}

fn validate_gateway(config: &ClickTrackConfig, report: &mut ValidationReport) {
    if config.gateway.port == 0 {
        report.error("gateway.port", "Port must be non-zero");
    }
}
