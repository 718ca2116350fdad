//! HTTP Tracking Transport
//!
//! Posts tracking requests with reqwest. Relative endpoints (the usual
//! `data-link="/article/click/"`) resolve against the page origin.

use std::time::Duration;

use async_trait::async_trait;
use clicktrack_config::TrackingConfig;
use clicktrack_core::{ClickTrackError, TrackingRequest, Transport, TransportResponse};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use tracing::debug;

pub struct HttpTransport {
    client: Client,
    base_url: Option<Url>,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, ClickTrackError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClickTrackError::Config(format!("http client: {e}")))?;
        Ok(Self {
            client,
            base_url: None,
        })
    }

    pub fn from_config(config: &TrackingConfig) -> Result<Self, ClickTrackError> {
        let transport = Self::new(Duration::from_millis(config.timeout_ms))?;
        match &config.base_url {
            Some(base) => {
                let base = Url::parse(base)
                    .map_err(|e| ClickTrackError::Config(format!("tracking.baseUrl: {e}")))?;
                Ok(transport.with_base_url(base))
            }
            None => Ok(transport),
        }
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn resolve(&self, endpoint: &str) -> Result<Url, ClickTrackError> {
        let url = match &self.base_url {
            Some(base) => base.join(endpoint),
            None => Url::parse(endpoint),
        };
        url.map_err(|e| ClickTrackError::transport(endpoint, e))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn send(&self, request: TrackingRequest) -> Result<TransportResponse, ClickTrackError> {
        let url = self.resolve(&request.endpoint)?;
        debug!(url = %url, "Posting tracking request");

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, &request.content_type)
            .body(request.body)
            .send()
            .await
            .map_err(|e| ClickTrackError::transport(&request.endpoint, e))?;

        Ok(TransportResponse {
            status: response.status().as_u16(),
        })
    }
}
