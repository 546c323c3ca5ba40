//! Delivery of messages to the server

use anyhow::Context;
use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use thiserror::Error;

use crate::config::Config;
use crate::sender::OutboundForm;

/// User agent for every request
const USER_AGENT: &str = concat!("pagerelay/", env!("CARGO_PKG_VERSION"));

/// A single delivery attempt failed
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// No response was received
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("server responded {0}")]
    Status(StatusCode),
}

/// Submits one message form, once
///
/// Implementations make exactly one attempt. Retries are the
/// caller's business.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Submit `form`, returning `Ok` on any success status
    async fn submit(&self, form: &OutboundForm) -> Result<(), DeliveryError>;
}

/// HTTP form POST to a PagerMon server
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// Build a transport from the relay configuration
    ///
    /// Every request carries the configured `apikey`.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(&config.apikey)
                .context("configuration \"apikey\" is not a valid header value")?,
        );
        headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout())
            .build()
            .context("unable to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
        })
    }

    /// Submission URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn submit(&self, form: &OutboundForm) -> Result<(), DeliveryError> {
        let response = self.client.post(&self.endpoint).form(form).send().await?;
        let status = response.status();
        debug!("POST {}: {}", self.endpoint, status);

        if status.is_success() {
            Ok(())
        } else {
            Err(DeliveryError::Status(status))
        }
    }
}
