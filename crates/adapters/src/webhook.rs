//! Webhook publisher: POSTs each item as JSON to a configured endpoint

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rfeed_domain::{Item, PublishError, PublishResult, Publisher};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::time::Duration;

/// Webhook publisher for delivering items over HTTP
pub struct WebhookPublisher {
    client: Client,
    url: String,
    token: Option<SecretString>,
    enabled: bool,
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    digest: String,
    item: &'a Item,
}

impl WebhookPublisher {
    pub fn new(
        url: String,
        token: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, PublishError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PublishError::Api(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url,
            token,
            enabled: true,
        })
    }

    /// Create a disabled publisher (for testing/dry-run)
    pub fn disabled() -> Self {
        Self {
            client: Client::new(),
            url: String::new(),
            token: None,
            enabled: false,
        }
    }
}

#[async_trait]
impl Publisher for WebhookPublisher {
    async fn publish(&self, item: &Item) -> Result<PublishResult, PublishError> {
        if !self.enabled {
            return Err(PublishError::Api("Publisher disabled".to_string()));
        }

        let digest = item.identity_digest().to_hex();
        let payload = WebhookPayload {
            digest: digest.clone(),
            item,
        };

        let mut request = self.client.post(&self.url).json(&payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| PublishError::Api(format!("Failed to reach webhook: {}", e)))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(PublishError::Auth(format!("Webhook returned {}", status)));
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(PublishError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Api(format!(
                "Webhook rejected item ({}): {}",
                status, body
            )));
        }

        Ok(PublishResult {
            id: digest,
            url: None,
        })
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn platform(&self) -> &'static str {
        "webhook"
    }
}
