use crate::domain::ports::{Delivery, Envelope, MailTransport};
use crate::utils::error::{AlertError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

/// Dry run: every envelope is written to the log and reported as accepted.
#[derive(Debug, Clone, Default)]
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    async fn send(&self, envelope: &Envelope) -> Result<Delivery> {
        let rendered = serde_json::to_string_pretty(envelope)?;
        tracing::info!("Dry run, not sending to {}:\n{}", envelope.to.address, rendered);

        Ok(Delivery {
            recipient: envelope.to.address.clone(),
            message_id: None,
            accepted: true,
        })
    }
}

/// Hands each envelope to an HTTP mail relay as JSON.
#[derive(Debug, Clone)]
pub struct WebhookTransport {
    client: Client,
    endpoint: String,
}

impl WebhookTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl MailTransport for WebhookTransport {
    async fn send(&self, envelope: &Envelope) -> Result<Delivery> {
        let recipient = envelope.to.address.clone();
        tracing::debug!("Posting message for {} to {}", recipient, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(envelope)
            .send()
            .await
            .map_err(|e| AlertError::DeliveryError {
                recipient: recipient.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        tracing::debug!("Mail relay response status: {}", status);

        if !status.is_success() {
            return Err(AlertError::DeliveryError {
                recipient,
                message: format!(
                    "relay responded {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or_default()
                ),
            });
        }

        // The relay may answer with an empty body; only an id is of interest.
        let message_id = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| {
                body.get("message_id")
                    .or_else(|| body.get("id"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            });

        Ok(Delivery {
            recipient,
            message_id,
            accepted: true,
        })
    }
}
