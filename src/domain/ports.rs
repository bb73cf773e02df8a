use crate::domain::model::MailAddress;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    pub from: MailAddress,
    pub to: MailAddress,
    pub text: String,
}

/// Confirmation returned by a transport for one delivered envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub recipient: String,
    pub message_id: Option<String>,
    pub accepted: bool,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, envelope: &Envelope) -> Result<Delivery>;
}
