use crate::utils::error::{AlertError, Result};
use reqwest::Client;
use scraper::Html;

/// A schedule page and the URL it was fetched from.
pub struct FetchedDocument {
    pub url: String,
    pub html: Html,
}

/// One GET, one HTML parse. No retries.
#[derive(Debug, Clone, Default)]
pub struct DocumentFetcher {
    client: Client,
}

impl DocumentFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub async fn fetch(&self, url: &str) -> Result<FetchedDocument> {
        tracing::debug!("Fetching schedule page: {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::error!("Request to {} failed: {}", url, e);
            AlertError::FetchError {
                url: url.to_string(),
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        tracing::debug!("Schedule page response status: {}", status);

        if !status.is_success() {
            let status_line = format!(
                "{}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            );
            tracing::error!("{}", status_line);
            return Err(AlertError::FetchError {
                url: url.to_string(),
                status: Some(status.as_u16()),
                message: status_line,
            });
        }

        let body = response.text().await.map_err(|e| AlertError::ParseError {
            url: url.to_string(),
            message: format!("response body is not readable text: {}", e),
        })?;

        parse_document(url, &body)
    }
}

pub fn parse_document(url: &str, body: &str) -> Result<FetchedDocument> {
    if body.trim().is_empty() {
        return Err(AlertError::ParseError {
            url: url.to_string(),
            message: "response body is empty".to_string(),
        });
    }

    let html = Html::parse_document(body);
    tracing::debug!(
        "Parsed {} bytes from {} ({} recoverable HTML errors)",
        body.len(),
        url,
        html.errors.len()
    );

    Ok(FetchedDocument {
        url: url.to_string(),
        html,
    })
}
