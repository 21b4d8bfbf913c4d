//! Content-extraction API client.

use axum::http::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::FullTextConfig;

/// Error type for content extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("extraction request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("extraction API returned {0}")]
    Status(StatusCode),

    #[error("extraction API returned no content")]
    EmptyContent,
}

#[derive(Debug, Deserialize)]
struct ParsedArticle {
    #[serde(default)]
    content: Option<String>,
}

/// Fetches readable article content for a URL.
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl ContentExtractor {
    pub fn new(config: &FullTextConfig) -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Full HTML content of `article_url`.
    pub async fn extract(&self, article_url: &str) -> Result<String, ExtractError> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[("url", article_url)])
            .header("x-api-key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::Status(status));
        }

        let article: ParsedArticle = response.json().await?;
        match article.content {
            Some(content) if !content.trim().is_empty() => Ok(content),
            _ => Err(ExtractError::EmptyContent),
        }
    }
}
