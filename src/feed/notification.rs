//! Inbound feed-reader notification.

use serde::Deserialize;
use thiserror::Error;

/// Error type for inbound payload parsing.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("malformed notification: {0}")]
    Json(#[from] serde_json::Error),
}

/// Root of an "items" notification.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedNotification {
    #[serde(default)]
    pub items: Vec<FeedItem>,
}

/// One article in a notification.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedItem {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub summary: Option<Summary>,

    /// Stream ids such as `user/1005/label/Tech` or `user/1005/state/com.google/read`.
    #[serde(default)]
    pub categories: Vec<String>,

    #[serde(default)]
    pub canonical: Vec<Link>,

    #[serde(default)]
    pub alternate: Vec<Link>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub href: String,
}

/// Parse a notification body.
pub fn parse_notification(body: &[u8]) -> Result<FeedNotification, FeedError> {
    Ok(serde_json::from_slice(body)?)
}

impl FeedItem {
    /// User label names, taken from categories shaped `.../label/<name>`.
    pub fn labels(&self) -> Vec<&str> {
        self.categories
            .iter()
            .filter_map(|category| {
                let segments: Vec<&str> = category.split('/').collect();
                match segments.as_slice() {
                    [.., "label", name] => Some(*name),
                    _ => None,
                }
            })
            .collect()
    }

    /// Article URL: canonical first, alternate as fallback.
    pub fn link(&self) -> Option<&str> {
        self.canonical
            .iter()
            .chain(self.alternate.iter())
            .map(|l| l.href.as_str())
            .find(|href| !href.is_empty())
    }

    pub fn summary_content(&self) -> &str {
        self.summary.as_ref().map(|s| s.content.as_str()).unwrap_or_default()
    }
}
