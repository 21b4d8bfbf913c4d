//! Simplified relay payload.

use serde::Serialize;

use crate::feed::notification::FeedItem;

/// Separator between rows (one row per item).
pub const ROW_SEPARATOR: &str = ";;;";

/// Separator between labels of a single item.
pub const TAG_SEPARATOR: &str = ",";

/// Fields kept from one item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RelayEntry {
    pub title: String,
    pub body: String,
    pub tags: String,
}

impl RelayEntry {
    /// Build an entry; `body` replaces the summary when present.
    pub fn from_item(item: &FeedItem, body: Option<String>) -> Self {
        Self {
            title: item.title.clone(),
            body: body.unwrap_or_else(|| item.summary_content().to_string()),
            tags: item.labels().join(TAG_SEPARATOR),
        }
    }
}

/// Body POSTed to every destination.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RelayPayload {
    /// Titles.
    pub value1: String,
    /// Bodies.
    pub value2: String,
    /// Tags.
    pub value3: String,
}

impl RelayPayload {
    pub fn from_entries(entries: &[RelayEntry]) -> Self {
        let mut titles = Vec::with_capacity(entries.len());
        let mut bodies = Vec::with_capacity(entries.len());
        let mut tags = Vec::with_capacity(entries.len());
        for e in entries {
            titles.push(e.title.as_str());
            bodies.push(e.body.as_str());
            tags.push(e.tags.as_str());
        }

        Self {
            value1: titles.join(ROW_SEPARATOR),
            value2: bodies.join(ROW_SEPARATOR),
            value3: tags.join(ROW_SEPARATOR),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
