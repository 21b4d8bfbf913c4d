//! Full-text enrichment.
//!
//! When enabled, each item's summary is replaced by the article content
//! returned by an external content-extraction API. Failures fall back to the
//! summary; enrichment never fails the inbound request.

pub mod client;

pub use client::{ContentExtractor, ExtractError};

use futures_util::future::join_all;
use std::time::Duration;

use crate::feed::{FeedItem, RelayEntry};

/// Build relay entries for `items`, enriching them concurrently when an extractor is given.
pub async fn build_entries(items: &[FeedItem], extractor: Option<&ContentExtractor>) -> Vec<RelayEntry> {
    let Some(extractor) = extractor else {
        return items.iter().map(|item| RelayEntry::from_item(item, None)).collect();
    };

    join_all(items.iter().map(|item| async move {
        let body = match item.link() {
            Some(link) => match extractor.extract(link).await {
                Ok(content) => Some(content),
                Err(e) => {
                    tracing::warn!(link = %link, error = %e, "Full-text extraction failed, using summary");
                    None
                }
            },
            None => None,
        };
        RelayEntry::from_item(item, body)
    }))
    .await
}

/// Like [`build_entries`], but every item falls back to its summary once `budget` elapses.
pub async fn build_entries_within(
    items: &[FeedItem],
    extractor: Option<&ContentExtractor>,
    budget: Duration,
) -> Vec<RelayEntry> {
    if extractor.is_none() {
        return build_entries(items, None).await;
    }

    match tokio::time::timeout(budget, build_entries(items, extractor)).await {
        Ok(entries) => entries,
        Err(_) => {
            tracing::warn!(budget = ?budget, items = items.len(), "Full-text enrichment timed out, using summaries");
            build_entries(items, None).await
        }
    }
}

/// Enrichment budget for an inbound request bounded by `request_timeout`.
///
/// Leaves a quarter of the request timeout for building the payload and starting fan-out.
pub fn enrichment_budget(request_timeout: Duration) -> Duration {
    request_timeout * 3 / 4
}
