//! Inbound request handlers.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode},
};

use crate::feed::{parse_notification, RelayPayload};
use crate::fulltext::build_entries_within;
use crate::http::server::AppState;
use crate::observability::metrics;

/// Receive a notification, transform it and start relaying.
///
/// Responds as soon as fan-out has started; delivery outcomes are never
/// reflected in the response.
pub async fn handle_hook(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if method != Method::POST {
        tracing::debug!(method = %method, "Rejected non-POST hook");
        metrics::record_inbound("rejected");
        return StatusCode::BAD_REQUEST;
    }

    let notification = match parse_notification(&body) {
        Ok(n) => n,
        Err(e) => {
            tracing::warn!(error = %e, bytes = body.len(), "Rejected hook payload");
            metrics::record_inbound("rejected");
            return StatusCode::BAD_REQUEST;
        }
    };

    let entries = build_entries_within(
        &notification.items,
        state.extractor.as_deref(),
        state.enrichment_budget,
    )
    .await;
    let payload = match RelayPayload::from_entries(&entries).to_bytes() {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize relay payload");
            metrics::record_inbound("rejected");
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    };

    let started = state.fanout.relay(&headers, &payload);
    metrics::record_inbound("relayed");
    tracing::info!(items = entries.len(), destinations = started, "Hook accepted");

    StatusCode::OK
}

pub async fn health_check() -> StatusCode {
    StatusCode::OK
}
