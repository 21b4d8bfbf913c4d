//! Destinations and outbound envelopes.

use axum::http::HeaderMap;
use bytes::Bytes;
use std::fmt;
use std::sync::Arc;

/// A configured downstream endpoint.
///
/// Cheap to clone; the URL string is shared and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Destination(Arc<str>);

impl Destination {
    pub fn new(url: impl AsRef<str>) -> Self {
        Self(Arc::from(url.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Destination {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

impl From<String> for Destination {
    fn from(url: String) -> Self {
        Self(Arc::from(url))
    }
}

/// One self-contained unit of work for a single dispatcher.
///
/// Every envelope owns its own header map and body buffer. Nothing inside
/// is shared with the envelopes built for other destinations.
#[derive(Debug, Clone)]
pub struct OutboundEnvelope {
    destination: Destination,
    headers: HeaderMap,
    body: Bytes,
}

impl OutboundEnvelope {
    /// Build an envelope from borrowed inbound data, copying headers and body.
    pub fn copied_from(destination: Destination, headers: &HeaderMap, body: &[u8]) -> Self {
        Self {
            destination,
            headers: headers.clone(),
            body: Bytes::copy_from_slice(body),
        }
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}
