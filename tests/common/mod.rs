//! Shared utilities for integration tests.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Router,
};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// One request seen by a mock destination.
#[derive(Debug, Clone)]
pub struct Received {
    pub headers: HeaderMap,
    pub body: Bytes,
}

#[derive(Clone)]
struct DestinationState {
    status: StatusCode,
    hits: Arc<AtomicU32>,
    tx: mpsc::UnboundedSender<Received>,
}

async fn record(State(state): State<DestinationState>, headers: HeaderMap, body: Bytes) -> StatusCode {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let _ = state.tx.send(Received { headers, body });
    state.status
}

/// A running mock destination.
pub struct MockDestination {
    pub addr: SocketAddr,
    pub hits: Arc<AtomicU32>,
    pub rx: mpsc::UnboundedReceiver<Received>,
}

impl MockDestination {
    pub fn url(&self) -> String {
        format!("http://{}/hook", self.addr)
    }

    /// Next recorded request, failing the test after a few seconds.
    pub async fn next(&mut self) -> Received {
        tokio::time::timeout(Duration::from_secs(5), self.rx.recv())
            .await
            .expect("destination received nothing")
            .expect("destination channel closed")
    }

    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Start a destination that answers every request with `status`.
pub async fn start_destination(status: u16) -> MockDestination {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    serve_destination(listener, status)
}

/// Start a destination on an already-bound listener.
pub fn serve_destination(listener: TcpListener, status: u16) -> MockDestination {
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    let hits = Arc::new(AtomicU32::new(0));

    let state = DestinationState {
        status: StatusCode::from_u16(status).unwrap(),
        hits: hits.clone(),
        tx,
    };
    let app = Router::new().fallback(record).with_state(state);

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockDestination { addr, hits, rx }
}

/// An address nothing is listening on (at the time of the call).
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
