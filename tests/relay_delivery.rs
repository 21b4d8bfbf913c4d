//! Delivery tests against real sockets.

use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use forwardhook::relay::{
    AttemptOutcome, DispatchState, Dispatcher, FanOut, HttpTransport, OutboundEnvelope,
    RetryPolicy, Transport,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

mod common;

const PAYLOAD: &[u8] = br#"{"value1":"T1","value2":"B1","value3":"tag1"}"#;

fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy { max_attempts, backoff_interval: Duration::from_millis(100) }
}

fn inbound_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    headers.insert(header::HOST, HeaderValue::from_static("relay.local:8000"));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("9999"));
    headers.insert("x-inoreader-user-id", HeaderValue::from_static("1005"));
    headers
}

#[tokio::test]
async fn test_attempt_forwards_body_and_headers() {
    let mut dest = common::start_destination(200).await;
    let envelope = OutboundEnvelope::copied_from(dest.url().into(), &inbound_headers(), PAYLOAD);

    let outcome = HttpTransport::default().deliver(&envelope).await;
    assert_eq!(outcome, AttemptOutcome::Success { status: StatusCode::OK });

    let received = dest.next().await;
    assert_eq!(received.body.as_ref(), PAYLOAD);
    assert_eq!(received.headers.get(header::CONTENT_TYPE).unwrap(), "application/json");
    assert_eq!(received.headers.get_all(header::CONTENT_TYPE).iter().count(), 1);
    assert_eq!(received.headers.get("x-inoreader-user-id").unwrap(), "1005");
    assert_eq!(
        received.headers.get(header::CONTENT_LENGTH).unwrap(),
        PAYLOAD.len().to_string().as_str()
    );
    assert_eq!(
        received.headers.get(header::HOST).unwrap(),
        dest.addr.to_string().as_str()
    );
}

#[tokio::test]
async fn test_attempt_without_listener_is_transient() {
    let addr = common::unused_addr().await;
    let envelope = OutboundEnvelope::copied_from(
        format!("http://{}/hook", addr).into(),
        &HeaderMap::new(),
        PAYLOAD,
    );

    let outcome = HttpTransport::new(Some(Duration::from_secs(2))).deliver(&envelope).await;
    assert!(matches!(outcome, AttemptOutcome::TransientFailure { .. }));
}

#[tokio::test]
async fn test_malformed_destination_is_transient() {
    let envelope = OutboundEnvelope::copied_from("not a url".into(), &HeaderMap::new(), PAYLOAD);
    let outcome = HttpTransport::default().deliver(&envelope).await;
    assert!(matches!(outcome, AttemptOutcome::TransientFailure { .. }));
}

#[tokio::test]
async fn test_stalled_response_body_does_not_hold_attempt() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = stream.read(&mut buf).await;
        // Promise a body, send a fragment of it, then go silent.
        let _ = stream
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\npartial")
            .await;
        tokio::time::sleep(Duration::from_secs(60)).await;
        drop(stream);
    });

    let envelope = OutboundEnvelope::copied_from(
        format!("http://{}/hook", addr).into(),
        &HeaderMap::new(),
        PAYLOAD,
    );

    let outcome = tokio::time::timeout(Duration::from_secs(10), HttpTransport::default().deliver(&envelope))
        .await
        .expect("attempt stuck draining the response");
    assert_eq!(outcome, AttemptOutcome::Success { status: StatusCode::OK });
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let dest = common::start_destination(500).await;
    let dispatcher = Dispatcher::new(Arc::new(HttpTransport::default()), fast_policy(10));
    let envelope = OutboundEnvelope::copied_from(dest.url().into(), &HeaderMap::new(), PAYLOAD);

    let report = dispatcher.run(envelope).await;

    assert_eq!(report.attempts, 1);
    assert_eq!(report.state, DispatchState::Succeeded { status: StatusCode::INTERNAL_SERVER_ERROR });
    assert_eq!(dest.hits(), 1);
}

#[tokio::test]
async fn test_not_found_is_success() {
    let dest = common::start_destination(404).await;
    let dispatcher = Dispatcher::new(Arc::new(HttpTransport::default()), fast_policy(10));
    let envelope = OutboundEnvelope::copied_from(dest.url().into(), &HeaderMap::new(), PAYLOAD);

    let report = dispatcher.run(envelope).await;

    assert_eq!(report.attempts, 1);
    assert_eq!(report.state, DispatchState::Succeeded { status: StatusCode::NOT_FOUND });
}

#[tokio::test]
async fn test_unreachable_destination_exhausts() {
    let addr = common::unused_addr().await;
    let dispatcher = Dispatcher::new(Arc::new(HttpTransport::new(Some(Duration::from_secs(2)))), fast_policy(3));
    let envelope = OutboundEnvelope::copied_from(
        format!("http://{}/hook", addr).into(),
        &HeaderMap::new(),
        PAYLOAD,
    );

    let report = dispatcher.run(envelope).await;

    assert_eq!(report.attempts, 3);
    assert!(matches!(report.state, DispatchState::Exhausted { .. }));
}

#[tokio::test]
async fn test_destination_recovers_between_attempts() {
    let addr = common::unused_addr().await;
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::new(HttpTransport::new(Some(Duration::from_secs(2)))),
        RetryPolicy { max_attempts: 10, backoff_interval: Duration::from_millis(300) },
    ));
    let envelope = OutboundEnvelope::copied_from(
        format!("http://{}/hook", addr).into(),
        &HeaderMap::new(),
        PAYLOAD,
    );

    let run = tokio::spawn({
        let dispatcher = dispatcher.clone();
        async move { dispatcher.run(envelope).await }
    });

    // First attempt hits a closed port; bring the destination up before the retry.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let listener = TcpListener::bind(addr).await.unwrap();
    let mut dest = common::serve_destination(listener, 202);

    let report = run.await.unwrap();
    assert!(report.attempts >= 2);
    assert_eq!(report.state, DispatchState::Succeeded { status: StatusCode::ACCEPTED });
    assert_eq!(dest.next().await.body.as_ref(), PAYLOAD);
}

#[tokio::test]
async fn test_fanout_reaches_every_destination() {
    let mut a = common::start_destination(200).await;
    let mut b = common::start_destination(200).await;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let fanout = FanOut::new(
        vec![a.url().into(), b.url().into()],
        Dispatcher::new(Arc::new(HttpTransport::default()), fast_policy(10)),
    )
    .with_reports(tx);

    assert_eq!(fanout.relay(&inbound_headers(), PAYLOAD), 2);

    for dest in [&mut a, &mut b] {
        let received = dest.next().await;
        assert_eq!(received.body.as_ref(), PAYLOAD);
        assert_eq!(received.headers.get(header::CONTENT_TYPE).unwrap(), "application/json");
    }

    for _ in 0..2 {
        let report = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
        assert_eq!(report.attempts, 1);
        assert_eq!(report.state, DispatchState::Succeeded { status: StatusCode::OK });
    }
}

#[tokio::test]
async fn test_one_dead_destination_does_not_block_others() {
    let dead = common::unused_addr().await;
    let mut alive = common::start_destination(200).await;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let fanout = FanOut::new(
        vec![format!("http://{}/hook", dead).into(), alive.url().into()],
        Dispatcher::new(
            Arc::new(HttpTransport::new(Some(Duration::from_secs(2)))),
            RetryPolicy { max_attempts: 10, backoff_interval: Duration::from_secs(10) },
        ),
    )
    .with_reports(tx);

    fanout.relay(&HeaderMap::new(), PAYLOAD);

    // The live destination completes while the dead one is still backing off.
    assert_eq!(alive.next().await.body.as_ref(), PAYLOAD);
    let report = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
    assert_eq!(report.destination.as_str(), alive.url());
    assert_eq!(report.attempts, 1);
}
