// Integration tests for the WebSocket host router
//
// Note: Tests use tower::ServiceExt::oneshot. Requests to /ws reach the
// WebSocketUpgrade extractor, which rejects them (no upgrade headers and no
// hyper OnUpgrade extension in test requests). The tests verify routing, not
// the WebSocket handshake itself.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::ServiceExt;
use worldsync::host::ClientHub;
use worldsync::server::{create_router, WsAppState};

fn make_router() -> Router {
    let (events, _rx) = mpsc::channel(8);
    create_router(Arc::new(WsAppState {
        hub: Arc::new(ClientHub::new()),
        events,
    }))
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_returns_ok() {
    let resp = make_router().oneshot(get_request("/health")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body(), 1024).await.unwrap();
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn test_ws_route_exists() {
    let resp = make_router().oneshot(get_request("/ws")).await.unwrap();

    // Extractor rejects the plain GET; the route itself is mounted
    assert_ne!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let resp = make_router().oneshot(get_request("/api/ws")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
