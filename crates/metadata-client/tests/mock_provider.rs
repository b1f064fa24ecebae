//! Tests against an in-process mock of the metadata provider.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use metadata_client::{MetadataClient, MetadataConfig, MetadataError};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

const API_KEY: &str = "test-key";

/// Failures the mock injects before answering normally
#[derive(Default)]
struct MockState {
    requests: AtomicUsize,
    failures_left: AtomicUsize,
    delay: Option<Duration>,
}

async fn omdb(
    State(state): State<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }
    if state
        .failures_left
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
    {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    if params.get("apikey").map(String::as_str) != Some(API_KEY) {
        let body = json!({"Response": "False", "Error": "Invalid API key!"});
        return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
    }

    if params.get("t").map(String::as_str) == Some("Garbled") {
        return (StatusCode::OK, "<html>maintenance</html>").into_response();
    }

    let body = match (params.get("t"), params.get("s")) {
        (Some(t), _) if t == "Inception" => json!({
            "Title": "Inception",
            "Year": "2010",
            "imdbRating": "8.8",
            "Genre": "Action, Adventure, Sci-Fi",
            "Director": "Christopher Nolan",
            "Actors": "Leonardo DiCaprio",
            "Plot": "A thief who steals corporate secrets through dreams.",
            "Poster": "https://img.example/inception.jpg",
            "Response": "True"
        }),
        (Some(t), _) if t == "Primer" => json!({
            "Title": "Primer",
            "Year": "2004",
            "Poster": "N/A",
            "Response": "True"
        }),
        (_, Some(s)) if s == "Inceptoin" => json!({
            "Search": [{"Title": "Inception", "Year": "2010"}],
            "Response": "True"
        }),
        _ => json!({"Response": "False", "Error": "Movie not found!"}),
    };
    Json(body).into_response()
}

async fn start_mock_provider(state: MockState) -> (SocketAddr, Arc<MockState>, JoinHandle<()>) {
    let state = Arc::new(state);
    let app = Router::new().route("/", get(omdb)).with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, state, handle)
}

fn client_for(addr: SocketAddr, key: &str) -> MetadataClient {
    let config = MetadataConfig::new(key)
        .with_base_url(format!("http://{addr}/"))
        .with_timeout(Duration::from_millis(500))
        .with_retries(1);
    MetadataClient::new(config).unwrap()
}

#[tokio::test]
async fn test_fetch_by_exact_title() {
    let (addr, _, handle) = start_mock_provider(MockState::default()).await;
    let client = client_for(addr, API_KEY);

    let meta = client.fetch("Inception").await.unwrap();

    assert_eq!(meta.title.as_deref(), Some("Inception"));
    assert_eq!(meta.rating.as_deref(), Some("8.8"));
    assert_eq!(meta.director.as_deref(), Some("Christopher Nolan"));

    handle.abort();
}

#[tokio::test]
async fn test_search_fallback_recovers_typo() {
    let (addr, state, handle) = start_mock_provider(MockState::default()).await;
    let client = client_for(addr, API_KEY);

    let meta = client.fetch("Inceptoin").await.unwrap();

    assert_eq!(meta.title.as_deref(), Some("Inception"));
    // t=Inceptoin, s=Inceptoin, t=Inception
    assert_eq!(state.requests.load(Ordering::SeqCst), 3);

    handle.abort();
}

#[tokio::test]
async fn test_fallback_disabled() {
    let (addr, _, handle) = start_mock_provider(MockState::default()).await;
    let config = MetadataConfig::new(API_KEY)
        .with_base_url(format!("http://{addr}/"))
        .with_search_fallback(false);
    let client = MetadataClient::new(config).unwrap();

    assert!(matches!(
        client.fetch("Inceptoin").await,
        Err(MetadataError::NotFound { .. })
    ));

    handle.abort();
}

#[tokio::test]
async fn test_unknown_title_yields_placeholder() {
    let (addr, _, handle) = start_mock_provider(MockState::default()).await;
    let client = client_for(addr, API_KEY);

    let err = client.fetch("No Such Movie").await.unwrap_err();
    assert!(matches!(err, MetadataError::NotFound { ref reason, .. } if reason == "Movie not found!"));

    let display = client.fetch_or_placeholder("No Such Movie").await;
    assert!(display.is_placeholder());

    handle.abort();
}

#[tokio::test]
async fn test_missing_fields_are_normalized() {
    let (addr, _, handle) = start_mock_provider(MockState::default()).await;
    let client = client_for(addr, API_KEY);

    let display = client.fetch_or_placeholder("Primer").await;

    assert_eq!(display.title, "Primer");
    assert_eq!(display.plot, "N/A");
    assert_eq!(display.poster, None);

    handle.abort();
}

#[tokio::test]
async fn test_bad_key_is_status_error() {
    let (addr, state, handle) = start_mock_provider(MockState::default()).await;
    let client = client_for(addr, "wrong-key");

    assert!(matches!(
        client.fetch("Inception").await,
        Err(MetadataError::Status { status: 401 })
    ));
    // Client errors are not retried
    assert_eq!(state.requests.load(Ordering::SeqCst), 1);

    handle.abort();
}

#[tokio::test]
async fn test_non_json_body_is_not_retried() {
    let (addr, state, handle) = start_mock_provider(MockState::default()).await;
    let client = client_for(addr, API_KEY);

    let err = client.fetch("Garbled").await.unwrap_err();

    assert!(matches!(err, MetadataError::InvalidResponse(_)), "got {err:?}");
    assert_eq!(state.requests.load(Ordering::SeqCst), 1);
    assert!(client.fetch_or_placeholder("Garbled").await.is_placeholder());

    handle.abort();
}

#[tokio::test]
async fn test_server_error_is_retried() {
    let state = MockState {
        failures_left: AtomicUsize::new(1),
        ..Default::default()
    };
    let (addr, state, handle) = start_mock_provider(state).await;
    let client = client_for(addr, API_KEY);

    let meta = client.fetch("Inception").await.unwrap();

    assert_eq!(meta.year.as_deref(), Some("2010"));
    assert_eq!(state.requests.load(Ordering::SeqCst), 2);

    handle.abort();
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let state = MockState {
        failures_left: AtomicUsize::new(10),
        ..Default::default()
    };
    let (addr, state, handle) = start_mock_provider(state).await;
    let client = client_for(addr, API_KEY);

    assert!(matches!(
        client.fetch("Inception").await,
        Err(MetadataError::Status { status: 503 })
    ));
    assert_eq!(state.requests.load(Ordering::SeqCst), 2);

    handle.abort();
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let state = MockState {
        delay: Some(Duration::from_secs(2)),
        ..Default::default()
    };
    let (addr, _, handle) = start_mock_provider(state).await;
    let config = MetadataConfig::new(API_KEY)
        .with_base_url(format!("http://{addr}/"))
        .with_timeout(Duration::from_millis(100))
        .with_retries(0);
    let client = MetadataClient::new(config).unwrap();

    assert!(matches!(
        client.fetch("Inception").await,
        Err(MetadataError::Timeout(_))
    ));
    assert!(client.fetch_or_placeholder("Inception").await.is_placeholder());

    handle.abort();
}

#[tokio::test]
async fn test_unreachable_provider_degrades() {
    // Bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(addr, API_KEY);
    assert!(client.fetch_or_placeholder("Inception").await.is_placeholder());
}
