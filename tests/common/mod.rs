// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use std::sync::Arc;
use workout_tracker::config::Config;
use workout_tracker::db::{KeyValueStore, MemoryStore};
use workout_tracker::models::Coordinates;
use workout_tracker::routes::create_router;
use workout_tracker::AppState;

#[allow(dead_code)]
pub const PARIS: Coordinates = Coordinates {
    lat: 48.85,
    lng: 2.35,
};

/// Create a test app over `store`, started and with a live map at `PARIS`.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app_with(
    store: Box<dyn KeyValueStore + Send>,
) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::default(), store));
    {
        let mut session = state.session.lock().await;
        session.start().expect("session should start");
        session.map_ready(PARIS).expect("map should initialize");
    }
    state.render_queue.drain();

    (create_router(state.clone()), state)
}

/// Create a test app with an empty in-memory store.
#[allow(dead_code)]
pub async fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(Box::new(MemoryStore::new())).await
}

/// Build a JSON POST request.
#[allow(dead_code)]
pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build an empty POST request.
#[allow(dead_code)]
pub fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Build a GET request.
#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Ops of the render commands in a response body.
#[allow(dead_code)]
pub fn ops(body: &serde_json::Value) -> Vec<String> {
    body["commands"]
        .as_array()
        .expect("commands array")
        .iter()
        .map(|c| c["op"].as_str().unwrap().to_string())
        .collect()
}
