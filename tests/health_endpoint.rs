// SPDX-License-Identifier: MIT

//! Liveness endpoint tests over an offline store.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

async fn get_json(path: &str) -> (StatusCode, serde_json::Value) {
    let app = ridemaker::routes::create_router(common::offline_state());
    let response = app
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn root_reports_running_but_not_ready() {
    let (status, body) = get_json("/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Discord bot is running!");
    assert_eq!(body["botReady"], false);
    assert_eq!(body["user"], "Not logged in");
    assert!(body["timestamp"].as_str().unwrap().contains('T'));
}

#[tokio::test]
async fn health_path_serves_the_same_payload() {
    let (status, body) = get_json("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["botReady"], false);
}
