// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route authentication tests against the offline test app.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::create_test_app;
use tabwise::middleware::auth::create_jwt;
use tower::ServiceExt; // for oneshot

#[tokio::test]
async fn test_health_is_public() {
    let (app, _state) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_profile_requires_auth() {
    let (app, _state) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/profile")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_bearer_token_rejected() {
    let (app, _state) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/profile")
                .header("Authorization", "Bearer not.a.jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_key_token_rejected() {
    let (app, _state) = create_test_app();

    let token = create_jwt("user-1", b"a_completely_different_key!!!!!!").unwrap();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/profile")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_token_reaches_handler() {
    // Auth passes; the offline mock DB then fails the handler, which is
    // exactly the boundary this test cares about.
    let (app, state) = create_test_app();

    let token = create_jwt("user-1", &state.config.jwt_signing_key).unwrap();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/profile")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_cookie_token_accepted() {
    let (app, state) = create_test_app();

    let token = create_jwt("user-1", &state.config.jwt_signing_key).unwrap();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/profile")
                .header("Cookie", format!("tabwise_token={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Past auth (offline DB error, not 401).
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_suggest_requires_auth() {
    let (app, _state) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/suggest/groups")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
