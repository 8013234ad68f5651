//! Router-level tests for the identity and ownership rejection paths.
//!
//! These build the real router over a lazily-connecting storage handle; the
//! paths under test reject before any storage call, so no MongoDB is needed.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use bson::doc;
use bson::oid::ObjectId;
use solo_api::{create_router, ApiConfig, AppState, AuthPolicy};
use solo_models::{Bid, Buyer, Job};
use solo_store::{BidRepository, JobRepository, StoreClient, StoreConfig};

const SECRET: &str = "test-secret";

fn test_config() -> ApiConfig {
    ApiConfig {
        jwt_secret: SECRET.to_string(),
        ..ApiConfig::default()
    }
}

// The driver connects lazily; nothing here touches a live deployment.
async fn offline_store() -> Arc<StoreClient> {
    let store = StoreClient::connect(&StoreConfig {
        uri: "mongodb://localhost:27017".to_string(),
        database: "solo-test".to_string(),
    })
    .await
    .expect("client construction is offline");
    Arc::new(store)
}

// Policy pinned explicitly so an ambient AUTH_POLICY cannot change what
// these tests assert.
async fn test_app() -> Router {
    create_router(AppState::with_policy(
        test_config(),
        offline_store().await,
        AuthPolicy::Legacy,
    ))
}

async fn strict_app() -> Router {
    create_router(AppState::with_policy(
        test_config(),
        offline_store().await,
        AuthPolicy::Strict,
    ))
}

fn token_cookie(email: &str) -> String {
    let token = solo_api::auth::issue_token(email, SECRET).unwrap();
    format!("token={token}")
}

#[tokio::test]
async fn health_and_root_respond() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn issue_jwt_sets_http_only_cookie() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/jwt")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"email":"a@x.com"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie set")
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn logout_expires_the_cookie() {
    let app = test_app().await;

    let response = app
        .oneshot(Request::builder().uri("/logout").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("replacement cookie set")
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("token=;") || cookie.starts_with("token=\"\""));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn owned_jobs_require_a_token() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/jobs/a@x.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn owned_jobs_reject_mismatched_identity() {
    let app = test_app().await;

    // Structurally valid token for a@x.com requesting b@x.com's jobs.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/jobs/b@x.com")
                .header(header::COOKIE, token_cookie("a@x.com"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bid_listing_rejects_mismatched_identity() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/bids/b@x.com?buyer=true")
                .header(header::COOKIE, token_cookie("a@x.com"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/jobs/a@x.com")
                .header(header::COOKIE, "token=not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn strict_policy_gates_open_mutations() {
    let app = strict_app().await;

    // The claim gate runs before any parse or storage call.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/update-job/64b0c0ffee00112233445566")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"title":"hijacked"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/bid-status-update/64b0c0ffee00112233445566")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"status":"accepted"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn delete_job_requires_a_token() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/job/64b0c0ffee00112233445566")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Strict-policy owner matching (live database)
// ============================================================================

// Isolated database per run; same pattern as the solo-store live tests.
async fn live_store() -> Arc<StoreClient> {
    let mut config = StoreConfig::from_env();
    config.database = format!("solo-test-{}", ObjectId::new().to_hex());
    Arc::new(StoreClient::connect(&config).await.expect("connect"))
}

fn owned_job(title: &str, buyer: &str) -> Job {
    Job {
        id: None,
        title: Some(title.to_string()),
        category: Some("Web Development".to_string()),
        deadline: Some("2026-10-01".to_string()),
        bid_count: 0,
        buyer: Some(Buyer::new(buyer)),
        extra: doc! {},
    }
}

#[tokio::test]
#[ignore = "requires a running MongoDB (set MONGODB_URI)"]
async fn strict_update_job_rejects_non_owner() {
    let store = live_store().await;
    let jobs = JobRepository::new(&store);
    let job_id = jobs.create(&owned_job("Owned", "b@x.com")).await.unwrap();

    let app = create_router(AppState::with_policy(
        test_config(),
        store,
        AuthPolicy::Strict,
    ));

    // Valid token for a@x.com rewriting b@x.com's job: forbidden.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/update-job/{}", job_id.to_hex()))
                .header(header::COOKIE, token_cookie("a@x.com"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"title":"hijacked"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let untouched = jobs.get_by_id(&job_id).await.unwrap().unwrap();
    assert_eq!(untouched.title.as_deref(), Some("Owned"));

    // The owner may still update.
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/update-job/{}", job_id.to_hex()))
                .header(header::COOKIE, token_cookie("b@x.com"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"title":"Renamed"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let renamed = jobs.get_by_id(&job_id).await.unwrap().unwrap();
    assert_eq!(renamed.title.as_deref(), Some("Renamed"));
}

#[tokio::test]
#[ignore = "requires a running MongoDB (set MONGODB_URI)"]
async fn strict_bid_status_update_rejects_non_owner() {
    let store = live_store().await;
    let jobs = JobRepository::new(&store);
    let bids = BidRepository::new(&store);

    let job_id = jobs.create(&owned_job("Bid on", "b@x.com")).await.unwrap();
    let bid_id = bids
        .place(&Bid {
            id: None,
            email: "worker@x.com".to_string(),
            job_id: job_id.to_hex(),
            buyer: Some("b@x.com".to_string()),
            status: "pending".to_string(),
            extra: doc! {"price": 100},
        })
        .await
        .unwrap();

    let app = create_router(AppState::with_policy(
        test_config(),
        store,
        AuthPolicy::Strict,
    ));

    // Someone other than the job's buyer cannot set the status.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/bid-status-update/{}", bid_id.to_hex()))
                .header(header::COOKIE, token_cookie("a@x.com"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"status":"accepted"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The buyer can.
    let response = app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/bid-status-update/{}", bid_id.to_hex()))
                .header(header::COOKIE, token_cookie("b@x.com"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"status":"accepted"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated = bids.get_by_id(&bid_id).await.unwrap().unwrap();
    assert_eq!(updated.status, "accepted");
}
