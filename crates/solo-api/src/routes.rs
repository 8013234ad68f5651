//! API routes.

use axum::middleware;
use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::bids::{add_bid, bids_for_user, update_bid_status};
use crate::handlers::jobs::{
    add_job, all_jobs, delete_job, get_job, jobs_by_owner, list_jobs, update_job,
};
use crate::handlers::session::{issue_jwt, logout};
use crate::handlers::{health, ready, root};
use crate::middleware::{cors_layer, request_id, request_logging};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let session_routes = Router::new()
        .route("/jwt", post(issue_jwt))
        .route("/logout", get(logout));

    let job_routes = Router::new()
        .route("/add-job", post(add_job))
        .route("/jobs", get(list_jobs))
        .route("/jobs/:email", get(jobs_by_owner))
        .route("/job/:id", get(get_job))
        .route("/job/:id", delete(delete_job))
        .route("/update-job/:id", put(update_job))
        .route("/all-jobs", get(all_jobs));

    let bid_routes = Router::new()
        .route("/add-bid", post(add_bid))
        .route("/bids/:email", get(bids_for_user))
        .route("/bid-status-update/:id", patch(update_bid_status));

    let health_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/ready", get(ready));

    Router::new()
        .merge(session_routes)
        .merge(job_routes)
        .merge(bid_routes)
        .merge(health_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
