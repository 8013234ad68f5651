//! Axum HTTP API server for the SoloWorks marketplace.
//!
//! This crate provides:
//! - Cookie-based JWT identity verification
//! - Job and bid endpoints with ownership-scoped queries
//! - An authorization policy toggle isolating the legacy open-mutation gaps

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod policy;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use policy::AuthPolicy;
pub use routes::create_router;
pub use state::AppState;
