//! MongoDB storage layer for the SoloWorks marketplace.
//!
//! This crate provides:
//! - A process-wide [`StoreClient`] owning the database handle
//! - Typed repositories for jobs and bids
//! - The [`JobQuery`] filter/search/sort builder
//! - Index bootstrap for the unique (email, jobId) bid constraint

pub mod bid_repo;
pub mod client;
pub mod error;
pub mod job_repo;
pub mod query;

pub use bid_repo::BidRepository;
pub use client::{StoreClient, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use job_repo::{parse_object_id, JobRepository};
pub use query::{JobQuery, SortDirection};
