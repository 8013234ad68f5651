//! Shared data models for the SoloWorks marketplace backend.
//!
//! This crate provides Serde-serializable types for:
//! - Jobs posted by buyers
//! - Bids placed by workers
//! - The buyer identity subdocument embedded in jobs

pub mod bid;
pub mod job;

// Re-export common types
pub use bid::{Bid, BidStatus};
pub use job::{Buyer, Job};
