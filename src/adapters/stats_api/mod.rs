//! Stats API integration
//!
//! This module provides the HTTP client for the stats API, the result-set
//! response models, and the pacing policy applied between calls.

pub mod client;
pub mod models;
pub mod rate_limit;

pub use client::StatsApiClient;
pub use models::{ResultSet, StatsResponse};
pub use rate_limit::RateLimiter;
