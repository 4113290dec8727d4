//! PostgreSQL database integration
//!
//! This module provides a read-only PostgreSQL source for table recipes.

pub mod client;

pub use client::PostgresSource;
