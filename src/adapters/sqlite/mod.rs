//! SQLite database integration
//!
//! The original NBA dataset ships as a single SQLite file; this is the
//! default source for table recipes and `explore`.

pub mod client;

pub use client::SqliteSource;
