//! Output writing
//!
//! This module provides the atomic file writer used for every fixture and
//! asset, and the checksums reported by `status` and the run summary.

pub mod checksum;
pub mod writer;

pub use checksum::checksum_bytes;
pub use writer::{FixtureWriter, WriteOutcome, WriteStatus};
