//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod explore;
pub mod export;
pub mod init;
pub mod status;
pub mod validate;
