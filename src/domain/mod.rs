//! Domain models and types for courtside.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`SeasonKey`], [`TeamAbbr`])
//! - **Tabular data** ([`Scalar`], [`Record`], [`Table`])
//! - **Output units** ([`Fixture`], [`FixtureBody`], [`FixtureFormat`])
//! - **Playoff brackets** ([`PlayoffBracket`], [`Conference`], [`Series`])
//! - **The static team table** ([`teams`])
//! - **Error types** ([`CourtsideError`], [`StatsApiError`], [`DatabaseError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Identifiers are newtypes validated on construction and on deserialization:
//!
//! ```rust
//! use courtside::domain::{SeasonKey, TeamAbbr};
//!
//! # fn example() -> Result<(), String> {
//! let season = SeasonKey::new("2024-25")?;
//! let team = TeamAbbr::new("OKC")?;
//! assert!(SeasonKey::new("2024-26").is_err());
//! # Ok(())
//! # }
//! ```

pub mod bracket;
pub mod errors;
pub mod fixture;
pub mod ids;
pub mod record;
pub mod result;
pub mod teams;

// Re-export commonly used types for convenience
pub use bracket::{Conference, PlayoffBracket, Series};
pub use errors::{CourtsideError, DatabaseError, RowFailure, StatsApiError};
pub use fixture::{Fixture, FixtureBody, FixtureFormat};
pub use ids::{SeasonKey, TeamAbbr};
pub use record::{Record, Scalar, SkippedRow, Table};
pub use result::Result;
pub use teams::Team;
