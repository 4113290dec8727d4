//! Domain identifier types with validation
//!
//! Newtype wrappers for the two identifiers every fixture is keyed by: the
//! season and the team abbreviation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// NBA season key, e.g. `2024-25`
///
/// The second half must be the year after the first, modulo 100.
///
/// # Examples
///
/// ```
/// use courtside::domain::ids::SeasonKey;
/// use std::str::FromStr;
///
/// let season = SeasonKey::from_str("2024-25").unwrap();
/// assert_eq!(season.start_year(), 2024);
/// assert!(SeasonKey::from_str("2024-26").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeasonKey(String);

impl SeasonKey {
    /// Creates a new SeasonKey from a string
    ///
    /// Returns `Err` if the string is not of the form `YYYY-YY` with
    /// consecutive years.
    pub fn new(key: impl Into<String>) -> Result<Self, String> {
        let key = key.into();
        let (start, end) = key
            .split_once('-')
            .ok_or_else(|| format!("Invalid season '{key}'. Expected format: YYYY-YY"))?;

        if start.len() != 4
            || end.len() != 2
            || !start.bytes().all(|b| b.is_ascii_digit())
            || !end.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(format!("Invalid season '{key}'. Expected format: YYYY-YY"));
        }

        let start_year: u32 = start
            .parse()
            .map_err(|_| format!("Invalid season '{key}'"))?;
        let end_year: u32 = end.parse().map_err(|_| format!("Invalid season '{key}'"))?;

        if (start_year + 1) % 100 != end_year {
            return Err(format!(
                "Invalid season '{key}': {end} does not follow {start}"
            ));
        }

        Ok(Self(key))
    }

    /// Returns the season key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The calendar year the season starts in
    pub fn start_year(&self) -> u32 {
        self.0[..4].parse().unwrap_or_default()
    }
}

impl fmt::Display for SeasonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SeasonKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SeasonKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SeasonKey> for String {
    fn from(key: SeasonKey) -> Self {
        key.0
    }
}

impl AsRef<str> for SeasonKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Team abbreviation, e.g. `OKC`
///
/// Two or three uppercase ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TeamAbbr(String);

impl TeamAbbr {
    /// Creates a new TeamAbbr from a string
    pub fn new(abbr: impl Into<String>) -> Result<Self, String> {
        let abbr = abbr.into();
        if !(2..=3).contains(&abbr.len()) || !abbr.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(format!(
                "Invalid team abbreviation '{abbr}'. Expected 2-3 uppercase letters"
            ));
        }
        Ok(Self(abbr))
    }

    /// Returns the abbreviation as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamAbbr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TeamAbbr {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TeamAbbr {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TeamAbbr> for String {
    fn from(abbr: TeamAbbr) -> Self {
        abbr.0
    }
}

impl AsRef<str> for TeamAbbr {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for TeamAbbr {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TeamAbbr {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
