//! Static asset downloads
//!
//! Logos are fetched verbatim; the bytes are never decoded or re-encoded.

use crate::adapters::stats_api::client::transport_error;
use crate::config::StatsApiConfig;
use crate::domain::teams::Team;
use crate::domain::{CourtsideError, Result, StatsApiError};
use reqwest::Client;
use std::time::Duration;

/// Fetches asset bytes over HTTP
pub struct AssetClient {
    client: Client,
}

impl AssetClient {
    /// Build an asset client sharing the stats API timeout and user agent
    pub fn new(config: &StatsApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| CourtsideError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Download `url` and return the body unchanged
    ///
    /// # Errors
    ///
    /// Returns a `StatsApiError` on transport failure or non-success status.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            let err = if status.is_server_error() {
                StatsApiError::ServerError {
                    status: status.as_u16(),
                    message: url.to_string(),
                }
            } else {
                StatsApiError::ClientError {
                    status: status.as_u16(),
                    message: url.to_string(),
                }
            };
            return Err(err.into());
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(url, e))?;
        Ok(bytes.to_vec())
    }
}

/// Expand a logo URL template for one team
///
/// Supports `{team_id}` and `{abbr}`.
pub fn logo_url(template: &str, team: &Team) -> String {
    template
        .replace("{team_id}", &team.id.to_string())
        .replace("{abbr}", team.abbr)
}

/// File name a logo is stored under
pub fn logo_file_name(team: &Team) -> String {
    format!("{}_logo.svg", team.abbr)
}
