//! Stats API client
//!
//! A thin reqwest wrapper: one GET per call, paced by the configured
//! [`RateLimiter`], decoded into a [`Table`]. Failed calls are not repeated.

use super::models::StatsResponse;
use super::rate_limit::RateLimiter;
use crate::config::StatsApiConfig;
use crate::domain::{CourtsideError, Result, StatsApiError, Table};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, REFERER, USER_AGENT};
use reqwest::Client;
use std::time::Duration;

/// Client for `stats.nba.com`-style endpoints
///
/// # Example
///
/// ```no_run
/// use courtside::adapters::stats_api::StatsApiClient;
/// use courtside::config::StatsApiConfig;
///
/// # async fn example() -> courtside::domain::Result<()> {
/// let client = StatsApiClient::new(&StatsApiConfig::default())?;
/// let standings = client
///     .fetch(
///         "leaguestandingsv3",
///         &[("LeagueID", "00"), ("Season", "2024-25"), ("SeasonType", "Regular Season")],
///         0,
///     )
///     .await?;
/// println!("{} teams", standings.len());
/// # Ok(())
/// # }
/// ```
pub struct StatsApiClient {
    base_url: String,
    client: Client,
    limiter: RateLimiter,
}

impl StatsApiClient {
    /// Build a client from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a header is not valid HTTP or the
    /// HTTP client cannot be built.
    pub fn new(config: &StatsApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(30)))
            .default_headers(default_headers(config)?)
            .build()
            .map_err(|e| CourtsideError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            limiter: RateLimiter::new(&config.rate_limit),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Call `endpoint` and return result set `result_set` as a table
    ///
    /// # Errors
    ///
    /// Returns a `StatsApiError` for transport failures, non-success status
    /// codes, and bodies that are not result sets.
    pub async fn fetch<K, V>(&self, endpoint: &str, params: &[(K, V)], result_set: usize) -> Result<Table>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.limiter.acquire().await;

        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        let query: Vec<(&str, &str)> = params.iter().map(|(k, v)| (k.as_ref(), v.as_ref())).collect();

        tracing::debug!(endpoint = %endpoint, params = ?query, "Calling stats API");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| transport_error(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = format!("{endpoint}: {}", truncate(&body, 200));
            let err = if status.is_server_error() {
                StatsApiError::ServerError {
                    status: status.as_u16(),
                    message,
                }
            } else {
                StatsApiError::ClientError {
                    status: status.as_u16(),
                    message,
                }
            };
            return Err(err.into());
        }

        let body: StatsResponse = response
            .json()
            .await
            .map_err(|e| StatsApiError::InvalidResponse(format!("{endpoint}: {e}")))?;

        let table = body.into_table(endpoint, result_set)?;
        tracing::debug!(endpoint = %endpoint, rows = table.len(), "Stats API call returned");
        Ok(table)
    }
}

fn default_headers(config: &StatsApiConfig) -> Result<HeaderMap> {
    let invalid = |name: &str, e: &dyn std::fmt::Display| {
        CourtsideError::Configuration(format!("Invalid stats_api header '{name}': {e}"))
    };

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&config.user_agent).map_err(|e| invalid("user_agent", &e))?,
    );
    headers.insert(
        REFERER,
        HeaderValue::from_str(&config.referer).map_err(|e| invalid("referer", &e))?,
    );
    headers.insert("x-nba-stats-origin", HeaderValue::from_static("stats"));
    headers.insert("x-nba-stats-token", HeaderValue::from_static("true"));

    for (name, value) in &config.headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(name, &e))?;
        let header_value = HeaderValue::from_str(value).map_err(|e| invalid(name, &e))?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}

pub(crate) fn transport_error(target: &str, e: reqwest::Error) -> StatsApiError {
    if e.is_timeout() {
        StatsApiError::Timeout(format!("{target}: {e}"))
    } else {
        StatsApiError::ConnectionFailed(format!("{target}: {e}"))
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
