//! SportsData.io client.
//!
//! API docs: https://sportsdata.io/developers/api-documentation/nfl
//! Base URL: https://api.sportsdata.io/v3/nfl
//! Auth: `?key=...` query parameter.
//!
//! All endpoints used here return JSON arrays addressed by a season
//! label ("2025REG") and, for weekly data, a week number. Non-success
//! statuses are mapped to categorized upstream errors; bodies that do
//! not decode are parse errors. Nothing is retried at this layer.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{GameRow, PlayerGameRow, StatsApi, TeamRow};
use crate::types::{SeasonPhase, StatsError};

/// HTTP client for the SportsData.io NFL API.
pub struct SportsDataClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl SportsDataClient {
    pub fn new(base_url: &str, api_key: &str, timeout: std::time::Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("gridiron/0.1.0")
            .build()
            .context("Failed to build HTTP client for SportsData.io")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// GET a provider path and decode the JSON body. The API key is
    /// appended here and never logged.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, StatsError> {
        let url = format!("{}/{}?key={}", self.base_url, path, self.api_key);

        debug!(path, "fetching from provider");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| StatsError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            warn!(path, status = status.as_u16(), "provider returned error status");
            return Err(StatsError::upstream(status.as_u16()));
        }

        resp.json::<T>()
            .await
            .map_err(|e| StatsError::Parse(e.to_string()))
    }
}

#[async_trait]
impl StatsApi for SportsDataClient {
    async fn player_stats_by_week(
        &self,
        season: i32,
        phase: SeasonPhase,
        week: u32,
    ) -> Result<Vec<PlayerGameRow>, StatsError> {
        let path = format!(
            "stats/json/PlayerGameStatsByWeek/{}{}/{}",
            season,
            phase.api_code(),
            week
        );
        self.get_json(&path).await
    }

    async fn teams(&self) -> Result<Vec<TeamRow>, StatsError> {
        self.get_json("scores/json/Teams").await
    }

    async fn schedule(&self, season: i32, phase: SeasonPhase) -> Result<Vec<GameRow>, StatsError> {
        let path = format!("scores/json/Schedules/{}{}", season, phase.api_code());
        self.get_json(&path).await
    }

    async fn scores_by_week(
        &self,
        season: i32,
        phase: SeasonPhase,
        week: u32,
    ) -> Result<Vec<GameRow>, StatsError> {
        let path = format!(
            "scores/json/ScoresByWeek/{}{}/{}",
            season,
            phase.api_code(),
            week
        );
        self.get_json(&path).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
