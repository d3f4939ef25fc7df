//! Upstream statistics provider boundary.
//!
//! Defines the `StatsApi` trait the service talks to, the raw row
//! types deserialized from the provider's JSON, and the SportsData.io
//! implementation. This is the only layer that classifies transport
//! and status failures into the error taxonomy.

pub mod sportsdata;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::types::{SeasonPhase, StatsError};

pub use sportsdata::SportsDataClient;

// ---------------------------------------------------------------------------
// Raw provider rows
// ---------------------------------------------------------------------------

/// One player's stat row for a single game week, as returned by the
/// provider. Numeric fields arrive as JSON floats.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerGameRow {
    #[serde(default, rename = "PlayerID")]
    pub player_id: f64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub season: f64,
    #[serde(default)]
    pub week: f64,
    #[serde(default)]
    pub passing_yards: f64,
    #[serde(default)]
    pub passing_touchdowns: f64,
    #[serde(default)]
    pub interceptions: f64,
    #[serde(default)]
    pub passing_completions: f64,
    #[serde(default)]
    pub passing_attempts: f64,
    #[serde(default)]
    pub rushing_yards: f64,
    #[serde(default)]
    pub rushing_touchdowns: f64,
    #[serde(default)]
    pub receiving_yards: f64,
    #[serde(default)]
    pub receiving_touchdowns: f64,
    #[serde(default)]
    pub receptions: f64,
    #[serde(default)]
    pub targets: f64,
}

/// One franchise row from the provider's teams listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TeamRow {
    #[serde(default)]
    pub key: String,
    #[serde(default, rename = "TeamID")]
    pub team_id: i64,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub conference: String,
    #[serde(default)]
    pub division: String,
    #[serde(default)]
    pub head_coach: String,
    #[serde(default)]
    pub stadium_name: String,
}

/// One game row, shared by the schedule and scoreboard endpoints.
/// Scores and kickoff are absent for unplayed and BYE entries.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GameRow {
    #[serde(default)]
    pub game_key: String,
    #[serde(default)]
    pub season: i32,
    #[serde(default)]
    pub week: u32,
    #[serde(default)]
    pub away_team: String,
    #[serde(default)]
    pub home_team: String,
    #[serde(default)]
    pub away_score: Option<i32>,
    #[serde(default)]
    pub home_score: Option<i32>,
    #[serde(default)]
    pub quarter: Option<String>,
    #[serde(default)]
    pub time_remaining: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub date_time: Option<String>,
    #[serde(default)]
    pub stadium: Option<String>,
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Abstraction over the upstream statistics provider.
///
/// The service depends on this trait rather than a concrete client so
/// tests can drive it with a deterministic in-memory implementation.
#[async_trait]
pub trait StatsApi: Send + Sync {
    /// All player stat rows for one season/phase/week.
    async fn player_stats_by_week(
        &self,
        season: i32,
        phase: SeasonPhase,
        week: u32,
    ) -> Result<Vec<PlayerGameRow>, StatsError>;

    /// The full franchise listing.
    async fn teams(&self) -> Result<Vec<TeamRow>, StatsError>;

    /// Every game of one season/phase, including BYE placeholders.
    async fn schedule(&self, season: i32, phase: SeasonPhase) -> Result<Vec<GameRow>, StatsError>;

    /// Scoreboard rows for one season/phase/week.
    async fn scores_by_week(
        &self,
        season: i32,
        phase: SeasonPhase,
        week: u32,
    ) -> Result<Vec<GameRow>, StatsError>;
}

// ---------------------------------------------------------------------------
// Datetime handling
// ---------------------------------------------------------------------------

/// Kickoff timestamps arrive in several formats depending on endpoint
/// and game state. Naive timestamps are taken as UTC.
pub fn parse_kickoff(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%SZ"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
