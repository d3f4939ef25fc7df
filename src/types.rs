//! Shared types for the GRIDIRON service.
//!
//! These types form the data model used across all modules: the season
//! window addressing scheme, typed per-category stat lines, team and
//! game records, and the error taxonomy returned by every public
//! operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Season window
// ---------------------------------------------------------------------------

/// Phase of the NFL calendar as addressed by the upstream provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeasonPhase {
    Pre,
    Regular,
    Post,
}

impl SeasonPhase {
    /// Provider path segment for this phase ("2025REG", "2025POST", ...).
    pub fn api_code(&self) -> &'static str {
        match self {
            SeasonPhase::Pre => "PRE",
            SeasonPhase::Regular => "REG",
            SeasonPhase::Post => "POST",
        }
    }
}

impl fmt::Display for SeasonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.api_code())
    }
}

/// Which slice of league data is current: season year, phase, and week.
///
/// Produced by the season clock; `week` is 1–18 for the regular season
/// and 1–4 for the postseason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonInfo {
    pub season: i32,
    pub phase: SeasonPhase,
    pub week: u32,
}

impl SeasonInfo {
    /// Provider addressing label, e.g. "2025REG".
    pub fn label(&self) -> String {
        format!("{}{}", self.season, self.phase.api_code())
    }
}

impl fmt::Display for SeasonInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} week {}", self.season, self.phase, self.week)
    }
}

// ---------------------------------------------------------------------------
// Player stats
// ---------------------------------------------------------------------------

/// Passing stat line for a single game or aggregated span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PassingLine {
    pub yards: i32,
    pub touchdowns: u32,
    pub interceptions: u32,
    pub completions: u32,
    pub attempts: u32,
}

impl PassingLine {
    /// Completion percentage, if any passes were attempted.
    pub fn completion_pct(&self) -> Option<f64> {
        if self.attempts == 0 {
            None
        } else {
            Some(self.completions as f64 / self.attempts as f64 * 100.0)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.yards == 0
            && self.touchdowns == 0
            && self.interceptions == 0
            && self.completions == 0
            && self.attempts == 0
    }
}

/// Rushing stat line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RushingLine {
    pub yards: i32,
    pub touchdowns: u32,
}

impl RushingLine {
    pub fn is_empty(&self) -> bool {
        self.yards == 0 && self.touchdowns == 0
    }
}

/// Receiving stat line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceivingLine {
    pub yards: i32,
    pub touchdowns: u32,
    pub receptions: u32,
    pub targets: u32,
}

impl ReceivingLine {
    pub fn is_empty(&self) -> bool {
        self.yards == 0 && self.touchdowns == 0 && self.receptions == 0 && self.targets == 0
    }
}

/// Resolved stats for one player over one game week (or an aggregate).
///
/// A category is `None` when the provider reported no activity in it,
/// matching the upstream convention of omitting empty categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStats {
    pub name: String,
    pub team: String,
    pub position: String,
    pub season: i32,
    /// Week within the season; `None` for multi-week aggregates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passing: Option<PassingLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rushing: Option<RushingLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiving: Option<ReceivingLine>,
}

impl PlayerStats {
    /// Whether any stat category is present.
    pub fn has_any_stats(&self) -> bool {
        self.passing.is_some() || self.rushing.is_some() || self.receiving.is_some()
    }
}

impl fmt::Display for PlayerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.name, self.team, self.position)?;
        if let Some(week) = self.week {
            write!(f, " — {} week {}", self.season, week)?;
        } else {
            write!(f, " — {} season", self.season)?;
        }
        if let Some(p) = &self.passing {
            write!(
                f,
                " | passing: {} yds, {} TD, {} INT",
                p.yards, p.touchdowns, p.interceptions
            )?;
            if let Some(pct) = p.completion_pct() {
                write!(f, ", {pct:.1}% comp")?;
            }
        }
        if let Some(r) = &self.rushing {
            write!(f, " | rushing: {} yds, {} TD", r.yards, r.touchdowns)?;
        }
        if let Some(r) = &self.receiving {
            write!(
                f,
                " | receiving: {} yds, {} TD, {} rec/{} tgt",
                r.yards, r.touchdowns, r.receptions, r.targets
            )?;
        }
        if !self.has_any_stats() {
            write!(f, " | no recorded stats")?;
        }
        Ok(())
    }
}

/// Season totals assembled from a sample of weeks.
///
/// Not an authoritative season sum: only `weeks_sampled` were fetched, and
/// only weeks with a confident match contribute. The `note` discloses this
/// and must be surfaced alongside the numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonTotals {
    pub player: PlayerStats,
    pub games_counted: u32,
    pub weeks_sampled: Vec<u32>,
    pub note: String,
}

impl fmt::Display for SeasonTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.player, self.note)
    }
}

// ---------------------------------------------------------------------------
// Teams, schedules, scores
// ---------------------------------------------------------------------------

/// Franchise record from the provider's teams listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamInfo {
    pub name: String,
    pub city: String,
    pub full_name: String,
    pub abbreviation: String,
    pub conference: String,
    pub division: String,
    pub coach: String,
    pub stadium: String,
}

impl fmt::Display for TeamInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) — {} {} | coach: {} | stadium: {}",
            self.full_name,
            self.abbreviation,
            self.conference,
            self.division,
            self.coach,
            self.stadium
        )
    }
}

/// One scheduled or played game.
///
/// BYE weeks appear in the provider schedule as placeholder games with
/// "BYE" on one side; they are kept so a team's filtered schedule still
/// shows its off week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub season: i32,
    pub phase: SeasonPhase,
    pub week: u32,
    pub home_team: String,
    pub away_team: String,
    pub home_score: i32,
    pub away_score: i32,
    pub kickoff: Option<DateTime<Utc>>,
    pub status: String,
    pub stadium: String,
}

impl Game {
    pub fn is_bye(&self) -> bool {
        self.home_team.eq_ignore_ascii_case("BYE") || self.away_team.eq_ignore_ascii_case("BYE")
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_bye() {
            let team = if self.home_team.eq_ignore_ascii_case("BYE") {
                &self.away_team
            } else {
                &self.home_team
            };
            return write!(f, "Week {}: {} — BYE", self.week, team);
        }
        write!(f, "Week {}: {} @ {}", self.week, self.away_team, self.home_team)?;
        if let Some(t) = self.kickoff {
            write!(f, " ({})", t.format("%Y-%m-%d %H:%M UTC"))?;
        }
        Ok(())
    }
}

/// A team's games for one season, filtered from the full league schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSchedule {
    pub team: String,
    pub season: i32,
    pub games: Vec<Game>,
}

/// Scoreboard entry for one game of the current week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameScore {
    pub game_id: String,
    pub season: i32,
    pub week: u32,
    pub away_team: String,
    pub home_team: String,
    pub away_score: i32,
    pub home_score: i32,
    pub quarter: String,
    pub time_remaining: String,
    pub status: String,
    pub kickoff: Option<DateTime<Utc>>,
}

impl GameScore {
    pub fn is_live(&self) -> bool {
        self.status == "InProgress" || self.status == "InProgress_Live"
    }

    pub fn is_final(&self) -> bool {
        matches!(self.status.as_str(), "Final" | "F" | "Completed")
    }
}

impl fmt::Display for GameScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_live() {
            write!(
                f,
                "{} {} - {} {} ({}, {})",
                self.away_team,
                self.away_score,
                self.home_score,
                self.home_team,
                self.quarter,
                self.time_remaining
            )
        } else if self.is_final() {
            write!(
                f,
                "{} {} - {} {} (Final)",
                self.away_team, self.away_score, self.home_score, self.home_team
            )
        } else {
            write!(f, "{} @ {} (Scheduled)", self.away_team, self.home_team)
        }
    }
}

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Why an upstream request was rejected, derived from the HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamReason {
    InvalidKey,
    Forbidden,
    NotAvailable,
    RateLimited,
    ServerError,
    Unavailable,
    Unknown,
}

impl UpstreamReason {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => UpstreamReason::InvalidKey,
            403 => UpstreamReason::Forbidden,
            404 => UpstreamReason::NotAvailable,
            429 => UpstreamReason::RateLimited,
            500 => UpstreamReason::ServerError,
            502 | 503 | 504 => UpstreamReason::Unavailable,
            _ => UpstreamReason::Unknown,
        }
    }
}

impl fmt::Display for UpstreamReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            UpstreamReason::InvalidKey => "API key is invalid or expired; check the configured key",
            UpstreamReason::Forbidden => {
                "access forbidden; the API plan may not include this data or rate limits were exceeded"
            }
            UpstreamReason::NotAvailable => {
                "data not found; the requested week or season may not be available yet"
            }
            UpstreamReason::RateLimited => {
                "rate limit exceeded; too many requests in a short time, try again later"
            }
            UpstreamReason::ServerError => {
                "provider server error; this is temporary, try again in a few minutes"
            }
            UpstreamReason::Unavailable => {
                "provider is currently unavailable; service may be down for maintenance"
            }
            UpstreamReason::Unknown => "unknown provider error",
        };
        write!(f, "{msg}")
    }
}

/// Errors returned by every public service operation.
///
/// `NotFound` is an expected, recoverable outcome (misspelled or inactive
/// names are common); it is never conflated with upstream failure.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("upstream request failed with status {status}: {reason}")]
    Upstream { status: u16, reason: UpstreamReason },

    #[error("failed to parse upstream response: {0}")]
    Parse(String),

    #[error("upstream request failed: {0}")]
    Transport(String),
}

impl StatsError {
    pub fn upstream(status: u16) -> Self {
        StatsError::Upstream {
            status,
            reason: UpstreamReason::from_status(status),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
