//! Stats lookup service.
//!
//! The only component that talks to the upstream provider. Composes
//! the season clock (which week to ask for), the TTL caches (which
//! fetches to skip), and the fuzzy resolver (which record in a fetched
//! batch the user meant). Season totals are approximated by sampling a
//! fixed set of weeks, since the provider has no season-totals
//! endpoint; the result discloses the sample size.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::cache::{Janitor, Sweepable, TtlCache};
use crate::matching::{self, resolve};
use crate::provider::{parse_kickoff, GameRow, PlayerGameRow, StatsApi, TeamRow};
use crate::season;
use crate::types::{
    Game, GameScore, PassingLine, PlayerStats, ReceivingLine, RushingLine, SeasonInfo,
    SeasonPhase, SeasonTotals, StatsError, TeamInfo, TeamSchedule,
};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Weeks fetched for season aggregation. A fixed sample bounds upstream
/// calls at six instead of eighteen per aggregation.
const SAMPLED_WEEKS: [u32; 6] = [1, 2, 5, 10, 15, 18];

/// Seasons the provider is known to serve for historical week lookups.
const MIN_SEASON: i32 = 2020;
const MAX_SEASON: i32 = 2025;

/// How long a computed season window is reused before recomputing.
const SEASON_INFO_MAX_AGE: Duration = Duration::from_secs(3600);

/// Cache key for the franchise listing, which is query-independent.
const TEAMS_CACHE_KEY: &str = "teams";

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Front door for all stat lookups.
///
/// Safe to share across tasks: all methods take `&self`, and the
/// caches are the only mutable state. The background janitor is tied
/// to this value's lifetime and stops when it drops.
pub struct StatsService {
    api: Arc<dyn StatsApi>,
    week_stats: Arc<TtlCache<PlayerStats>>,
    season_totals: Arc<TtlCache<SeasonTotals>>,
    teams: Arc<TtlCache<Vec<TeamRow>>>,
    schedules: Arc<TtlCache<Vec<GameRow>>>,
    scores: Arc<TtlCache<Vec<GameScore>>>,
    season: Mutex<Option<(SeasonInfo, Instant)>>,
    _janitor: Janitor,
}

impl StatsService {
    /// Build the service around a provider client. Must be called from
    /// within a tokio runtime, since the janitor task starts here.
    pub fn new(api: Arc<dyn StatsApi>, cache_ttl: Duration, sweep_period: Duration) -> Self {
        let week_stats = Arc::new(TtlCache::new(cache_ttl));
        let season_totals = Arc::new(TtlCache::new(cache_ttl));
        let teams = Arc::new(TtlCache::new(cache_ttl));
        let schedules = Arc::new(TtlCache::new(cache_ttl));
        let scores = Arc::new(TtlCache::new(cache_ttl));

        let janitor = Janitor::spawn(
            vec![
                Arc::clone(&week_stats) as Arc<dyn Sweepable>,
                Arc::clone(&season_totals) as Arc<dyn Sweepable>,
                Arc::clone(&teams) as Arc<dyn Sweepable>,
                Arc::clone(&schedules) as Arc<dyn Sweepable>,
                Arc::clone(&scores) as Arc<dyn Sweepable>,
            ],
            sweep_period,
        );

        Self {
            api,
            week_stats,
            season_totals,
            teams,
            schedules,
            scores,
            season: Mutex::new(None),
            _janitor: janitor,
        }
    }

    /// The season window requests should target right now. Memoized
    /// for an hour; the clock itself is cheap but there is no reason
    /// to recompute it per request.
    pub fn current_season(&self) -> SeasonInfo {
        let mut guard = self.season.lock().unwrap();
        if let Some((info, computed_at)) = &*guard {
            if computed_at.elapsed() < SEASON_INFO_MAX_AGE {
                return *info;
            }
        }

        let info = season::current_week(Utc::now());
        info!(
            season = info.season,
            phase = %info.phase,
            week = info.week,
            "season window computed"
        );
        *guard = Some((info, Instant::now()));
        info
    }

    // -- Player stats ----------------------------------------------------

    /// Stats for a player in the current week.
    pub async fn player_stats(&self, name: &str) -> Result<PlayerStats, StatsError> {
        let name = validated_name(name, "player")?;
        let window = self.current_season();
        self.player_stats_in_window(name, window).await
    }

    /// Stats for a player in a specific past week. Out-of-range weeks
    /// and seasons are rejected before any network activity.
    pub async fn player_week_stats(
        &self,
        name: &str,
        season: i32,
        week: u32,
    ) -> Result<PlayerStats, StatsError> {
        let name = validated_name(name, "player")?;
        if !(1..=season::REGULAR_SEASON_WEEKS).contains(&week) {
            return Err(StatsError::InvalidInput(format!(
                "invalid week {week}: must be 1-{}",
                season::REGULAR_SEASON_WEEKS
            )));
        }
        if !(MIN_SEASON..=MAX_SEASON).contains(&season) {
            return Err(StatsError::InvalidInput(format!(
                "invalid season {season}: must be {MIN_SEASON}-{MAX_SEASON}"
            )));
        }

        let window = SeasonInfo { season, phase: SeasonPhase::Regular, week };
        self.player_stats_in_window(name, window).await
    }

    async fn player_stats_in_window(
        &self,
        name: &str,
        window: SeasonInfo,
    ) -> Result<PlayerStats, StatsError> {
        let key = format!(
            "player_week_{}_{}_{}",
            matching::normalize(name),
            window.label(),
            window.week
        );
        if let Some(hit) = self.week_stats.get(&key) {
            debug!(%key, "using cached player stats");
            return Ok(hit);
        }

        let rows = self
            .api
            .player_stats_by_week(window.season, window.phase, window.week)
            .await?;
        debug!(candidates = rows.len(), query = name, "scanning week batch");

        let matched = resolve(&rows, name, |r| r.name.as_str()).ok_or_else(|| {
            StatsError::NotFound(format!(
                "player '{name}' not found in {} week {} stats; \
                 try a different spelling or check if they played that week",
                window.season, window.week
            ))
        })?;
        info!(
            matched = %matched.record.name,
            score = matched.score,
            query = name,
            "player resolved"
        );

        let stats = stats_from_row(matched.record, Some(window.week));
        self.week_stats.put(&key, stats.clone());
        Ok(stats)
    }

    /// Approximate season totals for a player over the previous
    /// completed season, built from a fixed sample of weeks. The
    /// result's note discloses how many games were counted; it must
    /// not be presented as an authoritative season line.
    pub async fn player_season_totals(&self, name: &str) -> Result<SeasonTotals, StatsError> {
        let name = validated_name(name, "player")?;
        let season = self.current_season().season - 1;

        let key = format!(
            "player_season_{}_{}REG",
            matching::normalize(name),
            season
        );
        if let Some(hit) = self.season_totals.get(&key) {
            debug!(%key, "using cached season totals");
            return Ok(hit);
        }

        info!(query = name, season, weeks = ?SAMPLED_WEEKS, "aggregating season sample");

        let mut player: Option<PlayerStats> = None;
        let mut games_counted = 0u32;
        let mut weeks_matched = Vec::new();

        for &week in SAMPLED_WEEKS.iter() {
            let rows = match self
                .api
                .player_stats_by_week(season, SeasonPhase::Regular, week)
                .await
            {
                Ok(rows) => rows,
                Err(e) => {
                    warn!(week, error = %e, "skipping week in season aggregation");
                    continue;
                }
            };

            let Some(matched) = resolve(&rows, name, |r| r.name.as_str()) else {
                continue;
            };
            debug!(week, matched = %matched.record.name, score = matched.score, "week contributes");

            let totals = player.get_or_insert_with(|| PlayerStats {
                name: matched.record.name.clone(),
                team: matched.record.team.clone(),
                position: matched.record.position.clone(),
                season,
                week: None,
                passing: None,
                rushing: None,
                receiving: None,
            });
            accumulate(totals, matched.record);
            games_counted += 1;
            weeks_matched.push(week);
        }

        let player = player.ok_or_else(|| {
            StatsError::NotFound(format!(
                "player '{name}' not found in any sampled week of the {season} season; \
                 try a different spelling"
            ))
        })?;

        let totals = SeasonTotals {
            player,
            games_counted,
            weeks_sampled: weeks_matched,
            note: format!(
                "Sampled {games_counted} of {} games (not full season)",
                season::REGULAR_SEASON_WEEKS
            ),
        };
        self.season_totals.put(&key, totals.clone());
        Ok(totals)
    }

    // -- Teams, schedules, scores ----------------------------------------

    /// Franchise info looked up by nickname, city, full name, or
    /// abbreviation. The whole listing is cached under one key since
    /// it does not depend on the query.
    pub async fn team_info(&self, name: &str) -> Result<TeamInfo, StatsError> {
        let name = validated_name(name, "team")?;

        let rows = match self.teams.get(TEAMS_CACHE_KEY) {
            Some(rows) => {
                debug!("using cached team listing");
                rows
            }
            None => {
                let rows = self.api.teams().await?;
                self.teams.put(TEAMS_CACHE_KEY, rows.clone());
                rows
            }
        };

        find_team(&rows, name)
            .ok_or_else(|| StatsError::NotFound(format!("team '{name}' not found")))
    }

    /// A team's full-season schedule, including its BYE week. The
    /// league-wide game list is cached per season, so queries for
    /// different teams share one fetch; filtering is cheap enough to
    /// redo per request.
    pub async fn team_schedule(&self, name: &str) -> Result<TeamSchedule, StatsError> {
        let name = validated_name(name, "team")?;
        let window = self.current_season();

        let key = format!("schedule_{}", window.label());
        let rows = match self.schedules.get(&key) {
            Some(rows) => {
                debug!(%key, "using cached league schedule");
                rows
            }
            None => {
                let rows = self.api.schedule(window.season, window.phase).await?;
                self.schedules.put(&key, rows.clone());
                rows
            }
        };

        let variations = matching::name_variations(name);
        debug!(games = rows.len(), ?variations, "filtering league schedule");

        let games: Vec<Game> = rows
            .iter()
            .filter(|row| row_matches_team(row, &variations))
            .map(|row| game_from_row(row, window.phase))
            .collect();

        if games.is_empty() {
            return Err(StatsError::NotFound(format!(
                "no games found for team '{name}'; try the nickname, city, or abbreviation"
            )));
        }
        info!(team = name, games = games.len(), "schedule filtered");

        Ok(TeamSchedule {
            team: name.to_string(),
            season: window.season,
            games,
        })
    }

    /// Scoreboard for the current week.
    pub async fn live_scores(&self) -> Result<Vec<GameScore>, StatsError> {
        let window = self.current_season();
        let key = format!("scores_{}_{}", window.label(), window.week);
        if let Some(hit) = self.scores.get(&key) {
            debug!(%key, "using cached scores");
            return Ok(hit);
        }

        let rows = self
            .api
            .scores_by_week(window.season, window.phase, window.week)
            .await?;
        let scores: Vec<GameScore> = rows.iter().map(score_from_row).collect();

        self.scores.put(&key, scores.clone());
        Ok(scores)
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

fn validated_name<'a>(name: &'a str, what: &str) -> Result<&'a str, StatsError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StatsError::InvalidInput(format!("{what} name cannot be empty")));
    }
    Ok(trimmed)
}

/// Map a provider row into typed stats, leaving out any category whose
/// fields are all zero (the provider's convention for no activity).
fn stats_from_row(row: &PlayerGameRow, week: Option<u32>) -> PlayerStats {
    let passing = PassingLine {
        yards: row.passing_yards as i32,
        touchdowns: row.passing_touchdowns as u32,
        interceptions: row.interceptions as u32,
        completions: row.passing_completions as u32,
        attempts: row.passing_attempts as u32,
    };
    let rushing = RushingLine {
        yards: row.rushing_yards as i32,
        touchdowns: row.rushing_touchdowns as u32,
    };
    let receiving = ReceivingLine {
        yards: row.receiving_yards as i32,
        touchdowns: row.receiving_touchdowns as u32,
        receptions: row.receptions as u32,
        targets: row.targets as u32,
    };

    PlayerStats {
        name: row.name.clone(),
        team: row.team.clone(),
        position: row.position.clone(),
        season: row.season as i32,
        week,
        passing: (!passing.is_empty()).then_some(passing),
        rushing: (!rushing.is_empty()).then_some(rushing),
        receiving: (!receiving.is_empty()).then_some(receiving),
    }
}

/// Fold one week's row into running totals. A category that is empty
/// for the week contributes nothing and does not materialise in the
/// totals on its own.
fn accumulate(totals: &mut PlayerStats, row: &PlayerGameRow) {
    let weekly = stats_from_row(row, None);

    if let Some(p) = weekly.passing {
        let agg = totals.passing.get_or_insert_with(PassingLine::default);
        agg.yards += p.yards;
        agg.touchdowns += p.touchdowns;
        agg.interceptions += p.interceptions;
        agg.completions += p.completions;
        agg.attempts += p.attempts;
    }
    if let Some(r) = weekly.rushing {
        let agg = totals.rushing.get_or_insert_with(RushingLine::default);
        agg.yards += r.yards;
        agg.touchdowns += r.touchdowns;
    }
    if let Some(r) = weekly.receiving {
        let agg = totals.receiving.get_or_insert_with(ReceivingLine::default);
        agg.yards += r.yards;
        agg.touchdowns += r.touchdowns;
        agg.receptions += r.receptions;
        agg.targets += r.targets;
    }
}

/// Case-insensitive containment lookup across the fields a user might
/// type: nickname, city, full name, or abbreviation. First match in
/// listing order wins.
fn find_team(rows: &[TeamRow], query: &str) -> Option<TeamInfo> {
    let q = query.to_lowercase();
    rows.iter()
        .find(|t| {
            t.name.to_lowercase().contains(&q)
                || t.city.to_lowercase().contains(&q)
                || t.full_name.to_lowercase().contains(&q)
                || t.key.to_lowercase().contains(&q)
        })
        .map(|t| TeamInfo {
            name: t.name.clone(),
            city: t.city.clone(),
            full_name: t.full_name.clone(),
            abbreviation: t.key.clone(),
            conference: t.conference.clone(),
            division: t.division.clone(),
            coach: t.head_coach.clone(),
            stadium: t.stadium_name.clone(),
        })
}

/// Whether a schedule row involves the queried team. BYE placeholders
/// carry "BYE" on one side; the real team is on the other, and the row
/// is kept so the filtered schedule shows the off week.
fn row_matches_team(row: &GameRow, variations: &[String]) -> bool {
    let home = row.home_team.to_lowercase();
    let away = row.away_team.to_lowercase();
    let is_bye = home == "bye" || away == "bye";

    if is_bye {
        let actual = if home == "bye" { &away } else { &home };
        variations.iter().any(|v| actual.contains(v))
    } else {
        variations
            .iter()
            .any(|v| home.contains(v) || away.contains(v))
    }
}

fn game_from_row(row: &GameRow, phase: SeasonPhase) -> Game {
    Game {
        id: row.game_key.clone(),
        season: row.season,
        phase,
        week: row.week,
        home_team: row.home_team.clone(),
        away_team: row.away_team.clone(),
        home_score: row.home_score.unwrap_or(0),
        away_score: row.away_score.unwrap_or(0),
        kickoff: kickoff_from_row(row),
        status: row.status.clone(),
        stadium: row.stadium.clone().unwrap_or_default(),
    }
}

fn score_from_row(row: &GameRow) -> GameScore {
    GameScore {
        game_id: row.game_key.clone(),
        season: row.season,
        week: row.week,
        away_team: row.away_team.clone(),
        home_team: row.home_team.clone(),
        away_score: row.away_score.unwrap_or(0),
        home_score: row.home_score.unwrap_or(0),
        quarter: row.quarter.clone().unwrap_or_default(),
        time_remaining: row.time_remaining.clone().unwrap_or_default(),
        status: row.status.clone(),
        kickoff: kickoff_from_row(row),
    }
}

fn kickoff_from_row(row: &GameRow) -> Option<chrono::DateTime<Utc>> {
    let raw = row.date_time.as_deref().filter(|s| !s.is_empty())?;
    let parsed = parse_kickoff(raw);
    if parsed.is_none() {
        warn!(raw, game = %row.game_key, "could not parse kickoff time");
    }
    parsed
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn passing_row(name: &str, yards: f64, tds: f64) -> PlayerGameRow {
        PlayerGameRow {
            name: name.to_string(),
            team: "BUF".to_string(),
            position: "QB".to_string(),
            season: 2024.0,
            week: 6.0,
            passing_yards: yards,
            passing_touchdowns: tds,
            passing_completions: 24.0,
            passing_attempts: 32.0,
            ..Default::default()
        }
    }

    fn rushing_row(name: &str, yards: f64) -> PlayerGameRow {
        PlayerGameRow {
            name: name.to_string(),
            team: "TEN".to_string(),
            position: "RB".to_string(),
            season: 2024.0,
            rushing_yards: yards,
            rushing_touchdowns: 0.0,
            ..Default::default()
        }
    }

    // -- stats_from_row --

    #[test]
    fn test_stats_from_row_omits_empty_categories() {
        let stats = stats_from_row(&passing_row("Josh Allen", 300.0, 3.0), Some(6));
        assert!(stats.passing.is_some());
        assert!(stats.rushing.is_none());
        assert!(stats.receiving.is_none());
        assert_eq!(stats.passing.unwrap().yards, 300);
        assert_eq!(stats.week, Some(6));
    }

    #[test]
    fn test_stats_from_row_all_zero() {
        let row = PlayerGameRow {
            name: "Backup Guy".to_string(),
            ..Default::default()
        };
        let stats = stats_from_row(&row, Some(1));
        assert!(!stats.has_any_stats());
    }

    #[test]
    fn test_stats_from_row_negative_rushing() {
        let stats = stats_from_row(&rushing_row("Kneel Down", -3.0), None);
        assert_eq!(stats.rushing.unwrap().yards, -3);
    }

    // -- accumulate --

    #[test]
    fn test_accumulate_sums_across_weeks() {
        let mut totals = stats_from_row(&rushing_row("Derrick Henry", 50.0), None);
        accumulate(&mut totals, &rushing_row("Derrick Henry", 70.0));
        accumulate(&mut totals, &rushing_row("Derrick Henry", 60.0));
        assert_eq!(totals.rushing.unwrap().yards, 180);
        assert!(totals.passing.is_none());
    }

    #[test]
    fn test_accumulate_zero_week_adds_nothing() {
        let mut totals = stats_from_row(&rushing_row("Derrick Henry", 50.0), None);
        accumulate(&mut totals, &rushing_row("Derrick Henry", 0.0));
        assert_eq!(totals.rushing.unwrap().yards, 50);
    }

    #[test]
    fn test_accumulate_does_not_materialise_empty_category() {
        let mut totals = stats_from_row(&rushing_row("Derrick Henry", 50.0), None);
        accumulate(&mut totals, &rushing_row("Derrick Henry", 25.0));
        assert!(totals.passing.is_none());
        assert!(totals.receiving.is_none());
    }

    // -- find_team --

    fn team_rows() -> Vec<TeamRow> {
        vec![
            TeamRow {
                key: "BUF".to_string(),
                city: "Buffalo".to_string(),
                name: "Bills".to_string(),
                full_name: "Buffalo Bills".to_string(),
                conference: "AFC".to_string(),
                division: "AFC East".to_string(),
                ..Default::default()
            },
            TeamRow {
                key: "KC".to_string(),
                city: "Kansas City".to_string(),
                name: "Chiefs".to_string(),
                full_name: "Kansas City Chiefs".to_string(),
                conference: "AFC".to_string(),
                division: "AFC West".to_string(),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_find_team_by_nickname() {
        let team = find_team(&team_rows(), "bills").unwrap();
        assert_eq!(team.abbreviation, "BUF");
    }

    #[test]
    fn test_find_team_by_city_and_key() {
        assert_eq!(find_team(&team_rows(), "kansas").unwrap().name, "Chiefs");
        assert_eq!(find_team(&team_rows(), "kc").unwrap().name, "Chiefs");
    }

    #[test]
    fn test_find_team_unknown() {
        assert!(find_team(&team_rows(), "isotopes").is_none());
    }

    // -- schedule filtering --

    fn game_row(home: &str, away: &str, week: u32) -> GameRow {
        GameRow {
            game_key: format!("{week}-{away}-{home}"),
            season: 2025,
            week,
            home_team: home.to_string(),
            away_team: away.to_string(),
            status: "Scheduled".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_row_matches_team_by_variation() {
        let variations = matching::name_variations("bills");
        assert!(row_matches_team(&game_row("BUF", "KC", 1), &variations));
        assert!(row_matches_team(&game_row("NYJ", "buffalo", 2), &variations));
        assert!(!row_matches_team(&game_row("DAL", "PHI", 3), &variations));
    }

    #[test]
    fn test_bye_row_attributed_to_real_team() {
        let variations = matching::name_variations("bills");
        assert!(row_matches_team(&game_row("BYE", "BUF", 7), &variations));
        assert!(!row_matches_team(&game_row("BYE", "DAL", 7), &variations));
    }

    #[test]
    fn test_game_from_row_unparsable_kickoff() {
        let mut row = game_row("BUF", "KC", 1);
        row.date_time = Some("soon-ish".to_string());
        let game = game_from_row(&row, SeasonPhase::Regular);
        assert!(game.kickoff.is_none());
        assert_eq!(game.home_score, 0);
    }

    #[test]
    fn test_score_from_row_defaults() {
        let mut row = game_row("BUF", "KC", 6);
        row.home_score = Some(20);
        row.away_score = Some(17);
        row.quarter = Some("4".to_string());
        row.time_remaining = Some("2:00".to_string());
        row.status = "InProgress".to_string();
        let score = score_from_row(&row);
        assert!(score.is_live());
        assert_eq!(score.home_score, 20);
        assert_eq!(score.quarter, "4");
    }

    #[test]
    fn test_validated_name() {
        assert!(validated_name("  ", "player").is_err());
        assert_eq!(validated_name(" Josh Allen ", "player").unwrap(), "Josh Allen");
    }
}
