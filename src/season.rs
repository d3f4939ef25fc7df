//! Season clock: maps a timestamp to the NFL season window it belongs to.
//!
//! The league year starts in September, so January and February games
//! belong to the prior season. Week boundaries deliberately lag by one
//! day mid-week: on Wednesdays the clock still reports the previous
//! week, whose games have all been played, rather than switching to the
//! upcoming one early.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};

use crate::types::{SeasonInfo, SeasonPhase};

/// Weeks in the regular season.
pub const REGULAR_SEASON_WEEKS: u32 = 18;

/// Weeks in the postseason (wild card through Super Bowl).
pub const POSTSEASON_WEEKS: u32 = 4;

/// Hour (UTC) of the typical Thursday kickoff that opens the season.
/// Only the day granularity matters for week arithmetic.
const KICKOFF_HOUR_UTC: u32 = 20;

/// Approximate season opener: the first Thursday of September at the
/// typical kickoff hour.
pub fn season_start(season: i32) -> DateTime<Utc> {
    let sept_first = NaiveDate::from_ymd_opt(season, 9, 1).unwrap_or_default();
    let offset = (Weekday::Thu.num_days_from_monday() + 7
        - sept_first.weekday().num_days_from_monday())
        % 7;
    let opener = sept_first + Duration::days(i64::from(offset));
    Utc.from_utc_datetime(&opener.and_hms_opt(KICKOFF_HOUR_UTC, 0, 0).unwrap_or_default())
}

/// Determine the season window a timestamp falls in.
///
/// Total and deterministic: every timestamp maps to some window. Before
/// the opener (and in the off-season beyond the playoffs) the prior
/// completed regular season's closing week is reported, since that is
/// the freshest data the provider has.
pub fn current_week(now: DateTime<Utc>) -> SeasonInfo {
    let mut season = now.year();
    if now.month() < 3 {
        season -= 1;
    }

    let start = season_start(season);
    if now < start {
        return SeasonInfo {
            season: season - 1,
            phase: SeasonPhase::Regular,
            week: REGULAR_SEASON_WEEKS,
        };
    }

    let days_since_start = (now - start).num_days();
    let mut week = (days_since_start / 7) as u32 + 1;

    // Wednesday still shows the prior week's completed games.
    if now.weekday() == Weekday::Wed && week > 1 {
        week -= 1;
    }

    if week <= REGULAR_SEASON_WEEKS {
        SeasonInfo { season, phase: SeasonPhase::Regular, week }
    } else if week <= REGULAR_SEASON_WEEKS + POSTSEASON_WEEKS {
        SeasonInfo {
            season,
            phase: SeasonPhase::Post,
            week: week - REGULAR_SEASON_WEEKS,
        }
    } else {
        SeasonInfo {
            season,
            phase: SeasonPhase::Regular,
            week: REGULAR_SEASON_WEEKS,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_season_start_is_first_thursday() {
        // Sept 1 2025 is a Monday, so the first Thursday is Sept 4.
        let start = season_start(2025);
        assert_eq!(start.weekday(), Weekday::Thu);
        assert_eq!(start.day(), 4);
        assert_eq!(start.month(), 9);

        // Sept 1 2022 is itself a Thursday.
        let start = season_start(2022);
        assert_eq!(start.weekday(), Weekday::Thu);
        assert_eq!(start.day(), 1);
    }

    #[test]
    fn test_opening_night_is_week_one() {
        let info = current_week(at(2025, 9, 4, 20));
        assert_eq!(info.season, 2025);
        assert_eq!(info.phase, SeasonPhase::Regular);
        assert_eq!(info.week, 1);
    }

    #[test]
    fn test_week_advances_every_seven_days() {
        // Same weekday seven days apart, no Wednesday involved.
        let a = current_week(at(2025, 9, 7, 18)); // Sunday of week 1
        let b = current_week(at(2025, 9, 14, 18)); // Sunday of week 2
        assert_eq!(a.week, 1);
        assert_eq!(b.week, a.week + 1);
    }

    #[test]
    fn test_wednesday_reports_previous_week() {
        // Tue Sep 16 2025 falls in week 2; Wed Sep 17 drops back to week 1.
        let tuesday = current_week(at(2025, 9, 16, 12));
        let wednesday = current_week(at(2025, 9, 17, 12));
        assert_eq!(tuesday.week, 2);
        assert_eq!(wednesday.week, tuesday.week - 1);
    }

    #[test]
    fn test_wednesday_floor_at_week_one() {
        // The Wednesday right before week 2 starts is still inside week 1
        // and must never report week 0.
        let wednesday = current_week(at(2025, 9, 10, 12));
        assert_eq!(wednesday.week, 1);
    }

    #[test]
    fn test_before_opener_reports_prior_season_closing_week() {
        let info = current_week(at(2025, 8, 1, 12));
        assert_eq!(info.season, 2024);
        assert_eq!(info.phase, SeasonPhase::Regular);
        assert_eq!(info.week, 18);
    }

    #[test]
    fn test_january_belongs_to_prior_season() {
        // Mid-January: season year decrements, and the clock lands in the
        // postseason of that prior year.
        let info = current_week(at(2026, 1, 15, 12));
        assert_eq!(info.season, 2025);
        assert_eq!(info.phase, SeasonPhase::Post);
        assert!(info.week >= 1 && info.week <= POSTSEASON_WEEKS);
    }

    #[test]
    fn test_postseason_week_mapping() {
        // 19 calendar weeks after the 2025 opener (Thu Sep 4) lands in
        // postseason week 1.
        let start = season_start(2025);
        let info = current_week(start + Duration::weeks(18) + Duration::days(3));
        assert_eq!(info.phase, SeasonPhase::Post);
        assert_eq!(info.week, 1);

        let info = current_week(start + Duration::weeks(21) + Duration::days(3));
        assert_eq!(info.phase, SeasonPhase::Post);
        assert_eq!(info.week, 4);
    }

    #[test]
    fn test_offseason_past_playoffs_reports_closing_week() {
        // 25 weeks after the opener lands in late February, past the
        // playoffs but still inside the 2025 league year.
        let start = season_start(2025);
        let info = current_week(start + Duration::weeks(25));
        assert_eq!(info.season, 2025);
        assert_eq!(info.phase, SeasonPhase::Regular);
        assert_eq!(info.week, REGULAR_SEASON_WEEKS);
    }

    #[test]
    fn test_weeks_stay_in_bounds() {
        // Sweep a full year of Sundays; every result must respect the
        // per-phase week bounds.
        let mut t = at(2025, 9, 7, 18);
        for _ in 0..52 {
            let info = current_week(t);
            match info.phase {
                SeasonPhase::Regular => {
                    assert!(info.week >= 1 && info.week <= REGULAR_SEASON_WEEKS)
                }
                SeasonPhase::Post => {
                    assert!(info.week >= 1 && info.week <= POSTSEASON_WEEKS)
                }
                SeasonPhase::Pre => panic!("clock never reports preseason"),
            }
            t += Duration::weeks(1);
        }
    }
}
