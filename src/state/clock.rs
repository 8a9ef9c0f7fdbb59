//! Derived ranking and timer values. Nothing here is cached; callers recompute on demand.

use time::{
    OffsetDateTime, PrimitiveDateTime, format_description::well_known::Rfc3339,
    macros::format_description,
};

use crate::state::board::{ScoreBoard, Team};

/// Remaining time below this many seconds is flagged as urgent.
pub const DEFAULT_URGENT_THRESHOLD_SECS: i64 = 300;

/// Elapsed and remaining time for a board at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerReading {
    /// Seconds since the start time, never negative.
    pub elapsed: i64,
    /// Seconds left of the allotted duration, never negative.
    pub remaining: i64,
    /// Whether `remaining` is under the urgency threshold.
    pub urgent: bool,
}

impl TimerReading {
    /// Compute the reading for `board` at `now`.
    pub fn at(board: &ScoreBoard, now: OffsetDateTime, urgent_threshold: i64) -> Self {
        let start = parse_start_time(&board.start_time);
        let elapsed = elapsed_seconds(start, now);
        let remaining = remaining_seconds(board.total_time, elapsed);
        Self {
            elapsed,
            remaining,
            urgent: is_urgent(remaining, urgent_threshold),
        }
    }
}

/// Parse a start time. RFC 3339 first, then an offset-less ISO timestamp read as UTC.
pub fn parse_start_time(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(parsed);
    }

    let local = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
    );
    PrimitiveDateTime::parse(raw, local)
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}

/// Whole seconds between `start` and `now`, floored at zero. No start means zero.
pub fn elapsed_seconds(start: Option<OffsetDateTime>, now: OffsetDateTime) -> i64 {
    start
        .map(|start| (now - start).whole_seconds().max(0))
        .unwrap_or(0)
}

/// `total - elapsed`, floored at zero.
pub fn remaining_seconds(total: i64, elapsed: i64) -> i64 {
    total.saturating_sub(elapsed).max(0)
}

/// Whether `remaining` seconds are below the urgency threshold.
pub fn is_urgent(remaining: i64, threshold: i64) -> bool {
    remaining < threshold
}

/// Render seconds as zero-padded `HH:MM:SS`. Hours are not wrapped.
pub fn format_hms(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Teams ordered by descending score. Ties keep their input order.
pub fn rank_teams(teams: &[Team]) -> Vec<Team> {
    let mut ranked = teams.to_vec();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

#[cfg(test)]
mod tests {
    use time::{Duration, macros::datetime};

    use super::*;
    use crate::state::board::CompetitionState;

    fn team(id: &str, score: i64) -> Team {
        Team {
            team_id: id.into(),
            name: id.into(),
            score,
        }
    }

    fn board(start_time: String, total_time: i64) -> ScoreBoard {
        ScoreBoard {
            name: "Cup".into(),
            announcement: String::new(),
            description: String::new(),
            start_time,
            total_time,
            state: CompetitionState::Running,
            teams: Vec::new(),
        }
    }

    #[test]
    fn ranking_is_descending_and_stable() {
        let ranked = rank_teams(&[team("A", 10), team("B", 30), team("C", 30)]);
        let order: Vec<_> = ranked.iter().map(|t| t.team_id.as_str()).collect();
        assert_eq!(order, ["B", "C", "A"]);
    }

    #[test]
    fn ranking_handles_negative_scores() {
        let ranked = rank_teams(&[team("A", -5), team("B", 0), team("C", -1)]);
        let order: Vec<_> = ranked.iter().map(|t| t.team_id.as_str()).collect();
        assert_eq!(order, ["B", "C", "A"]);
    }

    #[test]
    fn timer_for_start_125_seconds_ago() {
        let now = datetime!(2026-05-01 12:00:00 UTC);
        let start = (now - Duration::seconds(125)).format(&Rfc3339).unwrap();

        let reading = TimerReading::at(&board(start, 600), now, DEFAULT_URGENT_THRESHOLD_SECS);
        assert_eq!(reading.elapsed, 125);
        assert_eq!(reading.remaining, 475);
        assert_eq!(format_hms(reading.elapsed), "00:02:05");
        assert_eq!(format_hms(reading.remaining), "00:07:55");
        assert!(!reading.urgent);
    }

    #[test]
    fn unparseable_start_means_not_started() {
        let now = datetime!(2026-05-01 12:00:00 UTC);
        let reading = TimerReading::at(
            &board("next tuesday".into(), 600),
            now,
            DEFAULT_URGENT_THRESHOLD_SECS,
        );
        assert_eq!(reading.elapsed, 0);
        assert_eq!(reading.remaining, 600);
    }

    #[test]
    fn future_start_floors_elapsed_at_zero() {
        let now = datetime!(2026-05-01 12:00:00 UTC);
        let reading = TimerReading::at(
            &board("2026-05-01T13:00:00Z".into(), 600),
            now,
            DEFAULT_URGENT_THRESHOLD_SECS,
        );
        assert_eq!(reading.elapsed, 0);
        assert_eq!(reading.remaining, 600);
    }

    #[test]
    fn remaining_never_negative_and_urgent_when_low() {
        let now = datetime!(2026-05-01 12:00:00 UTC);
        let reading = TimerReading::at(
            &board("2026-05-01T11:00:00Z".into(), 600),
            now,
            DEFAULT_URGENT_THRESHOLD_SECS,
        );
        assert_eq!(reading.elapsed, 3600);
        assert_eq!(reading.remaining, 0);
        assert!(reading.urgent);
    }

    #[test]
    fn offsetless_timestamp_is_read_as_utc() {
        let parsed = parse_start_time("2026-05-01T11:59:00.250").unwrap();
        assert_eq!(parsed.unix_timestamp(), datetime!(2026-05-01 11:59:00 UTC).unix_timestamp());
        assert_eq!(
            parse_start_time("2026-05-01T11:59:00+09:00").map(|t| t.unix_timestamp()),
            Some(datetime!(2026-05-01 02:59:00 UTC).unix_timestamp())
        );
    }

    #[test]
    fn urgency_threshold_is_exclusive() {
        assert!(is_urgent(299, DEFAULT_URGENT_THRESHOLD_SECS));
        assert!(!is_urgent(300, DEFAULT_URGENT_THRESHOLD_SECS));
        assert!(is_urgent(59, 60));
    }

    #[test]
    fn hms_formatting() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(59), "00:00:59");
        assert_eq!(format_hms(3661), "01:01:01");
        assert_eq!(format_hms(360_000), "100:00:00");
        assert_eq!(format_hms(-20), "00:00:00");
    }
}
