//! Global statistics: totals, dispersion, streaks
//!
//! Everything here is recomputed from the full session sequence on each call.
//! With zero sessions every ratio-type metric is `None` rather than zero.

use super::aggregate::{group_by, Dimension, GroupEntry};
use super::derived::DerivedSession;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Label attached to the mean ± 2σ band wherever it is shown
pub const ROUGH_RANGE_LABEL: &str =
    "rough 95% range (normal approximation heuristic, not a confidence interval)";

/// Sum starting from +0.0; `Iterator::sum` yields -0.0 for an empty f64 iterator
pub(crate) fn sum(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0, |acc, v| acc + v)
}

/// Headline totals shared by the summary, the snapshot and the advisory rules
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    pub total_sessions: usize,
    pub total_profit: f64,
    /// Sum of hours over sessions that recorded a positive duration
    pub total_hours: f64,
    pub overall_hourly: Option<f64>,
    /// Percentage of sessions with profit > 0
    pub winrate: Option<f64>,
    pub total_bullets: u64,
}

impl Totals {
    pub fn compute(sessions: &[DerivedSession<'_>]) -> Self {
        let total_sessions = sessions.len();
        let total_profit = sum(sessions.iter().map(|s| s.profit));
        let total_hours = sum(sessions.iter().filter_map(|s| s.hours()));
        let wins = sessions.iter().filter(|s| s.profit > 0.0).count();
        let total_bullets = sessions.iter().map(|s| u64::from(s.session.bullets)).sum();

        Self {
            total_sessions,
            total_profit,
            total_hours,
            overall_hourly: (total_hours > 0.0).then(|| total_profit / total_hours),
            winrate: (total_sessions > 0).then(|| wins as f64 / total_sessions as f64 * 100.0),
            total_bullets,
        }
    }
}

/// Mean and population dispersion of per-session profit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dispersion {
    pub mean: f64,
    pub variance: f64,
    pub stdev: f64,
}

impl Dispersion {
    /// Population statistics (divisor n): the numbers describe the sessions
    /// actually played, they are not estimates for an unseen population.
    pub fn compute(profits: &[f64]) -> Option<Self> {
        if profits.is_empty() {
            return None;
        }
        let n = profits.len() as f64;
        let mean = sum(profits.iter().copied()) / n;
        let variance = (sum(profits.iter().map(|p| (p - mean).powi(2))) / n).max(0.0);

        Some(Self {
            mean,
            variance,
            stdev: variance.sqrt(),
        })
    }

    pub fn rough_range(&self) -> RoughRange {
        RoughRange {
            low: self.mean - 2.0 * self.stdev,
            high: self.mean + 2.0 * self.stdev,
            label: ROUGH_RANGE_LABEL,
        }
    }
}

/// Mean ± 2σ band for a single session's result
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoughRange {
    pub low: f64,
    pub high: f64,
    pub label: &'static str,
}

/// Longest runs of winning and losing sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Streaks {
    pub best_win_streak: usize,
    pub worst_lose_streak: usize,
}

impl Streaks {
    /// Left-to-right scan; a breakeven session ends both kinds of streak
    pub fn compute(profits: &[f64]) -> Self {
        let mut streaks = Self::default();
        let (mut wins, mut losses) = (0usize, 0usize);

        for &profit in profits {
            if profit > 0.0 {
                wins += 1;
                losses = 0;
            } else if profit < 0.0 {
                losses += 1;
                wins = 0;
            } else {
                wins = 0;
                losses = 0;
            }
            streaks.best_win_streak = streaks.best_win_streak.max(wins);
            streaks.worst_lose_streak = streaks.worst_lose_streak.max(losses);
        }
        streaks
    }
}

/// Compact description of a notable session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionHighlight {
    pub date: DateTime<Utc>,
    pub game: String,
    pub location: String,
    pub profit: f64,
}

impl SessionHighlight {
    fn from_derived(session: &DerivedSession<'_>) -> Self {
        Self {
            date: session.session.date,
            game: session.session.game.clone(),
            location: session.session.location.clone(),
            profit: session.profit,
        }
    }
}

/// Full statistics payload for the stats page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    #[serde(flatten)]
    pub totals: Totals,
    pub mean_profit: Option<f64>,
    pub variance: Option<f64>,
    pub stdev: Option<f64>,
    pub rough_range: Option<RoughRange>,
    #[serde(flatten)]
    pub streaks: Streaks,
    pub biggest_win: Option<SessionHighlight>,
    pub biggest_loss: Option<SessionHighlight>,
    pub by_game: Vec<GroupEntry>,
    pub by_location: Vec<GroupEntry>,
    pub by_tag: Vec<GroupEntry>,
    pub by_length: Vec<GroupEntry>,
}

impl StatsSnapshot {
    /// `sessions` must already be in chronological order
    pub fn compute(sessions: &[DerivedSession<'_>]) -> Self {
        let profits: Vec<f64> = sessions.iter().map(|s| s.profit).collect();
        let dispersion = Dispersion::compute(&profits);

        Self {
            totals: Totals::compute(sessions),
            mean_profit: dispersion.map(|d| d.mean),
            variance: dispersion.map(|d| d.variance),
            stdev: dispersion.map(|d| d.stdev),
            rough_range: dispersion.map(|d| d.rough_range()),
            streaks: Streaks::compute(&profits),
            biggest_win: extreme(sessions, |candidate, best| candidate > best),
            biggest_loss: extreme(sessions, |candidate, best| candidate < best),
            by_game: group_by(sessions, Dimension::Game),
            by_location: group_by(sessions, Dimension::Location),
            by_tag: group_by(sessions, Dimension::Tag),
            by_length: group_by(sessions, Dimension::Length),
        }
    }
}

/// First session whose profit beats every other under `better`
fn extreme(
    sessions: &[DerivedSession<'_>],
    better: impl Fn(f64, f64) -> bool,
) -> Option<SessionHighlight> {
    let mut iter = sessions.iter();
    let first = iter.next()?;
    let best = iter.fold(first, |best, s| {
        if better(s.profit, best.profit) {
            s
        } else {
            best
        }
    });
    Some(SessionHighlight::from_derived(best))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::derived::derive_all;
    use crate::analytics::testing::{profits_to_sessions, session};

    #[test]
    fn test_streaks_reset_on_breakeven() {
        let streaks = Streaks::compute(&[10.0, 5.0, -3.0, 2.0, 2.0, -1.0, 0.0, 7.0]);
        // The opening +10,+5 is also a run of two
        assert_eq!(streaks.best_win_streak, 2);
        assert_eq!(streaks.worst_lose_streak, 1);
    }

    #[test]
    fn test_breakeven_splits_runs() {
        let streaks = Streaks::compute(&[1.0, 1.0, 0.0, 1.0, 1.0, -1.0, -1.0, 0.0, -1.0]);
        assert_eq!(streaks.best_win_streak, 2);
        assert_eq!(streaks.worst_lose_streak, 2);

        let streaks = Streaks::compute(&[-5.0, -5.0, -5.0, 3.0]);
        assert_eq!(streaks.worst_lose_streak, 3);
        assert_eq!(streaks.best_win_streak, 1);
    }

    #[test]
    fn test_population_variance() {
        let d = Dispersion::compute(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(d.mean, 5.0);
        assert_eq!(d.variance, 4.0);
        assert_eq!(d.stdev, 2.0);

        let range = d.rough_range();
        assert_eq!((range.low, range.high), (1.0, 9.0));
        assert_eq!(range.label, ROUGH_RANGE_LABEL);
    }

    #[test]
    fn test_single_session_has_zero_variance() {
        let d = Dispersion::compute(&[42.0]).unwrap();
        assert_eq!(d.variance, 0.0);
        assert_eq!(d.stdev, 0.0);
    }

    #[test]
    fn test_variance_never_negative() {
        let samples: [&[f64]; 3] = [&[0.1, 0.1, 0.1], &[1e12, 1e12 + 1.0], &[-3.0, 3.0]];
        for profits in samples {
            let d = Dispersion::compute(profits).unwrap();
            assert!(d.variance >= 0.0);
            assert_eq!(d.stdev, d.variance.sqrt());
        }
    }

    #[test]
    fn test_empty_snapshot_is_absent_not_zero() {
        let snapshot = StatsSnapshot::compute(&[]);
        assert_eq!(snapshot.totals.total_sessions, 0);
        assert_eq!(snapshot.totals.overall_hourly, None);
        assert_eq!(snapshot.totals.winrate, None);
        assert_eq!(snapshot.variance, None);
        assert_eq!(snapshot.stdev, None);
        assert_eq!(snapshot.rough_range, None);
        assert_eq!(snapshot.biggest_win, None);
        assert!(snapshot.by_game.is_empty());

        // Positive zero, so it renders as "+0.00" and serializes as 0.0
        assert!(snapshot.totals.total_profit.is_sign_positive());
        assert!(snapshot.totals.total_hours.is_sign_positive());
        let json = serde_json::to_value(&snapshot.totals).unwrap();
        assert_eq!(json["total_profit"].to_string(), "0.0");
    }

    #[test]
    fn test_totals() {
        let sessions = vec![
            session(20.0, 42.0, Some(2.0)),
            session(20.0, 8.0, Some(2.0)),
            session(20.0, 20.0, None),
            session(20.0, 60.0, Some(4.0)),
        ];
        let derived = derive_all(&sessions);
        let totals = Totals::compute(&derived);

        assert_eq!(totals.total_sessions, 4);
        assert_eq!(totals.total_profit, 50.0);
        assert_eq!(totals.total_hours, 8.0);
        assert_eq!(totals.overall_hourly, Some(6.25));
        assert_eq!(totals.winrate, Some(50.0));
        assert_eq!(totals.total_bullets, 4);
    }

    #[test]
    fn test_biggest_win_and_loss_take_first_extreme() {
        let sessions = profits_to_sessions(&[5.0, 30.0, -12.0, 30.0, -12.0]);
        let derived = derive_all(&sessions);
        let snapshot = StatsSnapshot::compute(&derived);

        let win = snapshot.biggest_win.unwrap();
        assert_eq!(win.profit, 30.0);
        assert_eq!(win.date, sessions[1].date);

        let loss = snapshot.biggest_loss.unwrap();
        assert_eq!(loss.profit, -12.0);
        assert_eq!(loss.date, sessions[2].date);
    }

    #[test]
    fn test_snapshot_partitions_match_total() {
        let sessions = crate::demo::demo_sessions();
        let derived = derive_all(&sessions);
        let snapshot = StatsSnapshot::compute(&derived);

        for groups in [&snapshot.by_game, &snapshot.by_location] {
            let sum: f64 = groups.iter().map(|g| g.bucket.total_profit).sum();
            assert!((sum - snapshot.totals.total_profit).abs() < 1e-9);
        }
    }

    #[test]
    fn test_snapshot_serializes_flat() {
        let sessions = profits_to_sessions(&[10.0, -5.0]);
        let derived = derive_all(&sessions);
        let value = serde_json::to_value(StatsSnapshot::compute(&derived)).unwrap();

        assert_eq!(value["total_sessions"], 2);
        assert_eq!(value["best_win_streak"], 1);
        assert_eq!(value["rough_range"]["label"], ROUGH_RANGE_LABEL);
        assert!(value["overall_hourly"].is_null());
    }
}
