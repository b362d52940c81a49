//! Bankroll chart series
//!
//! The running bankroll is always accumulated over the full chronological
//! history; range projections only choose which tail of it is returned.

use super::derived::DerivedSession;
use serde::{Deserialize, Serialize};

/// Default trailing window for the moving average
pub const DEFAULT_MOVING_AVERAGE_WINDOW: usize = 3;

/// How much of the history to chart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeMode {
    #[default]
    All,
    Last10,
    Last20,
}

impl RangeMode {
    fn limit(&self) -> Option<usize> {
        match self {
            Self::All => None,
            Self::Last10 => Some(10),
            Self::Last20 => Some(20),
        }
    }
}

/// Which sequence the chart values follow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesMode {
    /// Cumulative bankroll after each session
    #[default]
    Bankroll,
    /// Raw profit of each session
    Profit,
}

/// Aligned chart sequences for one range/mode selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BankrollSeries {
    pub range: RangeMode,
    pub mode: SeriesMode,
    pub window: usize,
    /// "Session N", numbered over the full history
    pub labels: Vec<String>,
    pub bankroll: Vec<f64>,
    pub profit: Vec<f64>,
    /// The sequence selected by `mode`
    pub values: Vec<f64>,
    /// Trailing moving average of `values`
    pub moving_average: Vec<f64>,
}

/// Build the series. `sessions` must be in chronological order.
pub fn build_series(
    sessions: &[DerivedSession<'_>],
    starting_bankroll: f64,
    range: RangeMode,
    mode: SeriesMode,
    window: usize,
) -> BankrollSeries {
    let profit: Vec<f64> = sessions.iter().map(|s| s.profit).collect();
    let bankroll: Vec<f64> = profit
        .iter()
        .scan(starting_bankroll, |running, p| {
            *running += p;
            Some(*running)
        })
        .collect();

    let start = range
        .limit()
        .map_or(0, |limit| profit.len().saturating_sub(limit));

    let labels = (start..profit.len())
        .map(|i| format!("Session {}", i + 1))
        .collect();
    let bankroll = bankroll[start..].to_vec();
    let profit = profit[start..].to_vec();
    let values = match mode {
        SeriesMode::Bankroll => bankroll.clone(),
        SeriesMode::Profit => profit.clone(),
    };
    let window = window.max(1);
    let moving_average = moving_average(&values, window);

    BankrollSeries {
        range,
        mode,
        window,
        labels,
        bankroll,
        profit,
        values,
        moving_average,
    }
}

/// Trailing mean over up to `window` points; the window shrinks at the start
/// of the sequence instead of padding. A window of 0 behaves like 1.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let len = (i + 1).min(window);
            super::stats::sum(values[i + 1 - len..=i].iter().copied()) / len as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::derived::derive_all;
    use crate::analytics::testing::profits_to_sessions;

    #[test]
    fn test_moving_average_shrinks_at_start() {
        assert_eq!(
            moving_average(&[10.0, 20.0, 30.0, 40.0], 3),
            vec![10.0, 15.0, 20.0, 30.0]
        );
    }

    #[test]
    fn test_moving_average_edge_windows() {
        assert_eq!(moving_average(&[1.0, 2.0, 3.0], 1), vec![1.0, 2.0, 3.0]);
        assert_eq!(moving_average(&[1.0, 2.0, 3.0], 0), vec![1.0, 2.0, 3.0]);
        assert_eq!(moving_average(&[2.0, 4.0], 10), vec![2.0, 3.0]);
        assert!(moving_average(&[], 3).is_empty());
    }

    #[test]
    fn test_moving_average_after_large_value() {
        assert_eq!(
            moving_average(&[1e17, 1.0, 1.0, 1.0], 1),
            vec![1e17, 1.0, 1.0, 1.0]
        );
        assert_eq!(moving_average(&[1e17, 1.0, 1.0, 1.0], 2)[3], 1.0);
    }

    #[test]
    fn test_running_bankroll_from_starting_amount() {
        let sessions = profits_to_sessions(&[10.0, -4.0, 6.0]);
        let derived = derive_all(&sessions);
        let series = build_series(&derived, 100.0, RangeMode::All, SeriesMode::Bankroll, 3);

        assert_eq!(series.bankroll, vec![110.0, 106.0, 112.0]);
        assert_eq!(series.profit, vec![10.0, -4.0, 6.0]);
        assert_eq!(series.values, series.bankroll);
        assert_eq!(series.labels, vec!["Session 1", "Session 2", "Session 3"]);
    }

    #[test]
    fn test_range_projection_keeps_cumulative_values() {
        let profits: Vec<f64> = (1..=20).map(f64::from).collect();
        let sessions = profits_to_sessions(&profits);
        let derived = derive_all(&sessions);

        let all = build_series(&derived, 0.0, RangeMode::All, SeriesMode::Bankroll, 3);
        let last10 = build_series(&derived, 0.0, RangeMode::Last10, SeriesMode::Bankroll, 3);

        assert_eq!(last10.bankroll.len(), 10);
        assert_eq!(last10.bankroll[..], all.bankroll[10..]);
        assert_eq!(last10.labels[0], "Session 11");
        // Moving average restarts inside the projected window
        assert_eq!(last10.moving_average[0], last10.values[0]);
    }

    #[test]
    fn test_short_history_returns_everything() {
        let sessions = profits_to_sessions(&[5.0, 5.0]);
        let derived = derive_all(&sessions);
        let series = build_series(&derived, 0.0, RangeMode::Last20, SeriesMode::Profit, 3);

        assert_eq!(series.values, vec![5.0, 5.0]);
        assert_eq!(series.moving_average, vec![5.0, 5.0]);
    }

    #[test]
    fn test_range_mode_names() {
        let range: RangeMode = serde_json::from_str("\"last10\"").unwrap();
        assert_eq!(range, RangeMode::Last10);
        let mode: SeriesMode = serde_json::from_str("\"profit\"").unwrap();
        assert_eq!(mode, SeriesMode::Profit);
    }
}
