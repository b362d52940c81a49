// Session analytics engine
//
// Pure computation over a slice of sessions: derived metrics, grouped
// breakdowns, dispersion and streaks, bankroll series and advisory notes.
// Nothing here touches disk or holds state between calls; every query
// recomputes from the sessions it was built with.

pub mod advisory;
pub mod aggregate;
pub mod bankroll;
pub mod derived;
pub mod stats;
pub mod summary;

#[cfg(test)]
pub(crate) mod testing;

pub use advisory::AdvisoryNote;
pub use aggregate::{Dimension, GroupEntry};
pub use bankroll::{BankrollSeries, RangeMode, SeriesMode};
pub use derived::DerivedSession;
pub use stats::{StatsSnapshot, Totals};

use crate::session::Session;

/// Engine parameters that come from configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub starting_bankroll: f64,
    pub moving_average_window: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            starting_bankroll: 0.0,
            moving_average_window: bankroll::DEFAULT_MOVING_AVERAGE_WINDOW,
        }
    }
}

/// Query facade over one snapshot of the session history
pub struct Analytics<'a> {
    sessions: Vec<DerivedSession<'a>>,
    settings: Settings,
}

impl<'a> Analytics<'a> {
    /// Derive every session and put them in chronological order.
    /// Sessions sharing a date keep their repository order.
    pub fn new(sessions: &'a [Session], settings: Settings) -> Self {
        let mut derived = derived::derive_all(sessions);
        derived.sort_by(|a, b| a.session.date.cmp(&b.session.date));
        Self {
            sessions: derived,
            settings,
        }
    }

    /// Derived sessions in chronological order
    pub fn sessions(&self) -> &[DerivedSession<'a>] {
        &self.sessions
    }

    pub fn totals(&self) -> Totals {
        Totals::compute(&self.sessions)
    }

    pub fn summary_lines(&self) -> Vec<String> {
        summary::summary_lines(&self.totals(), self.settings.starting_bankroll)
    }

    pub fn bankroll_series(&self, range: RangeMode, mode: SeriesMode) -> BankrollSeries {
        self.bankroll_series_with_window(range, mode, self.settings.moving_average_window)
    }

    /// Same as `bankroll_series` with an explicit moving-average window
    pub fn bankroll_series_with_window(
        &self,
        range: RangeMode,
        mode: SeriesMode,
        window: usize,
    ) -> BankrollSeries {
        bankroll::build_series(
            &self.sessions,
            self.settings.starting_bankroll,
            range,
            mode,
            window,
        )
    }

    pub fn advanced_stats(&self) -> StatsSnapshot {
        StatsSnapshot::compute(&self.sessions)
    }

    pub fn grouped_stats(&self, dimension: Dimension) -> Vec<GroupEntry> {
        aggregate::group_by(&self.sessions, dimension)
    }

    pub fn advisory_notes(&self) -> Vec<AdvisoryNote> {
        advisory::evaluate(&self.totals())
    }
}
