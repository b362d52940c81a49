//! Per-session derived metrics
//!
//! `profit` is always defined. `hourly_rate` only exists when the session has
//! a positive duration; it is never coerced to zero or infinity.

use crate::session::Session;
use serde::Serialize;

/// A session together with its computed fields
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DerivedSession<'a> {
    #[serde(flatten)]
    pub session: &'a Session,
    pub profit: f64,
    pub hourly_rate: Option<f64>,
}

impl<'a> DerivedSession<'a> {
    pub fn new(session: &'a Session) -> Self {
        let profit = session.cash_out - session.buy_in;
        let hourly_rate = positive_hours(session).map(|hours| profit / hours);
        Self {
            session,
            profit,
            hourly_rate,
        }
    }

    /// Hours that count toward rate calculations
    pub fn hours(&self) -> Option<f64> {
        positive_hours(self.session)
    }
}

fn positive_hours(session: &Session) -> Option<f64> {
    session.hours_played.filter(|h| *h > 0.0)
}

/// Derive every session, keeping input order
pub fn derive_all(sessions: &[Session]) -> Vec<DerivedSession<'_>> {
    sessions.iter().map(DerivedSession::new).collect()
}
