//! Grouped performance breakdowns
//!
//! Sessions are grouped by one dimension and each group is reduced to
//! count / profit / hours. Group hourly is always `total_profit / total_hours`
//! from the group's own totals, never an average of per-session rates (which
//! would overweight short sessions).

use super::derived::DerivedSession;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Grouping dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Game,
    Location,
    Tag,
    Length,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Game,
        Dimension::Location,
        Dimension::Tag,
        Dimension::Length,
    ];

    /// Parse a dimension name, accepting a few spellings used by clients
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "game" | "games" => Some(Self::Game),
            "location" | "locations" => Some(Self::Location),
            "tag" | "tags" | "style" => Some(Self::Tag),
            "length" | "session_length" | "length_bucket" => Some(Self::Length),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Game => "game",
            Self::Location => "location",
            Self::Tag => "tag",
            Self::Length => "length",
        }
    }

    /// Key of a session under this dimension; `None` excludes it from the grouping
    fn key_of(&self, session: &DerivedSession<'_>) -> Option<String> {
        match self {
            Self::Game => Some(session.session.game.clone()),
            Self::Location => Some(session.session.location.clone()),
            Self::Tag => session.session.tag.map(|t| t.as_str().to_string()),
            Self::Length => session
                .session
                .hours_played
                .and_then(LengthBucket::from_hours)
                .map(|b| b.label().to_string()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session length buckets
// ─────────────────────────────────────────────────────────────────────────────

/// Half-open duration ranges: [0,2), [2,3), [3,4), [4,inf)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthBucket {
    UnderTwo,
    TwoToThree,
    ThreeToFour,
    FourPlus,
}

impl LengthBucket {
    pub fn from_hours(hours: f64) -> Option<Self> {
        if hours.is_nan() || hours < 0.0 {
            None
        } else if hours < 2.0 {
            Some(Self::UnderTwo)
        } else if hours < 3.0 {
            Some(Self::TwoToThree)
        } else if hours < 4.0 {
            Some(Self::ThreeToFour)
        } else {
            Some(Self::FourPlus)
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::UnderTwo => "0-2h",
            Self::TwoToThree => "2-3h",
            Self::ThreeToFour => "3-4h",
            Self::FourPlus => "4h+",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Buckets
// ─────────────────────────────────────────────────────────────────────────────

/// Reduced totals for one group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateBucket {
    pub count: usize,
    pub total_profit: f64,
    pub total_hours: f64,
    pub hourly: Option<f64>,
    pub mean_profit: f64,
}

/// One group in first-seen order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupEntry {
    pub key: String,
    #[serde(flatten)]
    pub bucket: AggregateBucket,
}

#[derive(Default)]
struct Accumulator {
    count: usize,
    total_profit: f64,
    total_hours: f64,
}

impl Accumulator {
    fn add(&mut self, session: &DerivedSession<'_>) {
        self.count += 1;
        self.total_profit += session.profit;
        if let Some(hours) = session.hours() {
            self.total_hours += hours;
        }
    }

    fn finish(self) -> AggregateBucket {
        let hourly = (self.total_hours > 0.0).then(|| self.total_profit / self.total_hours);
        AggregateBucket {
            count: self.count,
            total_profit: self.total_profit,
            total_hours: self.total_hours,
            hourly,
            mean_profit: self.total_profit / self.count as f64,
        }
    }
}

/// Group sessions by `dimension` in a single pass
pub fn group_by(sessions: &[DerivedSession<'_>], dimension: Dimension) -> Vec<GroupEntry> {
    let mut order: Vec<(String, Accumulator)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for session in sessions {
        let Some(key) = dimension.key_of(session) else {
            continue;
        };
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                index.insert(key.clone(), order.len());
                order.push((key, Accumulator::default()));
                order.len() - 1
            }
        };
        order[slot].1.add(session);
    }

    order
        .into_iter()
        .map(|(key, acc)| GroupEntry {
            key,
            bucket: acc.finish(),
        })
        .collect()
}
