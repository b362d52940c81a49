//! Session builders shared by the analytics tests

use crate::session::{GameFormat, Session, StyleTag};
use chrono::{DateTime, Duration, TimeZone, Utc};

fn day(offset: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap() + Duration::days(offset)
}

/// Cash session at a fixed date with one bullet
pub fn session(buy_in: f64, cash_out: f64, hours: Option<f64>) -> Session {
    Session {
        date: day(0),
        game: "0.10/0.20 NLH".to_string(),
        stake: Some("0.10/0.20".to_string()),
        format: GameFormat::Cash,
        location: "Online".to_string(),
        buy_in,
        cash_out,
        hours_played: hours,
        bullets: 1,
        tag: None,
        notes: String::new(),
    }
}

pub fn with_game(game: &str, mut session: Session) -> Session {
    session.game = game.to_string();
    session
}

pub fn tagged(tag: StyleTag, mut session: Session) -> Session {
    session.tag = Some(tag);
    session
}

/// One session per profit, a day apart, without recorded hours
pub fn profits_to_sessions(profits: &[f64]) -> Vec<Session> {
    profits
        .iter()
        .enumerate()
        .map(|(i, profit)| {
            let mut s = session(100.0, 100.0 + profit, None);
            s.date = day(i as i64);
            s
        })
        .collect()
}
