// Demo data: a realistic starter history for a fresh install
//
// Seeded into the data file when none exists yet, so the dashboard and the
// report have something to show before the first real session is logged.
// Twenty micro-stakes cash sessions, one per day from 2025-01-01.
//
// Disable with `[analytics] seed_demo_data = false`.

use crate::session::{infer_stake, GameFormat, Session, StyleTag};
use chrono::{Duration, TimeZone, Utc};

/// 2025-01-01T00:00:00Z
const FIRST_DEMO_DAY: i64 = 1_735_689_600;

// game, buy_in, cash_out, location, hours, bullets, tag, notes
type DemoRow = (
    &'static str,
    f64,
    f64,
    &'static str,
    f64,
    u32,
    Option<StyleTag>,
    &'static str,
);

const DEMO_ROWS: [DemoRow; 20] = [
    ("0.10/0.20 NLH", 20.0, 42.0, "Online", 2.5, 1, Some(StyleTag::Tag), "Ran hot vs calling station"),
    ("0.10/0.20 NLH", 20.0, 8.0, "Online", 1.8, 2, Some(StyleTag::Manic), "Spewed in 3-bet pot"),
    ("0.10/0.20 NLH", 20.0, 24.0, "IRL", 2.0, 1, Some(StyleTag::Tag), "Home game, small win"),
    ("0.10/0.20 NLH", 20.0, 65.0, "Online", 3.1, 1, Some(StyleTag::Tag), "Hit a set multiway"),
    ("0.10/0.20 NLH", 20.0, 0.0, "IRL", 1.2, 2, Some(StyleTag::Manic), "Coolered set over set"),
    ("0.10/0.20 NLH", 20.0, 30.0, "Online", 1.5, 1, Some(StyleTag::Tag), "Solid session, few big pots"),
    ("0.10/0.20 NLH", 20.0, 18.0, "Online", 1.0, 1, Some(StyleTag::Nit), "Card dead but stayed even"),
    ("0.10/0.20 NLH", 20.0, 55.0, "IRL", 3.0, 1, Some(StyleTag::Lag), "Good table, lots of limpers"),
    ("0.10/0.20 NLH", 20.0, 10.0, "Online", 1.4, 1, Some(StyleTag::Manic), "Bluffed off in bad spot"),
    ("0.10/0.20 NLH", 20.0, 40.0, "Online", 2.2, 1, Some(StyleTag::Nit), "Played tight, got paid"),
    ("0.25/0.50 NLH", 50.0, 120.0, "IRL", 3.5, 1, Some(StyleTag::Lag), "Deep stack, big bluff got through"),
    ("0.25/0.50 NLH", 50.0, 30.0, "IRL", 2.0, 2, Some(StyleTag::Lag), "Lost a flip, clawed back a bit"),
    ("0.25/0.50 NLH", 50.0, 95.0, "Online", 2.8, 1, Some(StyleTag::Tag), "Table full of recreationals"),
    ("0.25/0.50 NLH", 50.0, 10.0, "Online", 1.9, 1, Some(StyleTag::Manic), "Bad hero call river"),
    ("0.25/0.50 NLH", 50.0, 140.0, "IRL", 4.0, 1, Some(StyleTag::Lag), "Crushed home game"),
    ("0.10/0.20 PLO", 20.0, 50.0, "Online", 1.7, 1, Some(StyleTag::Lag), "Wild game, lots of variance"),
    ("0.10/0.20 PLO", 20.0, 5.0, "Online", 1.3, 2, None, "Tried PLO, got punished"),
    ("0.10/0.20 NLH", 20.0, 60.0, "Online", 2.6, 1, Some(StyleTag::Tag), "Good focus, few mistakes"),
    ("0.10/0.20 NLH", 20.0, 16.0, "IRL", 1.5, 1, None, "Short session before class"),
    ("0.10/0.20 NLH", 20.0, 70.0, "Online", 3.2, 1, Some(StyleTag::Tag), "Crushed regs, ran well"),
];

/// Build the demo history, one session per day
pub fn demo_sessions() -> Vec<Session> {
    let first_day = Utc
        .timestamp_opt(FIRST_DEMO_DAY, 0)
        .single()
        .unwrap_or_else(Utc::now);

    DEMO_ROWS
        .iter()
        .enumerate()
        .map(
            |(i, &(game, buy_in, cash_out, location, hours, bullets, tag, notes))| Session {
                date: first_day + Duration::days(i as i64),
                game: game.to_string(),
                stake: infer_stake(game),
                format: GameFormat::Cash,
                location: location.to_string(),
                buy_in,
                cash_out,
                hours_played: Some(hours),
                bullets,
                tag,
                notes: notes.to_string(),
            },
        )
        .collect()
}
