//! CSV export of the session history.
//!
//! One row per session in repository order, raw fields plus the derived
//! profit and hourly rate. Absent values are written as empty cells.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::analytics::DerivedSession;
use crate::session::Session;

/// Column order of the export.
pub const HEADER: [&str; 13] = [
    "date",
    "game",
    "stake",
    "format",
    "location",
    "buy_in",
    "cash_out",
    "profit",
    "hours_played",
    "hourly_rate",
    "bullets",
    "tag",
    "notes",
];

#[derive(Serialize)]
struct CsvRow<'a> {
    date: String,
    game: &'a str,
    stake: Option<&'a str>,
    format: &'static str,
    location: &'a str,
    buy_in: f64,
    cash_out: f64,
    profit: f64,
    hours_played: Option<f64>,
    hourly_rate: Option<f64>,
    bullets: u32,
    tag: Option<&'static str>,
    notes: &'a str,
}

impl<'a> CsvRow<'a> {
    fn new(session: &'a Session) -> Self {
        let derived = DerivedSession::new(session);
        Self {
            date: session.date.to_rfc3339(),
            game: &session.game,
            stake: session.stake.as_deref(),
            format: session.format.as_str(),
            location: &session.location,
            buy_in: session.buy_in,
            cash_out: session.cash_out,
            profit: derived.profit,
            hours_played: session.hours_played,
            hourly_rate: derived.hourly_rate,
            bullets: session.bullets,
            tag: session.tag.map(|t| t.as_str()),
            notes: &session.notes,
        }
    }
}

/// Writes the header and one row per session.
pub fn write_csv<W: Write>(sessions: &[Session], out: W) -> Result<()> {
    // Header is written by hand so an empty history still gets one
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);

    writer
        .write_record(HEADER)
        .context("Failed to write CSV header")?;
    for session in sessions {
        writer
            .serialize(CsvRow::new(session))
            .context("Failed to write CSV row")?;
    }
    writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Renders the export into a string.
pub fn to_csv_string(sessions: &[Session]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(sessions, &mut buf)?;
    String::from_utf8(buf).context("CSV output was not valid UTF-8")
}
