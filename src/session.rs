// Session model - one logged poker session
//
// Sessions are the only input to the analytics engine. The raw fields live
// here; profit and hourly rate are always derived (see analytics::derived)
// and never persisted. Shape validation happens once, at the repository
// boundary, through SessionDraft and SessionPatch.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Location used when none is recorded
pub const UNKNOWN_LOCATION: &str = "Unknown";

// ─────────────────────────────────────────────────────────────────────────────
// Enumerations
// ─────────────────────────────────────────────────────────────────────────────

/// Game format of a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameFormat {
    #[default]
    Cash,
    Tournament,
    Sng,
}

impl GameFormat {
    /// Parse a format string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Some(Self::Cash),
            "tournament" | "mtt" => Some(Self::Tournament),
            "sng" | "sit-n-go" | "sitngo" => Some(Self::Sng),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Tournament => "tournament",
            Self::Sng => "sng",
        }
    }
}

/// Playstyle classification attached to a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleTag {
    #[serde(rename = "TAG")]
    Tag,
    #[serde(rename = "LAG")]
    Lag,
    #[serde(rename = "NIT")]
    Nit,
    Manic,
}

impl StyleTag {
    /// Parse a style tag (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "tag" => Some(Self::Tag),
            "lag" => Some(Self::Lag),
            "nit" => Some(Self::Nit),
            "manic" => Some(Self::Manic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tag => "TAG",
            Self::Lag => "LAG",
            Self::Nit => "NIT",
            Self::Manic => "Manic",
        }
    }
}

impl fmt::Display for StyleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Validation
// ─────────────────────────────────────────────────────────────────────────────

/// A session field failed boundary validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.field, self.reason)
    }
}

impl std::error::Error for ValidationError {}

// ─────────────────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────────────────

/// One logged poker session (raw fields only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredSession")]
pub struct Session {
    pub date: DateTime<Utc>,
    pub game: String,
    pub stake: Option<String>,
    pub format: GameFormat,
    pub location: String,
    pub buy_in: f64,
    pub cash_out: f64,
    pub hours_played: Option<f64>,
    pub bullets: u32,
    pub tag: Option<StyleTag>,
    pub notes: String,
}

impl Session {
    /// Check the record against the session contract
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.game.trim().is_empty() {
            return Err(ValidationError::new("game", "must not be empty"));
        }
        check_amount("buy_in", self.buy_in)?;
        check_amount("cash_out", self.cash_out)?;
        if let Some(hours) = self.hours_played {
            if !hours.is_finite() || hours <= 0.0 {
                return Err(ValidationError::new(
                    "hours_played",
                    format!("must be a positive number, got {}", hours),
                ));
            }
        }
        if self.bullets < 1 {
            return Err(ValidationError::new("bullets", "must be at least 1"));
        }
        Ok(())
    }

    /// Apply a partial update. The session is left untouched if the result
    /// would not validate.
    pub fn apply(&mut self, patch: SessionPatch) -> Result<(), ValidationError> {
        let mut next = self.clone();

        if let Some(game) = patch.game {
            next.game = game;
        }
        if let Some(stake) = patch.stake {
            next.stake = stake.filter(|s| !s.trim().is_empty());
        }
        if let Some(format) = patch.format {
            next.format = match format {
                Some(raw) => parse_format(&raw)?,
                None => GameFormat::default(),
            };
        }
        if let Some(location) = patch.location {
            next.location = normalize_location(location);
        }
        if let Some(buy_in) = patch.buy_in {
            next.buy_in = buy_in;
        }
        if let Some(cash_out) = patch.cash_out {
            next.cash_out = cash_out;
        }
        if let Some(hours) = patch.hours_played {
            next.hours_played = hours;
        }
        if let Some(bullets) = patch.bullets {
            next.bullets = bullets;
        }
        if let Some(tag) = patch.tag {
            next.tag = parse_tag(tag.as_deref())?;
        }
        if let Some(notes) = patch.notes {
            next.notes = notes;
        }
        if let Some(date) = patch.date {
            next.date = date;
        }

        next.validate()?;
        *self = next;
        Ok(())
    }
}

fn check_amount(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::new(
            field,
            format!("must be a non-negative number, got {}", value),
        ));
    }
    Ok(())
}

fn normalize_location(location: String) -> String {
    if location.trim().is_empty() {
        UNKNOWN_LOCATION.to_string()
    } else {
        location
    }
}

fn parse_format(raw: &str) -> Result<GameFormat, ValidationError> {
    if raw.trim().is_empty() {
        return Ok(GameFormat::default());
    }
    GameFormat::parse(raw)
        .ok_or_else(|| ValidationError::new("format", format!("unknown format '{}'", raw)))
}

fn parse_tag(raw: Option<&str>) -> Result<Option<StyleTag>, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => StyleTag::parse(s)
            .map(Some)
            .ok_or_else(|| ValidationError::new("tag", format!("unknown style tag '{}'", s))),
    }
}

/// Guess the stake from a game name: "0.10/0.20 NLH" -> "0.10/0.20"
pub fn infer_stake(game: &str) -> Option<String> {
    game.split_whitespace()
        .next()
        .filter(|first| first.contains('/'))
        .map(String::from)
}

// ─────────────────────────────────────────────────────────────────────────────
// Stored representation (lenient reader for the data file)
// ─────────────────────────────────────────────────────────────────────────────

/// On-disk session shape. Older files store naive timestamps, nulls for
/// defaulted fields and free-text tags, so everything is optional here.
#[derive(Debug, Deserialize)]
struct StoredSession {
    #[serde(default, deserialize_with = "deserialize_date")]
    date: Option<DateTime<Utc>>,
    #[serde(default)]
    game: Option<String>,
    #[serde(default)]
    stake: Option<String>,
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    buy_in: Option<f64>,
    #[serde(default)]
    cash_out: Option<f64>,
    #[serde(default)]
    hours_played: Option<f64>,
    #[serde(default)]
    bullets: Option<u32>,
    #[serde(default)]
    tag: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

impl TryFrom<StoredSession> for Session {
    type Error = ValidationError;

    fn try_from(raw: StoredSession) -> Result<Self, Self::Error> {
        let session = Session {
            // Undated records are stamped with the load time
            date: raw.date.unwrap_or_else(Utc::now),
            game: raw.game.unwrap_or_default(),
            stake: raw.stake.filter(|s| !s.trim().is_empty()),
            format: raw
                .format
                .as_deref()
                .and_then(GameFormat::parse)
                .unwrap_or_default(),
            location: normalize_location(raw.location.unwrap_or_default()),
            buy_in: raw.buy_in.unwrap_or(0.0),
            cash_out: raw.cash_out.unwrap_or(0.0),
            hours_played: raw.hours_played.filter(|h| *h > 0.0),
            bullets: raw.bullets.unwrap_or(1),
            // Free-text tags from older files are dropped rather than rejected
            tag: raw.tag.as_deref().and_then(StyleTag::parse),
            notes: raw.notes.unwrap_or_default(),
        };
        session.validate()?;
        Ok(session)
    }
}

/// Accept RFC 3339 timestamps as well as naive ISO timestamps (taken as UTC)
fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc()))
        .map_err(serde::de::Error::custom)
}

/// Distinguish "field absent" (outer None) from "field null" (Some(None))
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

// ─────────────────────────────────────────────────────────────────────────────
// Create / update payloads
// ─────────────────────────────────────────────────────────────────────────────

/// Input for creating a session
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionDraft {
    pub game: String,
    pub buy_in: f64,
    pub cash_out: f64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub hours_played: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stake: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub bullets: Option<u32>,
    #[serde(default)]
    pub tag: Option<String>,
}

impl SessionDraft {
    /// Build a validated session, filling defaults. `now` stamps sessions
    /// created without a date.
    pub fn into_session(self, now: DateTime<Utc>) -> Result<Session, ValidationError> {
        let stake = self
            .stake
            .filter(|s| !s.trim().is_empty())
            .or_else(|| infer_stake(&self.game));

        let session = Session {
            date: self.date.unwrap_or(now),
            stake,
            format: parse_format(self.format.as_deref().unwrap_or_default())?,
            location: normalize_location(self.location.unwrap_or_default()),
            buy_in: self.buy_in,
            cash_out: self.cash_out,
            hours_played: self.hours_played,
            bullets: self.bullets.unwrap_or(1),
            tag: parse_tag(self.tag.as_deref())?,
            notes: self.notes.unwrap_or_default(),
            game: self.game,
        };
        session.validate()?;
        Ok(session)
    }
}

/// Partial update for an existing session
///
/// Outer `None` means "leave unchanged"; for nullable fields `Some(None)`
/// clears the value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionPatch {
    #[serde(default)]
    pub game: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub stake: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub format: Option<Option<String>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub buy_in: Option<f64>,
    #[serde(default)]
    pub cash_out: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    pub hours_played: Option<Option<f64>>,
    #[serde(default)]
    pub bullets: Option<u32>,
    #[serde(default, deserialize_with = "double_option")]
    pub tag: Option<Option<String>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}
