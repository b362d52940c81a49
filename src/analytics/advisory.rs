//! Advisory rules
//!
//! A fixed decision table evaluated top to bottom. Each row is a predicate
//! over the global totals plus a note template. Rows that share an exclusive
//! group behave like an else-if chain: once one fires, the rest of the group
//! is skipped. Rows without a group are evaluated unconditionally.

use super::stats::Totals;
use serde::Serialize;

/// Fewer sessions than this and results are mostly noise
pub const MIN_SAMPLE_SESSIONS: usize = 10;
/// Overall hourly above this counts as a strong result...
pub const STRONG_HOURLY: f64 = 8.0;
/// ...provided it is backed by at least this many hours
pub const STRONG_MIN_HOURS: f64 = 30.0;
/// Average bullets per session above this triggers the reload note
pub const RELOAD_RATIO: f64 = 1.5;

/// One advisory message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvisoryNote {
    /// Stable identifier of the rule that produced the note
    pub kind: &'static str,
    pub text: String,
}

struct Rule {
    kind: &'static str,
    group: Option<&'static str>,
    applies: fn(&Totals) -> bool,
    note: fn(&Totals) -> String,
}

const PERFORMANCE: &str = "performance";

const RULES: &[Rule] = &[
    Rule {
        kind: "low_sample",
        group: None,
        applies: is_low_sample,
        note: low_sample_note,
    },
    Rule {
        kind: "losing",
        group: Some(PERFORMANCE),
        applies: is_losing,
        note: losing_note,
    },
    Rule {
        kind: "strong",
        group: Some(PERFORMANCE),
        applies: is_strong,
        note: strong_note,
    },
    Rule {
        kind: "reload",
        group: None,
        applies: is_reloading,
        note: reload_note,
    },
];

fn is_low_sample(t: &Totals) -> bool {
    t.total_sessions < MIN_SAMPLE_SESSIONS
}

fn low_sample_note(t: &Totals) -> String {
    format!(
        "Small sample: only {} session(s) logged. At this size results are mostly \
         variance, so keep logging before drawing conclusions.",
        t.total_sessions
    )
}

fn is_losing(t: &Totals) -> bool {
    t.overall_hourly.is_some_and(|h| h < 0.0)
}

fn losing_note(t: &Totals) -> String {
    format!(
        "You are losing {:.2} per hour overall. Consider dropping down in stakes \
         and protecting the bankroll until the leak is found.",
        t.overall_hourly.unwrap_or_default().abs()
    )
}

fn is_strong(t: &Totals) -> bool {
    t.overall_hourly.is_some_and(|h| h > STRONG_HOURLY) && t.total_hours >= STRONG_MIN_HOURS
}

fn strong_note(t: &Totals) -> String {
    format!(
        "Strong results: {:+.2} per hour over {:.1} hours. Keep the same discipline; \
         a good run is not a reason to loosen bankroll rules.",
        t.overall_hourly.unwrap_or_default(),
        t.total_hours
    )
}

fn is_reloading(t: &Totals) -> bool {
    t.total_bullets as f64 > t.total_sessions as f64 * RELOAD_RATIO
}

fn reload_note(t: &Totals) -> String {
    format!(
        "Reload discipline: {} bullets fired across {} sessions. Set a hard \
         stop-loss before sitting down.",
        t.total_bullets, t.total_sessions
    )
}

const NO_RED_FLAGS: &str =
    "No red flags right now. Keep logging sessions and reviewing the big pots.";

/// Run the decision table; always returns at least one note
pub fn evaluate(totals: &Totals) -> Vec<AdvisoryNote> {
    let mut notes = Vec::new();
    let mut closed_groups: Vec<&'static str> = Vec::new();

    for rule in RULES {
        if rule.group.is_some_and(|g| closed_groups.contains(&g)) {
            continue;
        }
        if (rule.applies)(totals) {
            notes.push(AdvisoryNote {
                kind: rule.kind,
                text: (rule.note)(totals),
            });
            if let Some(group) = rule.group {
                closed_groups.push(group);
            }
        }
    }

    if notes.is_empty() {
        notes.push(AdvisoryNote {
            kind: "no_red_flags",
            text: NO_RED_FLAGS.to_string(),
        });
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(sessions: usize, hourly: Option<f64>, hours: f64, bullets: u64) -> Totals {
        Totals {
            total_sessions: sessions,
            total_profit: hourly.unwrap_or_default() * hours,
            total_hours: hours,
            overall_hourly: hourly,
            winrate: None,
            total_bullets: bullets,
        }
    }

    fn kinds(notes: &[AdvisoryNote]) -> Vec<&'static str> {
        notes.iter().map(|n| n.kind).collect()
    }

    #[test]
    fn test_small_losing_sample_fires_both() {
        for bullets in [5, 20] {
            let notes = evaluate(&totals(5, Some(-2.0), 10.0, bullets));
            let kinds = kinds(&notes);
            assert!(kinds.contains(&"low_sample"));
            assert!(kinds.contains(&"losing"));
            assert!(!kinds.contains(&"strong"));
        }
    }

    #[test]
    fn test_strong_requires_enough_hours() {
        assert_eq!(kinds(&evaluate(&totals(20, Some(9.0), 40.0, 20))), vec!["strong"]);
        assert_eq!(
            kinds(&evaluate(&totals(20, Some(9.0), 29.9, 20))),
            vec!["no_red_flags"]
        );
        // Exactly 8/h is not strictly greater
        assert_eq!(
            kinds(&evaluate(&totals(20, Some(8.0), 40.0, 20))),
            vec!["no_red_flags"]
        );
    }

    #[test]
    fn test_reload_is_independent() {
        let notes = evaluate(&totals(20, Some(-1.0), 40.0, 31));
        assert_eq!(kinds(&notes), vec!["losing", "reload"]);

        // 30 bullets over 20 sessions is exactly 1.5x and does not fire
        let notes = evaluate(&totals(20, Some(1.0), 40.0, 30));
        assert_eq!(kinds(&notes), vec!["no_red_flags"]);
    }

    #[test]
    fn test_notes_follow_declaration_order() {
        let notes = evaluate(&totals(4, Some(-3.0), 6.0, 10));
        assert_eq!(kinds(&notes), vec!["low_sample", "losing", "reload"]);
    }

    #[test]
    fn test_missing_hourly_skips_performance_rules() {
        let notes = evaluate(&totals(12, None, 0.0, 12));
        assert_eq!(kinds(&notes), vec!["no_red_flags"]);
        assert_eq!(notes[0].text, NO_RED_FLAGS);
    }

    #[test]
    fn test_empty_history_gets_low_sample_note() {
        let notes = evaluate(&totals(0, None, 0.0, 0));
        assert_eq!(kinds(&notes), vec!["low_sample"]);
    }

    #[test]
    fn test_losing_note_reports_rate() {
        let notes = evaluate(&totals(15, Some(-2.5), 20.0, 15));
        assert!(notes[0].text.contains("2.50 per hour"));
    }
}
