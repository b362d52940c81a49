//! Human-readable summary lines

use super::stats::Totals;

/// Summary in display order; optional lines are left out when undefined
pub fn summary_lines(totals: &Totals, starting_bankroll: f64) -> Vec<String> {
    let mut lines = vec![
        format!("Sessions: {}", totals.total_sessions),
        format!("Total profit: {:+.2}", totals.total_profit),
        format!(
            "Current bankroll: {:.2}",
            starting_bankroll + totals.total_profit
        ),
    ];

    if totals.total_hours > 0.0 {
        lines.push(format!("Total hours (recorded): {:.2}", totals.total_hours));
    }
    if let Some(hourly) = totals.overall_hourly {
        lines.push(format!("Overall hourly rate: {:+.2} per hour", hourly));
    }
    if let Some(winrate) = totals.winrate {
        lines.push(format!("Winrate: {:.1}% of sessions winning", winrate));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::derived::derive_all;
    use crate::analytics::testing::session;

    #[test]
    fn test_empty_history() {
        let totals = Totals::compute(&[]);
        assert_eq!(
            summary_lines(&totals, 0.0),
            vec!["Sessions: 0", "Total profit: +0.00", "Current bankroll: 0.00"]
        );
    }

    #[test]
    fn test_full_summary() {
        let sessions = vec![
            session(20.0, 42.0, Some(2.0)),
            session(20.0, 8.0, Some(2.0)),
        ];
        let derived = derive_all(&sessions);
        let lines = summary_lines(&Totals::compute(&derived), 500.0);

        assert_eq!(
            lines,
            vec![
                "Sessions: 2",
                "Total profit: +10.00",
                "Current bankroll: 510.00",
                "Total hours (recorded): 4.00",
                "Overall hourly rate: +2.50 per hour",
                "Winrate: 50.0% of sessions winning",
            ]
        );
    }

    #[test]
    fn test_losses_keep_sign() {
        let sessions = vec![session(50.0, 20.0, None)];
        let derived = derive_all(&sessions);
        let lines = summary_lines(&Totals::compute(&derived), 0.0);

        assert_eq!(lines[1], "Total profit: -30.00");
        assert_eq!(lines[2], "Current bankroll: -30.00");
        // No hours recorded, so neither hours nor hourly lines
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3], "Winrate: 0.0% of sessions winning");
    }
}
