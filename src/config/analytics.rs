//! Analytics configuration: bankroll seed, chart smoothing, demo data

use serde::Deserialize;

use crate::analytics::bankroll::DEFAULT_MOVING_AVERAGE_WINDOW;
use crate::analytics::Settings;

/// Engine and repository settings
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsConfig {
    /// Bankroll before the first session
    pub starting_bankroll: f64,
    /// Trailing window for the bankroll chart's moving average
    pub moving_average_window: usize,
    /// Seed the demo history when the data file does not exist
    pub seed_demo_data: bool,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            starting_bankroll: 0.0,
            moving_average_window: DEFAULT_MOVING_AVERAGE_WINDOW,
            seed_demo_data: true,
        }
    }
}

/// Analytics settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileAnalytics {
    pub starting_bankroll: Option<f64>,
    pub moving_average_window: Option<usize>,
    pub seed_demo_data: Option<bool>,
}

impl AnalyticsConfig {
    /// Create from file config with defaults. `bankroll_override` comes from
    /// the environment and wins over the file.
    pub fn from_file(file: Option<FileAnalytics>, bankroll_override: Option<f64>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        let starting_bankroll = match bankroll_override.or(file.starting_bankroll) {
            Some(amount) if amount.is_finite() && amount >= 0.0 => amount,
            Some(amount) => {
                eprintln!(
                    "Ignoring starting_bankroll = {}: must be a non-negative number",
                    amount
                );
                defaults.starting_bankroll
            }
            None => defaults.starting_bankroll,
        };

        Self {
            starting_bankroll,
            moving_average_window: file
                .moving_average_window
                .unwrap_or(defaults.moving_average_window),
            seed_demo_data: file.seed_demo_data.unwrap_or(defaults.seed_demo_data),
        }
    }

    /// Parameters handed to the analytics engine
    pub fn settings(&self) -> Settings {
        Settings {
            starting_bankroll: self.starting_bankroll,
            moving_average_window: self.moving_average_window,
        }
    }
}
