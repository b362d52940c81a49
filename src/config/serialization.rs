//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Render the config as a commented TOML document
    pub fn to_toml(&self) -> String {
        format!(
            r#"# profitpulse configuration

# HTTP API bind address
bind_addr = "{bind}"

# Session history (JSON document, rewritten on every change)
data_file = "{data_file}"

# Analytics engine
[analytics]
# Bankroll before the first logged session
starting_bankroll = {bankroll:?}
# Trailing window for the bankroll chart's moving average
moving_average_window = {window}
# Seed 20 demo sessions when the data file does not exist yet
seed_demo_data = {seed}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# JSON file logging (in addition to stderr)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            bind = self.bind_addr,
            data_file = toml_path(&self.data_file),
            bankroll = self.analytics.starting_bankroll,
            window = self.analytics.moving_average_window,
            seed = self.analytics.seed_demo_data,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = toml_path(&self.logging.file_dir),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }
}

/// Paths go inside basic strings, so backslashes (Windows) need escaping
fn toml_path(path: &std::path::Path) -> String {
    path.display().to_string().replace('\\', "\\\\")
}
