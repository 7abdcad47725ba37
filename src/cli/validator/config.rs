use serde::{Deserialize, Serialize};
use std::{fs, io, path::PathBuf};

/// Configuration for the dashboard CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Slot duration of the network in seconds
    pub seconds_per_slot: u64,
    /// Delay before search input is applied to a log stream
    pub search_debounce_ms: u64,
    /// Records kept per log stream
    pub max_log_records: Option<usize>,
    /// Where user preferences such as the display currency are stored
    pub preferences_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seconds_per_slot: 12,
            search_debounce_ms: 500,
            max_log_records: Some(1000),
            preferences_path: Some(config_dir().join("preferences.json")),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_default()
        .join("validator-dashboard")
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self, io::Error> {
        let config_dir = config_dir();
        let config_path = config_dir.join("config.toml");

        if !config_path.exists() {
            // Create default config if it doesn't exist
            fs::create_dir_all(&config_dir)?;
            let default_config = Self::default();
            let toml = toml::to_string_pretty(&default_config)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            fs::write(&config_path, toml)?;
            return Ok(default_config);
        }

        let config_str = fs::read_to_string(&config_path)?;
        Self::parse(&config_str)
    }

    pub fn parse(config_str: &str) -> Result<Self, io::Error> {
        toml::from_str::<Config>(config_str)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.preferences_path
            .clone()
            .unwrap_or_else(|| config_dir().join("preferences.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = Config::parse("seconds_per_slot = 6\n").unwrap();
        assert_eq!(config.seconds_per_slot, 6);
        assert_eq!(config.search_debounce_ms, 500);
        assert_eq!(config.max_log_records, Some(1000));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(Config::parse("seconds_per_slot = \"twelve\"").is_err());
    }
}
