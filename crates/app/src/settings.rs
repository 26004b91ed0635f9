use std::str::FromStr;

use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/dhanvikas.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    /// IANA name; dates are bucketed by year and month in this zone.
    pub timezone: String,
    pub session_path: String,
    pub level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timezone: "UTC".to_string(),
            session_path: "config/session.json".to_string(),
            level: "info".to_string(),
        }
    }
}

/// Command-line overrides, applied after the file and the environment.
#[derive(Debug, Default, clap::Args)]
pub struct Overrides {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override the API base URL (e.g. http://localhost:5000).
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    /// Override the timezone (IANA name).
    #[arg(long, global = true)]
    pub timezone: Option<String>,
    /// Override the log level (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    pub level: Option<String>,
}

impl Settings {
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let config_path = overrides.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let mut settings: Settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("DHANVIKAS"))
            .build()?
            .try_deserialize()?;

        if let Some(base_url) = &overrides.base_url {
            settings.base_url = base_url.clone();
        }
        if let Some(timezone) = &overrides.timezone {
            settings.timezone = timezone.clone();
        }
        if let Some(level) = &overrides.level {
            settings.level = level.clone();
        }

        Ok(settings)
    }

    pub fn tz(&self) -> Result<Tz> {
        Tz::from_str(self.timezone.trim()).map_err(|_| AppError::Timezone(self.timezone.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_over_defaults() {
        let overrides = Overrides {
            config: Some("does/not/exist.toml".to_string()),
            base_url: Some("http://api.example.com".to_string()),
            timezone: Some("Asia/Kolkata".to_string()),
            level: None,
        };
        let settings = Settings::load(&overrides).unwrap();
        assert_eq!(settings.base_url, "http://api.example.com");
        assert_eq!(settings.tz().unwrap(), chrono_tz::Asia::Kolkata);
        assert_eq!(settings.session_path, "config/session.json");
    }

    #[test]
    fn bad_timezone_is_reported() {
        let settings = Settings {
            timezone: "Mars/Olympus".to_string(),
            ..Settings::default()
        };
        assert!(matches!(settings.tz(), Err(AppError::Timezone(name)) if name == "Mars/Olympus"));
    }
}
