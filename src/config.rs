use crate::presentation::Locale;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

/// Booking policy knobs used by the consultation predicates and usage accounting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RulesConfig {
    /// Cancellation is allowed only while the lead time is strictly greater than this.
    pub cancellation_notice_hours: i64,
    pub early_join_minutes: i64,
    /// `low_usage` fires when `0 < remaining <= low_remaining_threshold`.
    pub low_remaining_threshold: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            cancellation_notice_hours: 24,
            early_join_minutes: 15,
            low_remaining_threshold: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    pub locale: Locale,
    /// Fallback ISO-4217 code for snapshots that omit a currency.
    pub currency: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            locale: Locale::En,
            currency: "USD".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        let mut config: Config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Self::parse(&config_str)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // No file: the upstream URL must come from the environment.
                let base_url = env::var("UPSTREAM_BASE_URL").map_err(|_| {
                    "UPSTREAM_BASE_URL is not set and no config.toml was found"
                })?;

                Config {
                    server: ServerConfig {
                        host: "0.0.0.0".to_string(),
                        port: 8080,
                    },
                    upstream: UpstreamConfig {
                        base_url,
                        timeout_secs: default_timeout_secs(),
                    },
                    rules: RulesConfig::default(),
                    display: DisplayConfig::default(),
                }
            }
            Err(e) => {
                return Err(format!("cannot read config file {config_path}: {e}").into());
            }
        };

        config.apply_env_overrides(|name| env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn parse(config_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        toml::from_str(config_str).map_err(|e| format!("failed to parse config file: {e}").into())
    }

    /// Environment variables win over file values.
    pub fn apply_env_overrides<F>(&mut self, get_env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = get_env("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(v) = get_env("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Some(v) = get_env("UPSTREAM_BASE_URL") {
            self.upstream.base_url = v;
        }
        if let Some(v) = get_env("UPSTREAM_TIMEOUT_SECS")
            && let Ok(n) = v.parse()
        {
            self.upstream.timeout_secs = n;
        }
        if let Some(v) = get_env("RULES_CANCELLATION_NOTICE_HOURS")
            && let Ok(n) = v.parse()
        {
            self.rules.cancellation_notice_hours = n;
        }
        if let Some(v) = get_env("RULES_EARLY_JOIN_MINUTES")
            && let Ok(n) = v.parse()
        {
            self.rules.early_join_minutes = n;
        }
        if let Some(v) = get_env("RULES_LOW_REMAINING_THRESHOLD")
            && let Ok(n) = v.parse()
        {
            self.rules.low_remaining_threshold = n;
        }
        if let Some(v) = get_env("DISPLAY_LOCALE") {
            match v.parse() {
                Ok(locale) => self.display.locale = locale,
                Err(_) => log::warn!("Ignoring unknown DISPLAY_LOCALE {v:?}"),
            }
        }
        if let Some(v) = get_env("DISPLAY_CURRENCY") {
            self.display.currency = v.to_ascii_uppercase();
        }
    }

    fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.upstream.base_url.trim().is_empty() {
            return Err("upstream.base_url must not be empty".into());
        }
        if self.rules.cancellation_notice_hours < 0 || self.rules.early_join_minutes < 0 {
            return Err("rules windows must not be negative".into());
        }
        if TimeDelta::try_hours(self.rules.cancellation_notice_hours).is_none() {
            return Err(format!(
                "rules.cancellation_notice_hours is out of range: {}",
                self.rules.cancellation_notice_hours
            )
            .into());
        }
        if TimeDelta::try_minutes(self.rules.early_join_minutes).is_none() {
            return Err(format!(
                "rules.early_join_minutes is out of range: {}",
                self.rules.early_join_minutes
            )
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SAMPLE: &str = r#"
[server]
host = "127.0.0.1"
port = 9000

[upstream]
base_url = "https://api.example.test/v1"
"#;

    #[test]
    fn test_parse_applies_section_defaults() {
        let config = Config::parse(SAMPLE).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.upstream.timeout_secs, 10);
        assert_eq!(config.rules, RulesConfig::default());
        assert_eq!(config.display.locale, Locale::En);
        assert_eq!(config.display.currency, "USD");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::parse(SAMPLE).unwrap();
        let vars: HashMap<&str, &str> = [
            ("SERVER_PORT", "8181"),
            ("RULES_CANCELLATION_NOTICE_HOURS", "48"),
            ("RULES_LOW_REMAINING_THRESHOLD", "3"),
            ("DISPLAY_LOCALE", "ru"),
            ("DISPLAY_CURRENCY", "eur"),
            ("RULES_EARLY_JOIN_MINUTES", "not-a-number"),
        ]
        .into_iter()
        .collect();

        config.apply_env_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.server.port, 8181);
        assert_eq!(config.rules.cancellation_notice_hours, 48);
        assert_eq!(config.rules.low_remaining_threshold, 3);
        assert_eq!(config.rules.early_join_minutes, 15);
        assert_eq!(config.display.locale, Locale::Ru);
        assert_eq!(config.display.currency, "EUR");
    }

    #[test]
    fn test_validate_rejects_empty_upstream() {
        let mut config = Config::parse(SAMPLE).unwrap();
        config.upstream.base_url = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_windows() {
        let mut config = Config::parse(SAMPLE).unwrap();
        config.apply_env_overrides(|name| {
            (name == "RULES_CANCELLATION_NOTICE_HOURS").then(|| "10000000000000".to_string())
        });
        assert_eq!(config.rules.cancellation_notice_hours, 10_000_000_000_000);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cancellation_notice_hours"));

        let mut config = Config::parse(SAMPLE).unwrap();
        config.rules.early_join_minutes = i64::MAX;
        assert!(config.validate().is_err());

        let config = Config::parse(SAMPLE).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_accepts_region_locale() {
        let config = Config::parse(&format!("{SAMPLE}\n[display]\nlocale = \"ru-RU\"\n")).unwrap();
        assert_eq!(config.display.locale, Locale::Ru);
    }
}
