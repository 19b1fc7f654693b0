use crate::config::Config;
use crate::presentation::Locale;
use crate::rules::{ConsultationPolicy, UsageThresholds};

/// Policy and display choices applied when turning snapshots into views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSettings {
    pub policy: ConsultationPolicy,
    pub thresholds: UsageThresholds,
    pub locale: Locale,
    pub currency: String,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            policy: ConsultationPolicy::default(),
            thresholds: UsageThresholds::default(),
            locale: Locale::En,
            currency: "USD".to_string(),
        }
    }
}

impl From<&Config> for ViewSettings {
    fn from(config: &Config) -> Self {
        Self {
            policy: ConsultationPolicy::from(&config.rules),
            thresholds: UsageThresholds::from(&config.rules),
            locale: config.display.locale,
            currency: config.display.currency.clone(),
        }
    }
}

impl ViewSettings {
    /// Same settings with a caller-requested locale, if any.
    pub fn localized(&self, locale: Option<Locale>) -> Self {
        Self {
            locale: locale.unwrap_or(self.locale),
            ..self.clone()
        }
    }
}
