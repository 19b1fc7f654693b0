use crate::models::{ConsultationStatus, PaymentStatus, SubscriptionStatus};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en_us" => Ok(Locale::En),
            "ru" | "ru-ru" | "ru_ru" => Ok(Locale::Ru),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

impl TryFrom<String> for Locale {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Color tokens understood by the UI badge component.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Blue,
    Green,
    Yellow,
    Orange,
    Red,
    Gray,
    Purple,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, ToSchema)]
pub struct StatusBadge {
    pub label: &'static str,
    pub color: BadgeColor,
}

impl StatusBadge {
    const fn new(label: &'static str, color: BadgeColor) -> Self {
        Self { label, color }
    }
}

pub trait StatusPresentation {
    fn badge(&self, locale: Locale) -> StatusBadge;

    fn label(&self, locale: Locale) -> &'static str {
        self.badge(locale).label
    }

    fn color(&self) -> BadgeColor {
        self.badge(Locale::En).color
    }
}

impl StatusPresentation for ConsultationStatus {
    fn badge(&self, locale: Locale) -> StatusBadge {
        use BadgeColor::*;
        use ConsultationStatus::*;
        let (en, ru, color) = match self {
            Pending => ("Pending", "Ожидает подтверждения", Yellow),
            Confirmed => ("Confirmed", "Подтверждена", Blue),
            Scheduled => ("Scheduled", "Запланирована", Blue),
            InProgress => ("In progress", "Идёт", Purple),
            Completed => ("Completed", "Завершена", Green),
            Cancelled => ("Cancelled", "Отменена", Red),
            NoShow => ("No-show", "Неявка", Orange),
        };
        StatusBadge::new(pick(locale, en, ru), color)
    }
}

impl StatusPresentation for SubscriptionStatus {
    fn badge(&self, locale: Locale) -> StatusBadge {
        use BadgeColor::*;
        use SubscriptionStatus::*;
        let (en, ru, color) = match self {
            Active => ("Active", "Активна", Green),
            Paused => ("Paused", "Приостановлена", Yellow),
            Cancelled => ("Cancelled", "Отменена", Red),
            Expired => ("Expired", "Истекла", Gray),
            Pending => ("Pending", "Ожидает оплаты", Orange),
        };
        StatusBadge::new(pick(locale, en, ru), color)
    }
}

impl StatusPresentation for PaymentStatus {
    fn badge(&self, locale: Locale) -> StatusBadge {
        use BadgeColor::*;
        use PaymentStatus::*;
        let (en, ru, color) = match self {
            Pending => ("Pending", "Ожидает", Yellow),
            Processing => ("Processing", "Обрабатывается", Blue),
            Succeeded => ("Paid", "Оплачено", Green),
            Failed => ("Failed", "Ошибка оплаты", Red),
            Refunded => ("Refunded", "Возвращено", Purple),
            Cancelled => ("Cancelled", "Отменено", Gray),
        };
        StatusBadge::new(pick(locale, en, ru), color)
    }
}

fn pick(locale: Locale, en: &'static str, ru: &'static str) -> &'static str {
    match locale {
        Locale::En => en,
        Locale::Ru => ru,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const LOCALES: [Locale; 2] = [Locale::En, Locale::Ru];

    fn assert_total<S: StatusPresentation + Copy + std::fmt::Debug>(all: &[S]) {
        for locale in LOCALES {
            let labels: HashSet<_> = all.iter().map(|s| s.label(locale)).collect();
            assert_eq!(labels.len(), all.len(), "duplicate label in {locale:?}");
            for status in all {
                assert!(!status.label(locale).is_empty(), "{status:?}");
            }
        }
    }

    #[test]
    fn test_every_status_has_a_distinct_label() {
        assert_total(&ConsultationStatus::ALL);
        assert_total(&SubscriptionStatus::ALL);
        assert_total(&PaymentStatus::ALL);
    }

    #[test]
    fn test_color_does_not_depend_on_locale() {
        for status in ConsultationStatus::ALL {
            assert_eq!(
                status.badge(Locale::En).color,
                status.badge(Locale::Ru).color
            );
        }
    }

    #[test]
    fn test_known_badges() {
        assert_eq!(
            ConsultationStatus::Completed.badge(Locale::En),
            StatusBadge::new("Completed", BadgeColor::Green)
        );
        assert_eq!(SubscriptionStatus::Paused.color(), BadgeColor::Yellow);
        assert_eq!(PaymentStatus::Succeeded.label(Locale::Ru), "Оплачено");
    }

    #[test]
    fn test_locale_parsing() {
        assert_eq!("EN-us".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("ru".parse::<Locale>().unwrap(), Locale::Ru);

        let region: Locale = serde_json::from_str("\"en-US\"").unwrap();
        assert_eq!(region, Locale::En);
        assert!(serde_json::from_str::<Locale>("\"de\"").is_err());
        assert_eq!(serde_json::to_string(&Locale::Ru).unwrap(), "\"ru\"");
        assert!("de".parse::<Locale>().is_err());
    }
}
