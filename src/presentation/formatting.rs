use super::Locale;
use chrono::{DateTime, Duration, TimeZone};

/// Currencies without a minor unit.
const ZERO_DECIMAL: [&str; 3] = ["JPY", "KRW", "VND"];

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "RUB" => Some("₽"),
        "UAH" => Some("₴"),
        "JPY" => Some("¥"),
        _ => None,
    }
}

fn group_thousands(digits: &str, sep: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

/// Formats an amount in minor units, e.g. `123450, "USD"` → `$1,234.50`
/// (en) or `1 234,50 $` (ru).
pub fn format_money(amount_minor: i64, currency: &str, locale: Locale) -> String {
    let code = currency.to_ascii_uppercase();
    let (thousands, decimal) = match locale {
        Locale::En => (',', '.'),
        Locale::Ru => ('\u{a0}', ','),
    };

    let sign = if amount_minor < 0 { "-" } else { "" };
    let abs = amount_minor.unsigned_abs();
    let number = if ZERO_DECIMAL.contains(&code.as_str()) {
        group_thousands(&abs.to_string(), thousands)
    } else {
        format!(
            "{}{decimal}{:02}",
            group_thousands(&(abs / 100).to_string(), thousands),
            abs % 100
        )
    };

    match (locale, currency_symbol(&code)) {
        (Locale::En, Some(symbol)) => format!("{sign}{symbol}{number}"),
        (Locale::Ru, Some(symbol)) => format!("{sign}{number}\u{a0}{symbol}"),
        (_, None) => format!("{sign}{number} {code}"),
    }
}

pub fn format_duration(minutes: u32, locale: Locale) -> String {
    let (h_unit, m_unit) = match locale {
        Locale::En => ("h", "min"),
        Locale::Ru => ("ч", "мин"),
    };
    let (hours, mins) = (minutes / 60, minutes % 60);
    match (hours, mins) {
        (0, m) => format!("{m} {m_unit}"),
        (h, 0) => format!("{h} {h_unit}"),
        (h, m) => format!("{h} {h_unit} {m} {m_unit}"),
    }
}

pub fn format_datetime<Tz: TimeZone>(dt: &DateTime<Tz>, locale: Locale) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match locale {
        Locale::En => dt.format("%b %-d, %Y %H:%M").to_string(),
        Locale::Ru => dt.format("%d.%m.%Y %H:%M").to_string(),
    }
}

pub fn format_date<Tz: TimeZone>(dt: &DateTime<Tz>, locale: Locale) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match locale {
        Locale::En => dt.format("%b %-d, %Y").to_string(),
        Locale::Ru => dt.format("%d.%m.%Y").to_string(),
    }
}

/// "in 3 h", "2 days ago". Uses the largest whole unit.
pub fn format_relative(delta: Duration, locale: Locale) -> String {
    let future = delta >= Duration::zero();
    let abs = if future { delta } else { -delta };

    let (amount, unit) = if abs.num_days() >= 1 {
        let d = abs.num_days();
        (d, match locale {
            Locale::En if d == 1 => "day",
            Locale::En => "days",
            Locale::Ru => "дн.",
        })
    } else if abs.num_hours() >= 1 {
        (abs.num_hours(), match locale {
            Locale::En => "h",
            Locale::Ru => "ч",
        })
    } else {
        (abs.num_minutes(), match locale {
            Locale::En => "min",
            Locale::Ru => "мин",
        })
    };

    match (locale, future) {
        (Locale::En, true) => format!("in {amount} {unit}"),
        (Locale::En, false) => format!("{amount} {unit} ago"),
        (Locale::Ru, true) => format!("через {amount} {unit}"),
        (Locale::Ru, false) => format!("{amount} {unit} назад"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Utc, TimeZone as _};

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(4500, "usd", Locale::En), "$45.00");
        assert_eq!(format_money(123_450, "USD", Locale::En), "$1,234.50");
        assert_eq!(format_money(123_450, "RUB", Locale::Ru), "1\u{a0}234,50\u{a0}₽");
        assert_eq!(format_money(-999, "EUR", Locale::En), "-€9.99");
        assert_eq!(format_money(1500, "JPY", Locale::En), "¥1,500");
        assert_eq!(format_money(5, "CHF", Locale::En), "0.05 CHF");
        assert_eq!(format_money(100_000_000, "USD", Locale::En), "$1,000,000.00");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(45, Locale::En), "45 min");
        assert_eq!(format_duration(60, Locale::En), "1 h");
        assert_eq!(format_duration(90, Locale::En), "1 h 30 min");
        assert_eq!(format_duration(90, Locale::Ru), "1 ч 30 мин");
    }

    #[test]
    fn test_format_datetime() {
        let dt = Utc.with_ymd_and_hms(2026, 3, 2, 15, 5, 0).unwrap();
        assert_eq!(format_datetime(&dt, Locale::En), "Mar 2, 2026 15:05");
        assert_eq!(format_datetime(&dt, Locale::Ru), "02.03.2026 15:05");
        assert_eq!(format_date(&dt, Locale::En), "Mar 2, 2026");
    }

    #[test]
    fn test_format_relative() {
        assert_eq!(format_relative(Duration::hours(3), Locale::En), "in 3 h");
        assert_eq!(format_relative(-Duration::days(2), Locale::En), "2 days ago");
        assert_eq!(format_relative(Duration::days(1), Locale::En), "in 1 day");
        assert_eq!(format_relative(Duration::minutes(20), Locale::Ru), "через 20 мин");
    }
}
