use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

const RU_MONTHS: [&str; 12] = [
    "янв.", "фев.", "мар.", "апр.", "мая", "июн.", "июл.", "авг.", "сент.", "окт.", "нояб.",
    "дек.",
];

const EN_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Locale used for the `MMM d, yyyy` rendering of departure dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateLocale {
    #[default]
    Ru,
    En,
}

impl DateLocale {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateLocale::Ru => "ru",
            DateLocale::En => "en",
        }
    }

    fn month_abbr(&self, month0: u32) -> &'static str {
        let table = match self {
            DateLocale::Ru => &RU_MONTHS,
            DateLocale::En => &EN_MONTHS,
        };
        table[month0 as usize % 12]
    }
}

impl fmt::Display for DateLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DateLocale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ru" | "ru-ru" | "ru_ru" => Ok(DateLocale::Ru),
            "en" | "en-us" | "en_us" => Ok(DateLocale::En),
            other => Err(format!("unsupported date locale: {other}")),
        }
    }
}

/// Parses the timestamp renderings the backend is known to send: RFC 3339
/// with an offset (kept as wall-clock time), naive ISO date-times and bare
/// dates.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// `MMM d, yyyy`, e.g. `мар. 20, 2024` or `Mar 20, 2024`.
pub fn format_short_date(dt: &NaiveDateTime, locale: DateLocale) -> String {
    format!(
        "{} {}, {:04}",
        locale.month_abbr(dt.month0()),
        dt.day(),
        dt.year()
    )
}

/// Short date for a raw timestamp, falling back to the raw text when it
/// does not parse.
pub fn format_departure(raw: &str, locale: DateLocale) -> String {
    parse_timestamp(raw)
        .map(|dt| format_short_date(&dt, locale))
        .unwrap_or_else(|| raw.to_string())
}

pub fn format_date_time(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.format("%d.%m.%Y %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}

pub fn format_amount(amount: f64) -> String {
    format!("${amount}")
}

pub fn format_hours(hours: f64) -> String {
    format!("{hours}ч")
}

pub fn trip_count_label(count: usize) -> String {
    let noun = match count {
        1 => "поездка",
        2..=4 => "поездки",
        _ => "поездок",
    };
    format!("{count} {noun}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_date_follows_locale() {
        let dt = parse_timestamp("2024-03-20T10:00:00").unwrap();
        assert_eq!(format_short_date(&dt, DateLocale::Ru), "мар. 20, 2024");
        assert_eq!(format_short_date(&dt, DateLocale::En), "Mar 20, 2024");
        let may = parse_timestamp("2024-05-01").unwrap();
        assert_eq!(format_short_date(&may, DateLocale::Ru), "мая 1, 2024");
    }

    #[test]
    fn parses_all_supported_renderings() {
        assert!(parse_timestamp("2024-03-20T10:00:00").is_some());
        assert!(parse_timestamp("2024-03-20T10:00:00.250").is_some());
        assert!(parse_timestamp("2024-03-20T10:00").is_some());
        assert!(parse_timestamp("2024-03-20").is_some());
        let with_offset = parse_timestamp("2024-03-20T23:30:00+03:00").unwrap();
        assert_eq!(with_offset.day(), 20);
        assert!(parse_timestamp("not a date").is_none());
    }

    #[test]
    fn unparseable_departure_falls_back_to_raw_text() {
        assert_eq!(format_departure("когда-нибудь", DateLocale::Ru), "когда-нибудь");
        assert_eq!(format_date_time("2024-03-25T08:00:00"), "25.03.2024 08:00");
    }

    #[test]
    fn count_label_uses_russian_plural_forms() {
        assert_eq!(trip_count_label(0), "0 поездок");
        assert_eq!(trip_count_label(1), "1 поездка");
        assert_eq!(trip_count_label(3), "3 поездки");
        assert_eq!(trip_count_label(5), "5 поездок");
        assert_eq!(trip_count_label(21), "21 поездок");
    }

    #[test]
    fn stat_values_render_like_the_cards() {
        assert_eq!(format_amount(1250.0), "$1250");
        assert_eq!(format_hours(156.0), "156ч");
        assert_eq!("EN".parse::<DateLocale>().unwrap(), DateLocale::En);
        assert!("de".parse::<DateLocale>().is_err());
    }
}
