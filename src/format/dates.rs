//! Russian-locale date and time rendering for the board header.

use chrono::{Datelike, NaiveDateTime, Timelike};
use std::time::Duration;

const MONTHS_GENITIVE: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

/// Formats a date as `16 октября 2026 г.`.
pub fn format_date(at: &NaiveDateTime) -> String {
    let month = MONTHS_GENITIVE[at.month0() as usize];
    format!("{:02} {} {} г.", at.day(), month, at.year())
}

/// Formats a time as `09:05`.
pub fn format_time(at: &NaiveDateTime) -> String {
    format!("{:02}:{:02}", at.hour(), at.minute())
}

/// Describes the refresh interval, e.g. `каждые 10 минут`.
pub fn format_interval(interval: Duration) -> String {
    let secs = interval.as_secs();
    if secs == 0 || secs % 60 != 0 {
        return format!("каждые {} сек.", secs);
    }

    let minutes = secs / 60;
    match (minutes % 10, minutes % 100) {
        (1, 11) => format!("каждые {} минут", minutes),
        (1, _) if minutes == 1 => "каждую минуту".to_string(),
        (1, _) => format!("каждую {} минуту", minutes),
        (2..=4, 12..=14) => format!("каждые {} минут", minutes),
        (2..=4, _) => format!("каждые {} минуты", minutes),
        _ => format!("каждые {} минут", minutes),
    }
}

/// The "last checked" line shown above the deals.
pub fn last_check_line(at: &NaiveDateTime, interval: Duration) -> String {
    format!(
        "Актуально на {}: {} (Обновляется {})",
        format_date(at),
        format_time(at),
        format_interval(interval)
    )
}
