use chrono::{Datelike, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static TIME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,2}):(\d{2})").expect("time regex"));

/// Genitive month names as they appear in listed dates.
const MONTHS: [(&str, u32); 12] = [
    ("января", 1),
    ("февраля", 2),
    ("марта", 3),
    ("апреля", 4),
    ("мая", 5),
    ("июня", 6),
    ("июля", 7),
    ("августа", 8),
    ("сентября", 9),
    ("октября", 10),
    ("ноября", 11),
    ("декабря", 12),
];

const WEEKDAYS: [&str; 7] = [
    "понедельник",
    "вторник",
    "среда",
    "четверг",
    "пятница",
    "суббота",
    "воскресенье",
];

/// Normalizes a listed date against the local clock.
pub fn normalize_listed_date(text: &str) -> Option<String> {
    normalize(text, Local::now().date_naive())
}

/// Parses free text like `"суббота 15 августа 19:00"` into `DD.MM.YYYY HH:MM`.
///
/// Listings omit the year, so the current year is assumed first; a date on or
/// before `today` rolls forward a year. The rollover compares dates only:
/// an event listed for today is treated as already past regardless of its
/// time-of-day.
pub fn normalize(text: &str, today: NaiveDate) -> Option<String> {
    let mut text = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    for day in WEEKDAYS {
        text = text.replace(day, "");
    }

    let time_match = TIME_RE.captures(&text).map(|caps| {
        (
            caps[1].parse::<u32>(),
            caps[2].parse::<u32>(),
            caps.get(0).expect("whole match").range(),
        )
    });
    let (hours, minutes) = match time_match {
        Some((h, m, range)) => {
            text.replace_range(range, "");
            (h.ok()?, m.ok()?)
        }
        None => (0, 0),
    };

    let date_part = text.trim();
    let day_digits: String = date_part.chars().take_while(|c| c.is_ascii_digit()).collect();
    if day_digits.is_empty() {
        tracing::warn!("no day digits in listed date: {date_part}");
        return None;
    }
    let day: u32 = day_digits.parse().ok()?;
    if !(1..=31).contains(&day) {
        tracing::warn!("day out of range in listed date: {date_part}");
        return None;
    }

    let month_part = date_part[day_digits.len()..].trim();
    let month = MONTHS
        .iter()
        .find(|(name, _)| month_part.starts_with(name))
        .map(|(_, number)| *number)?;

    let mut date = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if date <= today {
        date = NaiveDate::from_ymd_opt(today.year() + 1, month, day)?;
    }

    Some(format!(
        "{:02}.{:02}.{} {:02}:{:02}",
        date.day(),
        date.month(),
        date.year(),
        hours,
        minutes
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn every_month_name_maps_to_its_number() {
        for (index, (name, number)) in MONTHS.iter().enumerate() {
            let normalized = normalize(&format!("7 {name}"), day(2024, 1, 1))
                .unwrap_or_else(|| panic!("month {index} failed"));
            assert!(normalized.starts_with(&format!("07.{number:02}.")));
        }
    }

    #[test]
    fn passed_date_rolls_to_next_year() {
        assert_eq!(
            normalize("15 августа", day(2024, 8, 20)).as_deref(),
            Some("15.08.2025 00:00")
        );
    }

    #[test]
    fn future_date_stays_in_current_year() {
        assert_eq!(
            normalize("25 декабря 18:30", day(2024, 1, 1)).as_deref(),
            Some("25.12.2024 18:30")
        );
    }

    #[test]
    fn todays_date_rolls_even_with_a_later_time() {
        assert_eq!(
            normalize("20 августа 23:00", day(2024, 8, 20)).as_deref(),
            Some("20.08.2025 23:00")
        );
    }

    #[test]
    fn weekday_names_are_stripped() {
        assert_eq!(
            normalize("суббота 5 июля 19:00", day(2025, 1, 1)).as_deref(),
            Some("05.07.2025 19:00")
        );
    }

    #[test]
    fn garbage_text_is_rejected() {
        assert_eq!(normalize("garbage text", day(2024, 1, 1)), None);
        assert_eq!(normalize("", day(2024, 1, 1)), None);
        assert_eq!(normalize("августа", day(2024, 1, 1)), None);
    }

    #[test]
    fn invalid_calendar_dates_are_rejected() {
        assert_eq!(normalize("32 января", day(2024, 1, 1)), None);
        assert_eq!(normalize("31 февраля", day(2024, 1, 1)), None);
        assert_eq!(normalize("0 марта", day(2024, 1, 1)), None);
    }

    #[test]
    fn leap_day_cannot_roll_into_a_common_year() {
        // 29.02.2024 exists but has passed; 29.02.2025 does not.
        assert_eq!(normalize("29 февраля", day(2024, 3, 1)), None);
    }

    #[test]
    fn single_digit_values_are_zero_padded() {
        assert_eq!(
            normalize("3 мая 9:05", day(2024, 1, 1)).as_deref(),
            Some("03.05.2024 09:05")
        );
    }
}
