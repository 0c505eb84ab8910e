// SPDX-License-Identifier: MIT

//! Input parsers: loosely-formatted user text to typed values.
//!
//! All functions are pure; anything date-relative takes `today` as an
//! argument so tests are deterministic.

use chrono::{Days, NaiveDate};

use crate::error::{AppError, Result};
use crate::models::MeetTime;

const KM_TO_MILES: f64 = 0.621371;

/// Parse "today", "tomorrow", or MM/DD (case-insensitive).
///
/// MM/DD assumes the current year; a date strictly before today rolls
/// forward to next year. Impossible calendar dates fail.
pub fn parse_date(text: &str, today: NaiveDate) -> Result<NaiveDate> {
    let invalid = || {
        AppError::InvalidFormat(
            "Invalid date format. Use MM/DD, \"Today\", or \"Tomorrow\".".to_string(),
        )
    };

    let text = text.trim();
    if text.eq_ignore_ascii_case("today") {
        return Ok(today);
    }
    if text.eq_ignore_ascii_case("tomorrow") {
        return today.checked_add_days(Days::new(1)).ok_or_else(invalid);
    }

    let (month, day) = text.split_once('/').ok_or_else(invalid)?;
    let month: u32 = month.trim().parse().map_err(|_| invalid())?;
    let day: u32 = day.trim().parse().map_err(|_| invalid())?;

    use chrono::Datelike;
    let date = NaiveDate::from_ymd_opt(today.year(), month, day).ok_or_else(invalid)?;
    if date < today {
        // Already passed this year; assume next year.
        return NaiveDate::from_ymd_opt(today.year() + 1, month, day).ok_or_else(invalid);
    }
    Ok(date)
}

/// Parse 24-hour HH:MM, 12-hour HH:MM AM/PM, or lazy "6pm"/"9am" forms.
pub fn parse_time(text: &str) -> Result<MeetTime> {
    let invalid = || {
        AppError::InvalidFormat(
            "Invalid time format. Use HH:MM, HH:MM AM/PM, or lazy formats like \"6pm\"."
                .to_string(),
        )
    };

    let text = text.trim().to_ascii_lowercase();
    let (clock, meridiem) = if let Some(rest) = text.strip_suffix("am") {
        (rest.trim_end(), Some(false))
    } else if let Some(rest) = text.strip_suffix("pm") {
        (rest.trim_end(), Some(true))
    } else {
        (text.as_str(), None)
    };

    let (mut hours, minutes) = match clock.split_once(':') {
        Some((h, m)) => {
            if m.len() != 2 {
                return Err(invalid());
            }
            let hours: u32 = h.parse().map_err(|_| invalid())?;
            let minutes: u32 = m.parse().map_err(|_| invalid())?;
            (hours, minutes)
        }
        // Lazy single-number form needs an am/pm tag to mean anything.
        None => match meridiem {
            Some(_) => (clock.parse().map_err(|_| invalid())?, 0),
            None => return Err(invalid()),
        },
    };

    if let Some(pm) = meridiem {
        // 12-hour clock hours are 1-12, so "13pm" fails.
        if !(1..=12).contains(&hours) {
            return Err(invalid());
        }
        if pm && hours != 12 {
            hours += 12;
        } else if !pm && hours == 12 {
            hours = 0;
        }
    }

    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    Ok(MeetTime { hours, minutes })
}

/// Parse a positive decimal distance, converting "km"-tagged input to miles.
pub fn parse_mileage(text: &str) -> Result<f64> {
    let invalid = || AppError::InvalidValue("Mileage must be a positive number.".to_string());

    let text = text.trim();
    // Take the leading numeric prefix so "10km" parses as 10.
    let numeric_len = text
        .char_indices()
        .take_while(|(i, c)| c.is_ascii_digit() || *c == '.' || (*i == 0 && (*c == '-' || *c == '+')))
        .count();
    let mileage: f64 = text[..numeric_len].parse().map_err(|_| invalid())?;

    if !mileage.is_finite() || mileage <= 0.0 {
        return Err(invalid());
    }

    if text.to_ascii_lowercase().contains("km") {
        return Ok((mileage * KM_TO_MILES * 10.0).round() / 10.0);
    }
    Ok(mileage)
}

/// Validate a route URL: must be hosted on Strava or RideWithGPS.
pub fn validate_route_url(text: &str) -> Result<String> {
    let invalid = || AppError::InvalidValue("Route must be a Strava or RideWithGPS URL.".to_string());

    let url = url::Url::parse(text.trim()).map_err(|_| invalid())?;
    let host = url.host_str().ok_or_else(invalid)?;

    const ALLOWED_DOMAINS: [&str; 2] = ["strava.com", "ridewithgps.com"];
    if !ALLOWED_DOMAINS.iter().any(|domain| host.contains(domain)) {
        return Err(invalid());
    }
    Ok(url.to_string())
}

/// Validate a location: a known table key or non-empty free text.
pub fn validate_location(text: &str) -> Result<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::InvalidValue("Invalid location provided.".to_string()));
    }
    Ok(text.to_string())
}

/// Parse a positive integer roll-time in minutes (used by the schedule edit
/// modal; the slash command constrains choices to 5/15/30).
pub fn parse_roll_time(text: &str) -> Result<u32> {
    let invalid =
        || AppError::InvalidValue("Roll time must be a positive number of minutes.".to_string());
    let minutes: u32 = text.trim().parse().map_err(|_| invalid())?;
    if minutes == 0 {
        return Err(invalid());
    }
    Ok(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_date_today_and_tomorrow() {
        let today = date(2026, 8, 27);
        assert_eq!(parse_date("Today", today).unwrap(), today);
        assert_eq!(parse_date("TOMORROW", today).unwrap(), date(2026, 8, 28));
    }

    #[test]
    fn parse_date_future_stays_this_year() {
        let today = date(2026, 8, 27);
        assert_eq!(parse_date("08/27", today).unwrap(), today);
        assert_eq!(parse_date("12/25", today).unwrap(), date(2026, 12, 25));
    }

    #[test]
    fn parse_date_past_rolls_to_next_year() {
        let today = date(2026, 8, 27);
        assert_eq!(parse_date("01/15", today).unwrap(), date(2027, 1, 15));
        assert_eq!(parse_date("8/26", today).unwrap(), date(2027, 8, 26));
    }

    #[test]
    fn parse_date_rejects_impossible_dates() {
        let today = date(2026, 8, 27);
        assert!(parse_date("02/30", today).is_err());
        assert!(parse_date("13/01", today).is_err());
        assert!(parse_date("next week", today).is_err());
    }

    #[test]
    fn parse_time_lazy_forms() {
        assert_eq!(parse_time("6pm").unwrap(), MeetTime { hours: 18, minutes: 0 });
        assert_eq!(parse_time("9am").unwrap(), MeetTime { hours: 9, minutes: 0 });
        assert_eq!(parse_time("12am").unwrap(), MeetTime { hours: 0, minutes: 0 });
        assert_eq!(parse_time("12pm").unwrap(), MeetTime { hours: 12, minutes: 0 });
    }

    #[test]
    fn parse_time_24_hour() {
        assert_eq!(
            parse_time("14:30").unwrap(),
            MeetTime { hours: 14, minutes: 30 }
        );
        assert_eq!(parse_time("00:00").unwrap(), MeetTime { hours: 0, minutes: 0 });
    }

    #[test]
    fn parse_time_12_hour_with_minutes() {
        assert_eq!(
            parse_time("6:30 PM").unwrap(),
            MeetTime { hours: 18, minutes: 30 }
        );
        assert_eq!(
            parse_time("6:30pm").unwrap(),
            MeetTime { hours: 18, minutes: 30 }
        );
    }

    #[test]
    fn parse_time_rejects_out_of_range() {
        assert!(parse_time("13pm").is_err());
        assert!(parse_time("24:00").is_err());
        assert!(parse_time("12:60").is_err());
        assert!(parse_time("noonish").is_err());
        assert!(parse_time("6").is_err());
    }

    #[test]
    fn parse_mileage_miles_and_km() {
        assert_eq!(parse_mileage("10").unwrap(), 10.0);
        assert_eq!(parse_mileage("10km").unwrap(), 6.2);
        assert_eq!(parse_mileage("26.5").unwrap(), 26.5);
    }

    #[test]
    fn parse_mileage_rejects_nonpositive() {
        assert!(parse_mileage("-5").is_err());
        assert!(parse_mileage("0").is_err());
        assert!(parse_mileage("far").is_err());
    }

    #[test]
    fn route_url_domains() {
        assert!(validate_route_url("https://www.strava.com/routes/1").is_ok());
        assert!(validate_route_url("https://ridewithgps.com/routes/2").is_ok());
        assert!(validate_route_url("https://evil.com").is_err());
        assert!(validate_route_url("not a url").is_err());
    }

    #[test]
    fn location_must_not_be_blank() {
        assert_eq!(validate_location("  venn-brewery ").unwrap(), "venn-brewery");
        assert_eq!(validate_location("the lake parking lot").unwrap(), "the lake parking lot");
        assert!(validate_location("   ").is_err());
    }

    #[test]
    fn roll_time_positive_minutes() {
        assert_eq!(parse_roll_time("15").unwrap(), 15);
        assert!(parse_roll_time("0").is_err());
        assert!(parse_roll_time("soon").is_err());
    }
}
