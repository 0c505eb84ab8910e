// SPDX-License-Identifier: MIT

//! Ride record -> human-readable post rendering. All pure.

use chrono::{Duration, NaiveDate, Timelike};
use chrono_tz::Tz;

use crate::models::{MeetTime, Pace, Ride, RideType};
use crate::services::locations;

/// Whether a post reflects creation or a later update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostAction {
    Created,
    Updated,
}

/// Short or long date rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    Short,
    Long,
}

/// A rendered ride post, independent of any messaging SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RidePost {
    pub title: String,
    pub color: u32,
    pub description: String,
    pub footer: String,
}

/// Accent color keyed by ride type.
pub fn ride_color(ride_type: RideType) -> u32 {
    match ride_type {
        RideType::Road => 0xff6b6b,   // Red
        RideType::Gravel => 0x4ecdc4, // Teal
        RideType::Trail => 0x45b7d1,  // Blue
        RideType::Social => 0x96ceb4, // Green
    }
}

/// Render a 12-hour clock time, e.g. "6:00 PM".
pub fn format_time(time: MeetTime) -> String {
    let period = if time.hours >= 12 { "PM" } else { "AM" };
    let display_hours = match time.hours % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", display_hours, time.minutes, period)
}

/// Roll time = meet time + offset, computed through date-time arithmetic so
/// hour and day boundaries carry correctly. A roll past midnight displays
/// the wrapped clock time; the date line still shows the meet date.
pub fn roll_clock(date: NaiveDate, meet: MeetTime, roll_minutes: u32) -> MeetTime {
    let departure = date
        .and_hms_opt(meet.hours, meet.minutes, 0)
        .unwrap_or_else(|| date.and_hms_opt(0, 0, 0).expect("midnight is valid"))
        + Duration::minutes(roll_minutes as i64);
    MeetTime {
        hours: departure.hour(),
        minutes: departure.minute(),
    }
}

/// Render a date, prefixed with "Today," when it matches the current
/// calendar day. Shared by the post, list, and edit views.
pub fn format_date_with_today(date: NaiveDate, today: NaiveDate, style: DateStyle) -> String {
    let formatted = match style {
        DateStyle::Short => date.format("%a, %b %-d").to_string(),
        DateStyle::Long => date.format("%A, %B %-d").to_string(),
    };
    if date == today {
        format!("Today, {formatted}")
    } else {
        formatted
    }
}

/// Render a ride as a post. `today` decides the "Today," prefix and `tz`
/// localizes the footer timestamp.
pub fn format_ride_post(ride: &Ride, action: PostAction, today: NaiveDate, tz: Tz) -> RidePost {
    let meet = format_time(ride.meet_time);
    let roll = format_time(roll_clock(ride.date, ride.meet_time, ride.roll_time));
    let date_display = format_date_with_today(ride.date, today, DateStyle::Short);

    let mut description = String::new();
    description.push_str(&format!("**Date:** {date_display}\n"));
    description.push_str(&format!("**Meet** @ {meet} \u{2002}**\u{21a3}**\u{2002} **Roll** @ {roll}\n"));

    // Average speed shown parenthetically only for spicy rides that set one.
    match (ride.pace, ride.avg_speed) {
        (Pace::Spicy, Some(avg)) => description.push_str(&format!(
            "**{}** pace ({avg} mph avg), **{}** style ride\n",
            ride.pace, ride.drop_policy
        )),
        _ => description.push_str(&format!(
            "**{}** pace, **{}** style ride\n",
            ride.pace, ride.drop_policy
        )),
    }

    description.push('\n');
    description.push_str(&format!(
        "**Starting** @ {}",
        locations::display(&ride.starting_location)
    ));
    if let Some(end) = &ride.end_location {
        description.push_str(&format!(" \u{2003} **Ending** @ {}", locations::display(end)));
    }
    description.push('\n');

    if ride.mileage.is_some() || ride.route.is_some() {
        description.push('\n');
    }
    if let Some(mileage) = ride.mileage {
        description.push_str(&format!("📏 **Distance:** {mileage} miles\n"));
    }
    if let Some(route) = &ride.route {
        description.push_str(&format!("🗺️ **Route:** {route}\n"));
    }

    description.push('\n');
    description.push_str(&format!("👑 **Lead:** <@{}>", ride.leader.user_id));
    if let Some(sweep) = &ride.sweep {
        description.push_str(&format!(" \u{2003} 🚴‍♂️ **Sweep:** <@{}>", sweep.user_id));
    }

    let (action_text, stamp) = match action {
        PostAction::Created => ("Created", ride.created_at),
        PostAction::Updated => ("Last updated", ride.updated_at),
    };
    let stamp_local = stamp.with_timezone(&tz).format("%b %-d, %-I:%M %p");

    RidePost {
        title: format!("🚴‍♂️ {} RIDE 🚴‍♀️", ride.ride_type.as_str().to_uppercase()),
        color: ride_color(ride.ride_type),
        description,
        footer: format!("React below to join! • {action_text} {stamp_local}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::models::{Attendees, DropPolicy, Rider};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_ride() -> Ride {
        Ride {
            id: "abc123".to_string(),
            server_id: "guild".to_string(),
            channel_id: "chan".to_string(),
            ride_type: RideType::Road,
            pace: Pace::Party,
            drop_policy: DropPolicy::NoDrop,
            date: date(2026, 8, 28),
            meet_time: MeetTime { hours: 18, minutes: 0 },
            roll_time: 15,
            mileage: Some(20.0),
            route: Some("https://www.strava.com/routes/1".to_string()),
            avg_speed: None,
            starting_location: "angry-catfish".to_string(),
            end_location: None,
            leader: Rider {
                user_id: "42".to_string(),
                username: "leader".to_string(),
            },
            sweep: None,
            message_id: None,
            attendees: Attendees::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn twelve_hour_clock_rendering() {
        assert_eq!(format_time(MeetTime { hours: 18, minutes: 0 }), "6:00 PM");
        assert_eq!(format_time(MeetTime { hours: 0, minutes: 5 }), "12:05 AM");
        assert_eq!(format_time(MeetTime { hours: 12, minutes: 30 }), "12:30 PM");
    }

    #[test]
    fn roll_time_carries_over_hour_boundary() {
        let rolled = roll_clock(date(2026, 8, 28), MeetTime { hours: 17, minutes: 50 }, 15);
        assert_eq!(rolled, MeetTime { hours: 18, minutes: 5 });
    }

    #[test]
    fn roll_time_wraps_past_midnight() {
        let rolled = roll_clock(date(2026, 8, 28), MeetTime { hours: 23, minutes: 55 }, 30);
        assert_eq!(rolled, MeetTime { hours: 0, minutes: 25 });
    }

    #[test]
    fn today_prefix_only_on_matching_day() {
        let today = date(2026, 8, 27);
        assert_eq!(
            format_date_with_today(today, today, DateStyle::Short),
            "Today, Thu, Aug 27"
        );
        assert_eq!(
            format_date_with_today(date(2026, 8, 28), today, DateStyle::Long),
            "Friday, August 28"
        );
    }

    #[test]
    fn post_contains_meet_and_roll_lines() {
        let ride = test_ride();
        let post = format_ride_post(&ride, PostAction::Created, date(2026, 8, 27), chrono_tz::America::Chicago);

        assert_eq!(post.title, "🚴‍♂️ ROAD RIDE 🚴‍♀️");
        assert_eq!(post.color, 0xff6b6b);
        assert!(post.description.contains("**Meet** @ 6:00 PM"));
        assert!(post.description.contains("**Roll** @ 6:15 PM"));
        assert!(post.description.contains("**party** pace, **no-drop** style ride"));
        assert!(post.description.contains("[🚲 Angry Catfish]("));
        assert!(post.footer.starts_with("React below to join! • Created"));
    }

    #[test]
    fn spicy_post_appends_avg_speed() {
        let mut ride = test_ride();
        ride.pace = Pace::Spicy;
        ride.drop_policy = DropPolicy::Drop;
        ride.avg_speed = Some(18);

        let post = format_ride_post(&ride, PostAction::Updated, date(2026, 8, 27), chrono_tz::UTC);
        assert!(post.description.contains("**spicy** pace (18 mph avg), **drop** style ride"));
        assert!(post.footer.contains("Last updated"));
    }

    #[test]
    fn free_text_locations_render_verbatim() {
        let mut ride = test_ride();
        ride.starting_location = "the big oak tree".to_string();
        ride.end_location = Some("venn-brewery".to_string());

        let post = format_ride_post(&ride, PostAction::Created, date(2026, 8, 27), chrono_tz::UTC);
        assert!(post.description.contains("**Starting** @ the big oak tree"));
        assert!(post.description.contains("**Ending** @ [🍺 Venn Brewery]("));
    }
}
