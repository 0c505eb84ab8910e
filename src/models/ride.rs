// SPDX-License-Identifier: MIT

//! Ride record and the typed patches that mutate it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Kind of ride, which also selects the destination channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RideType {
    Road,
    Gravel,
    Trail,
    Social,
}

impl RideType {
    pub const ALL: [RideType; 4] = [
        RideType::Road,
        RideType::Gravel,
        RideType::Trail,
        RideType::Social,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RideType::Road => "road",
            RideType::Gravel => "gravel",
            RideType::Trail => "trail",
            RideType::Social => "social",
        }
    }
}

impl fmt::Display for RideType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RideType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "road" => Ok(RideType::Road),
            "gravel" => Ok(RideType::Gravel),
            "trail" => Ok(RideType::Trail),
            "social" => Ok(RideType::Social),
            _ => Err(AppError::InvalidValue(
                "Invalid ride type. Must be one of: road, gravel, trail, social".to_string(),
            )),
        }
    }
}

/// Ride pace. `Party` rides never drop anyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Spicy,
    Party,
}

impl Pace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pace::Spicy => "spicy",
            Pace::Party => "party",
        }
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pace {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "spicy" => Ok(Pace::Spicy),
            "party" => Ok(Pace::Party),
            _ => Err(AppError::InvalidValue(
                "Invalid pace. Must be one of: spicy, party".to_string(),
            )),
        }
    }
}

/// Whether the group waits for slower riders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DropPolicy {
    Drop,
    NoDrop,
    Regroup,
}

impl DropPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropPolicy::Drop => "drop",
            DropPolicy::NoDrop => "no-drop",
            DropPolicy::Regroup => "regroup",
        }
    }

    /// Resolve the effective policy from pace and an optional explicit choice.
    /// Party pace is always no-drop; spicy defaults to drop.
    pub fn resolve(pace: Pace, requested: Option<DropPolicy>) -> DropPolicy {
        match pace {
            Pace::Party => DropPolicy::NoDrop,
            Pace::Spicy => requested.unwrap_or(DropPolicy::Drop),
        }
    }
}

impl fmt::Display for DropPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DropPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "drop" => Ok(DropPolicy::Drop),
            "no-drop" => Ok(DropPolicy::NoDrop),
            "regroup" => Ok(DropPolicy::Regroup),
            _ => Err(AppError::InvalidValue(
                "Invalid drop policy. Must be one of: drop, no-drop, regroup".to_string(),
            )),
        }
    }
}

/// Time riders gather, 24-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetTime {
    pub hours: u32,
    pub minutes: u32,
}

/// A Discord user attached to a ride (leader or sweep).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rider {
    pub user_id: String,
    pub username: String,
}

/// One of the three mutually-exclusive RSVP sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendeeKind {
    Going,
    Maybe,
    Weather,
}

/// Add or remove a user from an attendee set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendeeAction {
    Add,
    Remove,
}

/// RSVP membership. Invariant: a user id appears in at most one set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendees {
    pub going: Vec<String>,
    pub maybe: Vec<String>,
    pub weather: Vec<String>,
}

impl Attendees {
    /// Remove the user from every set.
    pub fn remove_everywhere(&mut self, user_id: &str) {
        self.going.retain(|id| id != user_id);
        self.maybe.retain(|id| id != user_id);
        self.weather.retain(|id| id != user_id);
    }

    /// Move the user into exactly one set (or none for a remove).
    pub fn apply(&mut self, kind: AttendeeKind, user_id: &str, action: AttendeeAction) {
        self.remove_everywhere(user_id);
        if action == AttendeeAction::Add {
            let set = match kind {
                AttendeeKind::Going => &mut self.going,
                AttendeeKind::Maybe => &mut self.maybe,
                AttendeeKind::Weather => &mut self.weather,
            };
            set.push(user_id.to_string());
        }
    }
}

/// A scheduled group ride.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ride {
    /// Generated id, also the Firestore document id.
    pub id: String,
    pub server_id: String,
    pub channel_id: String,
    pub ride_type: RideType,
    pub pace: Pace,
    pub drop_policy: DropPolicy,
    pub date: NaiveDate,
    pub meet_time: MeetTime,
    /// Minutes after meet time at which the group departs.
    pub roll_time: u32,
    pub mileage: Option<f64>,
    pub route: Option<String>,
    pub avg_speed: Option<u32>,
    pub starting_location: String,
    pub end_location: Option<String>,
    /// The creator; immutable and the sole edit authority.
    pub leader: Rider,
    pub sweep: Option<Rider>,
    /// Channel message displaying this ride, set after the initial post.
    pub message_id: Option<String>,
    pub attendees: Attendees,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything create-ride has validated before persistence.
#[derive(Debug, Clone)]
pub struct RideDraft {
    pub server_id: String,
    pub channel_id: String,
    pub ride_type: RideType,
    pub pace: Pace,
    pub drop_policy: DropPolicy,
    pub date: NaiveDate,
    pub meet_time: MeetTime,
    pub roll_time: u32,
    pub mileage: Option<f64>,
    pub route: Option<String>,
    pub avg_speed: Option<u32>,
    pub starting_location: String,
    pub end_location: Option<String>,
    pub leader: Rider,
    pub sweep: Option<Rider>,
}

/// Typed partial updates for a ride. Each edit surface maps to one variant,
/// so the storage layer never sees an open-ended field bag.
#[derive(Debug, Clone)]
pub enum RideUpdate {
    Schedule {
        date: NaiveDate,
        meet_time: MeetTime,
        roll_time: u32,
    },
    Locations {
        starting_location: String,
        end_location: Option<String>,
    },
    Details {
        mileage: Option<f64>,
        route: Option<String>,
        avg_speed: Option<u32>,
    },
    MessageRef {
        message_id: String,
    },
    Attendees {
        attendees: Attendees,
    },
}

impl RideDraft {
    /// Cross-field validation, applied before the draft is stashed in a
    /// session or persisted.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.pace == Pace::Spicy && self.avg_speed.is_none() {
            return Err(AppError::InvalidValue(
                "Average speed is required for Spicy pace rides.".to_string(),
            ));
        }
        Ok(())
    }
}

impl Ride {
    /// Leader-only authorization, shared by every edit entry point.
    pub fn require_leader(&self, user_id: &str) -> Result<(), AppError> {
        if self.leader.user_id != user_id {
            return Err(AppError::Forbidden(
                "Only the ride leader can edit this ride.".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply a typed patch in place. Timestamps are the store's concern.
    pub fn apply(&mut self, update: RideUpdate) {
        match update {
            RideUpdate::Schedule {
                date,
                meet_time,
                roll_time,
            } => {
                self.date = date;
                self.meet_time = meet_time;
                self.roll_time = roll_time;
            }
            RideUpdate::Locations {
                starting_location,
                end_location,
            } => {
                self.starting_location = starting_location;
                self.end_location = end_location;
            }
            RideUpdate::Details {
                mileage,
                route,
                avg_speed,
            } => {
                self.mileage = mileage;
                self.route = route;
                self.avg_speed = avg_speed;
            }
            RideUpdate::MessageRef { message_id } => {
                self.message_id = Some(message_id);
            }
            RideUpdate::Attendees { attendees } => {
                self.attendees = attendees;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_draft(pace: Pace, avg_speed: Option<u32>) -> RideDraft {
        RideDraft {
            server_id: "guild".to_string(),
            channel_id: "chan".to_string(),
            ride_type: RideType::Road,
            pace,
            drop_policy: DropPolicy::resolve(pace, None),
            date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            meet_time: MeetTime {
                hours: 18,
                minutes: 0,
            },
            roll_time: 15,
            mileage: None,
            route: None,
            avg_speed,
            starting_location: "angry-catfish".to_string(),
            end_location: None,
            leader: Rider {
                user_id: "42".to_string(),
                username: "leader".to_string(),
            },
            sweep: None,
        }
    }

    fn test_ride() -> Ride {
        let now = Utc::now();
        let draft = test_draft(Pace::Spicy, Some(18));
        Ride {
            id: "abc123".to_string(),
            server_id: draft.server_id,
            channel_id: draft.channel_id,
            ride_type: draft.ride_type,
            pace: draft.pace,
            drop_policy: draft.drop_policy,
            date: draft.date,
            meet_time: draft.meet_time,
            roll_time: draft.roll_time,
            mileage: draft.mileage,
            route: draft.route,
            avg_speed: draft.avg_speed,
            starting_location: draft.starting_location,
            end_location: draft.end_location,
            leader: draft.leader,
            sweep: draft.sweep,
            message_id: None,
            attendees: Attendees::default(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn spicy_draft_without_avg_speed_is_rejected() {
        let err = test_draft(Pace::Spicy, None).validate().unwrap_err();
        assert!(matches!(err, AppError::InvalidValue(_)));
        assert!(err.user_message().contains("Average speed"));

        assert!(test_draft(Pace::Spicy, Some(18)).validate().is_ok());
        assert!(test_draft(Pace::Party, None).validate().is_ok());
    }

    #[test]
    fn only_the_leader_may_edit() {
        let ride = test_ride();
        assert!(ride.require_leader("42").is_ok());

        let err = ride.require_leader("99").unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        // Authorization takes the ride by shared reference; nothing changed.
        assert_eq!(ride.leader.user_id, "42");
        assert_eq!(ride.avg_speed, Some(18));
    }

    #[test]
    fn party_pace_forces_no_drop() {
        assert_eq!(
            DropPolicy::resolve(Pace::Party, Some(DropPolicy::Drop)),
            DropPolicy::NoDrop
        );
        assert_eq!(DropPolicy::resolve(Pace::Party, None), DropPolicy::NoDrop);
    }

    #[test]
    fn spicy_pace_defaults_to_drop() {
        assert_eq!(DropPolicy::resolve(Pace::Spicy, None), DropPolicy::Drop);
        assert_eq!(
            DropPolicy::resolve(Pace::Spicy, Some(DropPolicy::Regroup)),
            DropPolicy::Regroup
        );
    }

    #[test]
    fn enum_parsing_is_case_insensitive() {
        assert_eq!("Road".parse::<RideType>().unwrap(), RideType::Road);
        assert_eq!("SPICY".parse::<Pace>().unwrap(), Pace::Spicy);
        assert_eq!("No-Drop".parse::<DropPolicy>().unwrap(), DropPolicy::NoDrop);
        assert!("tandem".parse::<RideType>().is_err());
    }

    #[test]
    fn attendee_sets_stay_mutually_exclusive() {
        let mut attendees = Attendees::default();
        attendees.apply(AttendeeKind::Going, "u1", AttendeeAction::Add);
        attendees.apply(AttendeeKind::Maybe, "u1", AttendeeAction::Add);

        assert!(attendees.going.is_empty());
        assert_eq!(attendees.maybe, vec!["u1".to_string()]);

        attendees.apply(AttendeeKind::Maybe, "u1", AttendeeAction::Remove);
        assert!(attendees.maybe.is_empty());
    }

    #[test]
    fn ride_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&RideType::Gravel).unwrap(),
            "\"gravel\""
        );
        assert_eq!(
            serde_json::to_string(&DropPolicy::NoDrop).unwrap(),
            "\"no-drop\""
        );
    }
}
