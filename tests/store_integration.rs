// SPDX-License-Identifier: MIT

//! Firestore store integration tests, run against the emulator.
//!
//! Set FIRESTORE_EMULATOR_HOST (e.g. `localhost:8080`) to enable.

mod common;

use chrono::{Duration, NaiveDate, Utc};
use ridemaker::models::{
    AttendeeAction, AttendeeKind, DropPolicy, MeetTime, Pace, RideDraft, RideType, RideUpdate,
    Rider, ServerConfigPatch,
};

fn unique_id(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}

fn draft(server_id: &str, date: NaiveDate) -> RideDraft {
    RideDraft {
        server_id: server_id.to_string(),
        channel_id: "123456789".to_string(),
        ride_type: RideType::Road,
        pace: Pace::Spicy,
        drop_policy: DropPolicy::Drop,
        date,
        meet_time: MeetTime {
            hours: 18,
            minutes: 0,
        },
        roll_time: 15,
        mileage: Some(20.0),
        route: Some("https://www.strava.com/routes/123".to_string()),
        avg_speed: Some(18),
        starting_location: "angry-catfish".to_string(),
        end_location: None,
        leader: Rider {
            user_id: "42".to_string(),
            username: "leader".to_string(),
        },
        sweep: None,
    }
}

fn tomorrow() -> NaiveDate {
    Utc::now().date_naive() + Duration::days(1)
}

#[tokio::test]
async fn server_config_create_read_update() {
    require_emulator!();
    let store = common::test_store().await;
    let server_id = unique_id("guild");

    assert!(store.get_server_config(&server_id).await.unwrap().is_none());

    let mut patch = ServerConfigPatch::default();
    patch
        .channel_mappings
        .insert(RideType::Road, "111".to_string());
    let created = store.create_server_config(&server_id, patch).await.unwrap();
    assert_eq!(created.timezone, "America/Chicago");
    assert!(created.settings.reminder_enabled);

    // Update merges mappings and can change the timezone independently.
    let mut patch = ServerConfigPatch {
        timezone: Some("America/New_York".to_string()),
        ..Default::default()
    };
    patch
        .channel_mappings
        .insert(RideType::Gravel, "222".to_string());
    let updated = store.update_server_config(&server_id, patch).await.unwrap();

    assert_eq!(updated.timezone, "America/New_York");
    assert_eq!(updated.channel_mappings[&RideType::Road], "111");
    assert_eq!(updated.channel_mappings[&RideType::Gravel], "222");
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn create_ride_generates_id_and_empty_attendees() {
    require_emulator!();
    let store = common::test_store().await;
    let server_id = unique_id("guild");

    let ride = store.create_ride(draft(&server_id, tomorrow())).await.unwrap();

    assert!(!ride.id.is_empty());
    assert!(ride.message_id.is_none());
    assert!(ride.attendees.going.is_empty());
    assert!(ride.attendees.maybe.is_empty());
    assert!(ride.attendees.weather.is_empty());
    assert_eq!(ride.created_at, ride.updated_at);

    let fetched = store.get_ride(&ride.id).await.unwrap().unwrap();
    assert_eq!(fetched.server_id, server_id);
    assert_eq!(fetched.pace, Pace::Spicy);
    assert_eq!(fetched.drop_policy, DropPolicy::Drop);
}

#[tokio::test]
async fn update_ride_applies_schedule_patch() {
    require_emulator!();
    let store = common::test_store().await;
    let server_id = unique_id("guild");

    let ride = store.create_ride(draft(&server_id, tomorrow())).await.unwrap();

    let new_date = tomorrow() + Duration::days(3);
    let updated = store
        .update_ride(
            &ride.id,
            RideUpdate::Schedule {
                date: new_date,
                meet_time: MeetTime {
                    hours: 9,
                    minutes: 30,
                },
                roll_time: 30,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.date, new_date);
    assert_eq!(updated.meet_time.hours, 9);
    assert_eq!(updated.roll_time, 30);
    // Untouched fields survive the patch.
    assert_eq!(updated.mileage, Some(20.0));
    assert!(updated.updated_at > ride.updated_at);
}

#[tokio::test]
async fn attendee_sets_stay_exclusive_through_the_store() {
    require_emulator!();
    let store = common::test_store().await;
    let server_id = unique_id("guild");

    let ride = store.create_ride(draft(&server_id, tomorrow())).await.unwrap();

    let ride = store
        .update_ride_attendees(&ride.id, AttendeeKind::Going, "u1", AttendeeAction::Add)
        .await
        .unwrap();
    assert_eq!(ride.attendees.going, vec!["u1".to_string()]);

    // Switching reactions moves the user, never duplicates them.
    let ride = store
        .update_ride_attendees(&ride.id, AttendeeKind::Maybe, "u1", AttendeeAction::Add)
        .await
        .unwrap();
    assert!(ride.attendees.going.is_empty());
    assert_eq!(ride.attendees.maybe, vec!["u1".to_string()]);

    let ride = store
        .update_ride_attendees(&ride.id, AttendeeKind::Maybe, "u1", AttendeeAction::Remove)
        .await
        .unwrap();
    assert!(ride.attendees.maybe.is_empty());
}

#[tokio::test]
async fn active_rides_exclude_past_and_sort_soonest_first() {
    require_emulator!();
    let store = common::test_store().await;
    let server_id = unique_id("guild");
    let today = Utc::now().date_naive();

    let mut later = draft(&server_id, today + Duration::days(5));
    later.meet_time = MeetTime {
        hours: 8,
        minutes: 0,
    };
    let mut past = draft(&server_id, today - Duration::days(1));
    past.ride_type = RideType::Social;
    let mut soon_evening = draft(&server_id, today + Duration::days(1));
    soon_evening.meet_time = MeetTime {
        hours: 18,
        minutes: 0,
    };
    let mut soon_morning = draft(&server_id, today + Duration::days(1));
    soon_morning.meet_time = MeetTime {
        hours: 7,
        minutes: 0,
    };

    store.create_ride(later).await.unwrap();
    store.create_ride(past).await.unwrap();
    let evening = store.create_ride(soon_evening).await.unwrap();
    let morning = store.create_ride(soon_morning).await.unwrap();

    let active = store.get_active_rides(&server_id, today).await.unwrap();

    assert_eq!(active.len(), 3);
    assert_eq!(active[0].id, morning.id);
    assert_eq!(active[1].id, evening.id);
    assert!(active.iter().all(|ride| ride.date >= today));
}

#[tokio::test]
async fn find_ride_by_message_round_trip() {
    require_emulator!();
    let store = common::test_store().await;
    let server_id = unique_id("guild");

    let ride = store.create_ride(draft(&server_id, tomorrow())).await.unwrap();
    let message_id = unique_id("msg");

    store
        .update_ride(
            &ride.id,
            RideUpdate::MessageRef {
                message_id: message_id.clone(),
            },
        )
        .await
        .unwrap();

    let found = store.find_ride_by_message(&message_id).await.unwrap();
    assert_eq!(found.unwrap().id, ride.id);

    assert!(store
        .find_ride_by_message("no-such-message")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn delete_ride_removes_the_document() {
    require_emulator!();
    let store = common::test_store().await;
    let server_id = unique_id("guild");

    let ride = store.create_ride(draft(&server_id, tomorrow())).await.unwrap();
    store.delete_ride(&ride.id).await.unwrap();

    assert!(store.get_ride(&ride.id).await.unwrap().is_none());
}

#[tokio::test]
async fn offline_store_errors_instead_of_panicking() {
    let store = ridemaker::db::RideStore::new_mock();
    assert!(store.ping().await.is_err());
    assert!(store.get_ride("anything").await.is_err());
}
