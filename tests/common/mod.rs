// SPDX-License-Identifier: MIT

//! Shared test helpers.

use std::sync::Arc;

use ridemaker::config::Config;
use ridemaker::db::RideStore;
use ridemaker::AppState;

/// Whether a Firestore emulator is reachable for integration tests.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip the current test unless the Firestore emulator is configured.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !common::emulator_available() {
            eprintln!("Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Store backed by the emulator. Only call after `require_emulator!`.
#[allow(dead_code)]
pub async fn test_store() -> RideStore {
    RideStore::new("ridemaker-test")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// App state with an offline store, for testing the HTTP surface without
/// any backend.
#[allow(dead_code)]
pub fn offline_state() -> Arc<AppState> {
    Arc::new(AppState::new(Config::test_default(), RideStore::new_mock()))
}
