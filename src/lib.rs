// SPDX-License-Identifier: MIT

//! URG RideMaker: a Discord bot for organizing group bike rides.
//!
//! Members create, list, edit, and RSVP to rides via slash commands,
//! buttons, modals, and emoji reactions. Ride and server-configuration
//! records live in Firestore.

pub mod config;
pub mod db;
pub mod discord;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::RwLock;
use std::time::Instant;

use config::Config;
use db::RideStore;
use services::sessions::DraftSessions;

/// Shared application state, visible to both the Discord event handler
/// and the liveness HTTP endpoint.
pub struct AppState {
    pub config: Config,
    pub store: RideStore,
    pub sessions: DraftSessions,
    pub started_at: Instant,
    /// Bot tag, set once the gateway reports ready.
    pub bot_user: RwLock<Option<String>>,
}

impl AppState {
    pub fn new(config: Config, store: RideStore) -> Self {
        Self {
            config,
            store,
            sessions: DraftSessions::default(),
            started_at: Instant::now(),
            bot_user: RwLock::new(None),
        }
    }
}
