// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Server configs (channel mappings, timezone)
//! - Rides (full lifecycle plus attendee sets)

use chrono::{NaiveDate, Utc};

use crate::db::collections;
use crate::error::{AppError, Result};
use crate::models::{
    AttendeeAction, AttendeeKind, Ride, RideDraft, RideUpdate, ServerConfig, ServerConfigPatch,
};

/// Firestore database client.
#[derive(Clone)]
pub struct RideStore {
    client: Option<firestore::FirestoreDb>,
}

impl RideStore {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    /// Cheap read used by the status diagnostics.
    pub async fn ping(&self) -> Result<()> {
        let _: Option<ServerConfig> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::SERVER_CONFIGS)
            .obj()
            .one("__ping__")
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Server Config Operations ────────────────────────────────

    /// Get a server's config by guild id.
    pub async fn get_server_config(
        &self,
        server_id: &str,
    ) -> Result<Option<ServerConfig>> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::SERVER_CONFIGS)
            .obj()
            .one(server_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a server config by merging a patch over documented defaults.
    pub async fn create_server_config(
        &self,
        server_id: &str,
        patch: ServerConfigPatch,
    ) -> Result<ServerConfig> {
        let mut config = ServerConfig::with_defaults(Utc::now());
        config.apply(patch);

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::SERVER_CONFIGS)
            .document_id(server_id)
            .object(&config)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(config)
    }

    /// Apply a patch to an existing server config, stamping `updated_at`.
    pub async fn update_server_config(
        &self,
        server_id: &str,
        patch: ServerConfigPatch,
    ) -> Result<ServerConfig> {
        let mut config = self
            .get_server_config(server_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Server config {server_id} not found")))?;

        config.apply(patch);
        config.updated_at = Utc::now();

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::SERVER_CONFIGS)
            .document_id(server_id)
            .object(&config)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(config)
    }

    // ─── Ride Operations ─────────────────────────────────────────

    /// Persist a validated draft as a new ride.
    ///
    /// Assigns the id and stamps empty attendee sets and timestamps.
    pub async fn create_ride(&self, draft: RideDraft) -> Result<Ride> {
        let now = Utc::now();
        let ride = Ride {
            id: uuid::Uuid::new_v4().simple().to_string(),
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
            attendees: Default::default(),
            created_at: now,
            updated_at: now,
        };

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::RIDES)
            .document_id(&ride.id)
            .object(&ride)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(ride)
    }

    /// Get a ride by id.
    pub async fn get_ride(&self, ride_id: &str) -> Result<Option<Ride>> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::RIDES)
            .obj()
            .one(ride_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Apply a typed patch to a ride, stamping `updated_at`.
    ///
    /// Fetch-modify-write of the whole document; concurrent edits race with
    /// last-writer-wins semantics.
    pub async fn update_ride(&self, ride_id: &str, update: RideUpdate) -> Result<Ride> {
        let mut ride = self
            .get_ride(ride_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Ride {ride_id} not found")))?;

        ride.apply(update);
        ride.updated_at = Utc::now();

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::RIDES)
            .document_id(&ride.id)
            .object(&ride)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(ride)
    }

    /// All of a server's rides dated today or later, ascending by date.
    ///
    /// The range filter and sort run client-side; a server-side `date >=`
    /// filter needs a composite index and fails without one.
    pub async fn get_active_rides(
        &self,
        server_id: &str,
        today: NaiveDate,
    ) -> Result<Vec<Ride>> {
        let server_id = server_id.to_string();
        let mut rides: Vec<Ride> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::RIDES)
            .filter(move |q| q.for_all([q.field("server_id").eq(server_id.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        rides.retain(|ride| ride.date >= today);
        rides.sort_by_key(|ride| (ride.date, ride.meet_time.hours, ride.meet_time.minutes));

        Ok(rides)
    }

    /// Resolve a ride from the channel message displaying it.
    pub async fn find_ride_by_message(
        &self,
        message_id: &str,
    ) -> Result<Option<Ride>> {
        let message_id = message_id.to_string();
        let rides: Vec<Ride> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::RIDES)
            .filter(move |q| q.for_all([q.field("message_id").eq(message_id.clone())]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rides.into_iter().next())
    }

    /// Move a user into one attendee set (or out of all of them).
    ///
    /// The user is removed from every set first, then re-added only on an
    /// add, so the mutual-exclusivity invariant holds under repeated or
    /// out-of-order calls.
    pub async fn update_ride_attendees(
        &self,
        ride_id: &str,
        kind: AttendeeKind,
        user_id: &str,
        action: AttendeeAction,
    ) -> Result<Ride> {
        let ride = self
            .get_ride(ride_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Ride {ride_id} not found")))?;

        let mut attendees = ride.attendees;
        attendees.apply(kind, user_id, action);

        self.update_ride(ride_id, RideUpdate::Attendees { attendees })
            .await
    }

    /// Delete a ride. No in-scope command calls this; kept for tests and
    /// operational cleanup.
    pub async fn delete_ride(&self, ride_id: &str) -> Result<()> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::RIDES)
            .document_id(ride_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
