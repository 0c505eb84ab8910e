//! Database layer (Firestore).

pub mod firestore;

pub use firestore::RideStore;

/// Collection names as constants.
pub mod collections {
    /// Server configs (keyed by guild id)
    pub const SERVER_CONFIGS: &str = "serverConfigs";
    /// Rides (generated id)
    pub const RIDES: &str = "rides";
}
