// SPDX-License-Identifier: MIT

//! Per-server configuration.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RideType;

pub const DEFAULT_TIMEZONE: &str = "America/Chicago";

/// One document per Discord server, keyed by guild id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Ride type -> destination channel id. A ride cannot be created for a
    /// type with no mapping.
    pub channel_mappings: HashMap<RideType, String>,
    /// IANA zone name, used to resolve "today" for parsing and display.
    pub timezone: String,
    pub settings: ServerSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub reminder_enabled: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            reminder_enabled: true,
        }
    }
}

impl ServerConfig {
    /// Documented defaults, stamped with the given instant.
    pub fn with_defaults(now: DateTime<Utc>) -> Self {
        Self {
            channel_mappings: HashMap::new(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            settings: ServerSettings::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The server's timezone, falling back to the default when the stored
    /// name is not a valid IANA zone.
    pub fn tz(&self) -> chrono_tz::Tz {
        self.timezone
            .parse()
            .unwrap_or(chrono_tz::America::Chicago)
    }
}

/// Typed partial update for a server config.
#[derive(Debug, Clone, Default)]
pub struct ServerConfigPatch {
    /// Mappings to merge over the existing ones.
    pub channel_mappings: HashMap<RideType, String>,
    pub timezone: Option<String>,
}

impl ServerConfig {
    pub fn apply(&mut self, patch: ServerConfigPatch) {
        self.channel_mappings.extend(patch.channel_mappings);
        if let Some(timezone) = patch.timezone {
            self.timezone = timezone;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_merges_mappings_and_keeps_the_rest() {
        let mut config = ServerConfig::with_defaults(Utc::now());
        config
            .channel_mappings
            .insert(RideType::Road, "111".to_string());

        let mut patch = ServerConfigPatch::default();
        patch
            .channel_mappings
            .insert(RideType::Gravel, "222".to_string());
        config.apply(patch);

        assert_eq!(config.channel_mappings[&RideType::Road], "111");
        assert_eq!(config.channel_mappings[&RideType::Gravel], "222");
        assert_eq!(config.timezone, DEFAULT_TIMEZONE);
    }

    #[test]
    fn bad_timezone_falls_back_to_default() {
        let mut config = ServerConfig::with_defaults(Utc::now());
        config.timezone = "Not/AZone".to_string();
        assert_eq!(config.tz(), chrono_tz::America::Chicago);
    }
}
