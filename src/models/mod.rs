// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod ride;
pub mod server_config;

pub use ride::{
    AttendeeAction, AttendeeKind, Attendees, DropPolicy, MeetTime, Pace, Ride, RideDraft,
    RideType, RideUpdate, Rider,
};
pub use server_config::{ServerConfig, ServerConfigPatch, ServerSettings};
