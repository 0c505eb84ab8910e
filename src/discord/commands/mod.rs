// SPDX-License-Identifier: MIT

//! Slash command definitions and handlers, one module per command.

pub mod create_ride;
pub mod diagnostics;
pub mod edit_ride;
pub mod list_rides;
pub mod settings;

use chrono::NaiveDate;
use serenity::builder::CreateCommand;
use serenity::model::application::{ResolvedOption, ResolvedValue};
use serenity::model::channel::PartialChannel;
use serenity::model::user::User;

use crate::db::RideStore;
use crate::error::{AppError, Result};
use crate::models::server_config::DEFAULT_TIMEZONE;

/// All commands, for registration on ready.
pub fn all() -> Vec<CreateCommand> {
    vec![
        create_ride::register(),
        edit_ride::register(),
        list_rides::register(),
        settings::register(),
        diagnostics::register_status(),
        diagnostics::register_dbstatus(),
        diagnostics::register_ping(),
    ]
}

pub(crate) fn str_option<'a>(options: &[ResolvedOption<'a>], name: &str) -> Option<&'a str> {
    options.iter().find_map(|opt| match &opt.value {
        ResolvedValue::String(s) if opt.name == name => Some(*s),
        _ => None,
    })
}

pub(crate) fn int_option(options: &[ResolvedOption<'_>], name: &str) -> Option<i64> {
    options.iter().find_map(|opt| match &opt.value {
        ResolvedValue::Integer(i) if opt.name == name => Some(*i),
        _ => None,
    })
}

pub(crate) fn user_option<'a>(options: &[ResolvedOption<'a>], name: &str) -> Option<&'a User> {
    options.iter().find_map(|opt| match &opt.value {
        ResolvedValue::User(user, _) if opt.name == name => Some(*user),
        _ => None,
    })
}

pub(crate) fn channel_option<'a>(
    options: &[ResolvedOption<'a>],
    name: &str,
) -> Option<&'a PartialChannel> {
    options.iter().find_map(|opt| match &opt.value {
        ResolvedValue::Channel(channel) if opt.name == name => Some(*channel),
        _ => None,
    })
}

pub(crate) fn required_str<'a>(
    options: &[ResolvedOption<'a>],
    name: &str,
) -> Result<&'a str> {
    str_option(options, name)
        .ok_or_else(|| AppError::InvalidValue(format!("Missing required option: {name}")))
}

/// Checked conversion for integer options. Discord constrains values for
/// current clients, but a stale client can send anything.
pub(crate) fn positive_u32(value: i64, field: &str) -> Result<u32> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| AppError::InvalidValue(format!("{field} must be a positive number.")))
}

/// Today's calendar date in a server's timezone, falling back to the
/// default zone when the server has no config yet.
pub(crate) async fn server_today(store: &RideStore, server_id: &str) -> Result<NaiveDate> {
    let tz = match store.get_server_config(server_id).await? {
        Some(config) => config.tz(),
        None => DEFAULT_TIMEZONE
            .parse()
            .unwrap_or(chrono_tz::America::Chicago),
    };
    Ok(chrono::Utc::now().with_timezone(&tz).date_naive())
}
