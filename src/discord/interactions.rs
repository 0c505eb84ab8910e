// SPDX-License-Identifier: MIT

//! Button and modal interaction handling for the edit flow.
//!
//! Buttons live on the leader's DM panel; each opens a section modal
//! prefilled with the ride's current values. Submissions become typed
//! [`RideUpdate`] patches, and the public channel post is refreshed
//! best-effort after a successful write.

use serenity::builder::{
    CreateActionRow, CreateEmbed, CreateEmbedFooter, CreateInputText, CreateInteractionResponse,
    CreateInteractionResponseMessage, CreateModal, EditMessage,
};
use serenity::client::Context;
use serenity::model::application::{
    ActionRowComponent, ComponentInteraction, InputTextStyle, ModalInteraction,
};
use serenity::model::id::ChannelId;

use crate::discord::commands::{self, create_ride, edit_ride};
use crate::discord::custom_id::{CustomId, EditSection};
use crate::discord::embed_from_post;
use crate::error::{AppError, Result};
use crate::models::{Ride, RideUpdate};
use crate::services::format::{format_ride_post, PostAction};
use crate::services::parse;
use crate::AppState;

const DATE_INPUT: &str = "date_input";
const TIME_INPUT: &str = "time_input";
const ROLL_TIME_INPUT: &str = "roll_time_input";
const START_LOCATION_INPUT: &str = "start_location_input";
const END_LOCATION_INPUT: &str = "end_location_input";
const MILEAGE_INPUT: &str = "mileage_input";
const ROUTE_INPUT: &str = "route_input";
const AVG_SPEED_INPUT: &str = "avg_speed_input";

pub async fn handle_component(
    ctx: &Context,
    state: &AppState,
    component: &ComponentInteraction,
) -> Result<()> {
    // Not one of ours (or a stale id from an old build): ignore.
    let Some(custom_id) = CustomId::parse(&component.data.custom_id) else {
        tracing::debug!(custom_id = %component.data.custom_id, "Ignoring unknown component");
        return Ok(());
    };

    match custom_id {
        CustomId::EditCancel { ride_id } => {
            tracing::debug!(%ride_id, "Edit cancelled");
            component
                .create_response(
                    &ctx.http,
                    CreateInteractionResponse::UpdateMessage(
                        CreateInteractionResponseMessage::new()
                            .content("❌ Edit cancelled.")
                            .embeds(vec![])
                            .components(vec![]),
                    ),
                )
                .await?;
            Ok(())
        }
        CustomId::EditButton { ride_id, section } => {
            let ride = state
                .store
                .get_ride(&ride_id)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound("Ride not found. It may have been deleted.".to_string())
                })?;

            ride.require_leader(&component.user.id.to_string())?;

            component
                .create_response(
                    &ctx.http,
                    CreateInteractionResponse::Modal(edit_modal(&ride, section)),
                )
                .await?;
            Ok(())
        }
        // Modal-only ids never arrive as components.
        CustomId::EditModal { .. } | CustomId::LocationModal { .. } => Ok(()),
    }
}

pub async fn handle_modal(
    ctx: &Context,
    state: &AppState,
    modal: &ModalInteraction,
) -> Result<()> {
    let Some(custom_id) = CustomId::parse(&modal.data.custom_id) else {
        tracing::debug!(custom_id = %modal.data.custom_id, "Ignoring unknown modal");
        return Ok(());
    };

    match custom_id {
        CustomId::LocationModal { session_key } => {
            create_ride::resume(ctx, state, modal, &session_key).await
        }
        CustomId::EditModal { ride_id, section } => {
            apply_edit(ctx, state, modal, &ride_id, section).await
        }
        CustomId::EditButton { .. } | CustomId::EditCancel { .. } => Ok(()),
    }
}

/// First input-text value in the modal with the given custom id.
pub(crate) fn modal_input<'a>(modal: &'a ModalInteraction, custom_id: &str) -> Option<&'a str> {
    modal.data.components.iter().find_map(|row| {
        row.components.iter().find_map(|component| match component {
            ActionRowComponent::InputText(input) if input.custom_id == custom_id => {
                input.value.as_deref()
            }
            _ => None,
        })
    })
}

/// Section edit form, prefilled from the ride's current values.
fn edit_modal(ride: &Ride, section: EditSection) -> CreateModal {
    let custom_id = CustomId::EditModal {
        ride_id: ride.id.clone(),
        section,
    };

    let rows = match section {
        EditSection::Schedule => vec![
            CreateActionRow::InputText(
                CreateInputText::new(InputTextStyle::Short, "Date (MM/DD)", DATE_INPUT)
                    .required(true)
                    .value(ride.date.format("%m/%d").to_string()),
            ),
            CreateActionRow::InputText(
                CreateInputText::new(InputTextStyle::Short, "Meet Time (HH:MM, 24-hour)", TIME_INPUT)
                    .required(true)
                    .value(format!("{:02}:{:02}", ride.meet_time.hours, ride.meet_time.minutes)),
            ),
            CreateActionRow::InputText(
                CreateInputText::new(InputTextStyle::Short, "Roll Time (minutes)", ROLL_TIME_INPUT)
                    .required(true)
                    .value(ride.roll_time.to_string()),
            ),
        ],
        EditSection::Locations => vec![
            CreateActionRow::InputText(
                CreateInputText::new(InputTextStyle::Short, "Starting Location", START_LOCATION_INPUT)
                    .required(true)
                    .value(ride.starting_location.clone()),
            ),
            CreateActionRow::InputText(
                CreateInputText::new(InputTextStyle::Short, "End Location", END_LOCATION_INPUT)
                    .required(false)
                    .value(ride.end_location.clone().unwrap_or_default()),
            ),
        ],
        EditSection::Details => vec![
            CreateActionRow::InputText(
                CreateInputText::new(InputTextStyle::Short, "Mileage", MILEAGE_INPUT)
                    .required(false)
                    .value(ride.mileage.map(|m| m.to_string()).unwrap_or_default()),
            ),
            CreateActionRow::InputText(
                CreateInputText::new(InputTextStyle::Short, "Route URL", ROUTE_INPUT)
                    .required(false)
                    .value(ride.route.clone().unwrap_or_default()),
            ),
            CreateActionRow::InputText(
                CreateInputText::new(InputTextStyle::Short, "Avg Speed (MPH)", AVG_SPEED_INPUT)
                    .required(false)
                    .value(ride.avg_speed.map(|s| s.to_string()).unwrap_or_default()),
            ),
        ],
    };

    CreateModal::new(custom_id.to_string(), format!("Edit {}", section.label())).components(rows)
}

/// Validate a section submission, persist the patch, and refresh the
/// public post.
async fn apply_edit(
    ctx: &Context,
    state: &AppState,
    modal: &ModalInteraction,
    ride_id: &str,
    section: EditSection,
) -> Result<()> {
    let ride = state
        .store
        .get_ride(ride_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ride not found. It may have been deleted.".to_string()))?;

    ride.require_leader(&modal.user.id.to_string())?;

    let today = commands::server_today(&state.store, &ride.server_id).await?;

    let update = match section {
        EditSection::Schedule => {
            let date = parse::parse_date(
                modal_input(modal, DATE_INPUT).unwrap_or_default(),
                today,
            )?;
            let meet_time =
                parse::parse_time(modal_input(modal, TIME_INPUT).unwrap_or_default())?;
            let roll_time =
                parse::parse_roll_time(modal_input(modal, ROLL_TIME_INPUT).unwrap_or_default())?;
            RideUpdate::Schedule {
                date,
                meet_time,
                roll_time,
            }
        }
        EditSection::Locations => {
            let starting_location = parse::validate_location(
                modal_input(modal, START_LOCATION_INPUT).unwrap_or_default(),
            )?;
            let end_location = match modal_input(modal, END_LOCATION_INPUT) {
                Some(text) if !text.trim().is_empty() => Some(parse::validate_location(text)?),
                _ => None,
            };
            RideUpdate::Locations {
                starting_location,
                end_location,
            }
        }
        EditSection::Details => {
            let mileage = match modal_input(modal, MILEAGE_INPUT) {
                Some(text) if !text.trim().is_empty() => Some(parse::parse_mileage(text)?),
                _ => None,
            };
            let route = match modal_input(modal, ROUTE_INPUT) {
                Some(text) if !text.trim().is_empty() => Some(parse::validate_route_url(text)?),
                _ => None,
            };
            let avg_speed = match modal_input(modal, AVG_SPEED_INPUT) {
                Some(text) if !text.trim().is_empty() => {
                    let speed: u32 = text.trim().parse().map_err(|_| {
                        AppError::InvalidValue(
                            "Average speed must be a positive number.".to_string(),
                        )
                    })?;
                    if speed == 0 {
                        return Err(AppError::InvalidValue(
                            "Average speed must be a positive number.".to_string(),
                        ));
                    }
                    Some(speed)
                }
                _ => None,
            };
            RideUpdate::Details {
                mileage,
                route,
                avg_speed,
            }
        }
    };

    let ride = state.store.update_ride(ride_id, update).await?;
    tracing::info!(%ride_id, section = section.as_str(), "Ride updated");

    refresh_post(ctx, state, &ride, today).await;

    let summary = CreateEmbed::new()
        .title("✅ Ride Updated Successfully")
        .colour(0x4ecdc4)
        .description(format!(
            "Your **{}** ride has been updated.",
            ride.ride_type.as_str().to_uppercase()
        ))
        .footer(CreateEmbedFooter::new("URG RideMaker • Edit Complete"));

    modal
        .create_response(
            &ctx.http,
            CreateInteractionResponse::UpdateMessage(
                CreateInteractionResponseMessage::new()
                    .embed(summary)
                    .components(vec![edit_ride::edit_buttons(&ride.id)]),
            ),
        )
        .await?;
    Ok(())
}

/// Re-render the public channel post after an edit. The edit itself has
/// already been saved, so failures here are logged and swallowed.
async fn refresh_post(ctx: &Context, state: &AppState, ride: &Ride, today: chrono::NaiveDate) {
    let Some(message_id) = &ride.message_id else {
        return;
    };
    let (Ok(channel), Ok(message)) = (ride.channel_id.parse::<u64>(), message_id.parse::<u64>())
    else {
        tracing::warn!(ride_id = %ride.id, "Stored channel or message id is not numeric");
        return;
    };

    let tz = match state.store.get_server_config(&ride.server_id).await {
        Ok(Some(config)) => config.tz(),
        _ => chrono_tz::America::Chicago,
    };

    let post = format_ride_post(ride, PostAction::Updated, today, tz);
    let edit = EditMessage::new().embed(embed_from_post(&post));
    if let Err(err) = ChannelId::new(channel)
        .edit_message(&ctx.http, message, edit)
        .await
    {
        tracing::warn!(ride_id = %ride.id, error = %err, "Failed to refresh ride post");
    }
}
