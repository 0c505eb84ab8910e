// SPDX-License-Identifier: MIT

//! `/edit-ride`: DM the ride leader a panel of section edit buttons.

use serenity::builder::{
    CreateActionRow, CreateButton, CreateCommand, CreateCommandOption, CreateEmbed,
    CreateEmbedFooter, CreateInteractionResponse, CreateInteractionResponseMessage, CreateMessage,
};
use serenity::client::Context;
use serenity::model::application::{ButtonStyle, CommandInteraction, CommandOptionType};

use crate::discord::commands;
use crate::discord::custom_id::{CustomId, EditSection};
use crate::error::{AppError, Result};
use crate::AppState;

pub fn register() -> CreateCommand {
    CreateCommand::new("edit-ride")
        .description("Edit one of your rides")
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "ride-id",
                "The ride ID from your creation confirmation",
            )
            .required(true),
        )
}

pub async fn run(
    ctx: &Context,
    state: &AppState,
    command: &CommandInteraction,
) -> Result<()> {
    let options = command.data.options();
    let ride_id = commands::required_str(&options, "ride-id")?;

    let ride = state
        .store
        .get_ride(ride_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ride not found. Please check the ride ID.".to_string()))?;

    ride.require_leader(&command.user.id.to_string())?;

    let today = commands::server_today(&state.store, &ride.server_id).await?;
    if ride.date < today {
        return Err(AppError::InvalidValue("Cannot edit past rides.".to_string()));
    }

    let panel = CreateEmbed::new()
        .title("🚴‍♂️ Edit Ride Options")
        .colour(0x4ecdc4)
        .description(format!(
            "Choose what to edit for your **{}** ride on **{}**:",
            ride.ride_type.as_str().to_uppercase(),
            ride.date.format("%m/%d/%Y"),
        ))
        .footer(CreateEmbedFooter::new("URG RideMaker • Edit Ride"));

    let dm = CreateMessage::new()
        .embed(panel)
        .components(vec![edit_buttons(&ride.id)]);

    let reply = match command.user.dm(&ctx.http, dm).await {
        Ok(_) => "✅ Edit options sent to your DM! Check your direct messages.".to_string(),
        Err(err) => {
            tracing::warn!(ride_id = %ride.id, error = %err, "Edit panel DM failed");
            "❌ Unable to send DM. Please check that DMs from server members are enabled."
                .to_string()
        }
    };

    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .content(reply)
                    .ephemeral(true),
            ),
        )
        .await?;
    Ok(())
}

/// The section buttons shown under the edit panel and the post-edit summary.
pub(crate) fn edit_buttons(ride_id: &str) -> CreateActionRow {
    let button = |section: EditSection, label: &str| {
        let id = CustomId::EditButton {
            ride_id: ride_id.to_string(),
            section,
        };
        CreateButton::new(id.to_string())
            .label(label)
            .style(ButtonStyle::Primary)
    };

    let cancel = CustomId::EditCancel {
        ride_id: ride_id.to_string(),
    };

    CreateActionRow::Buttons(vec![
        button(EditSection::Schedule, "📅 Date/Time"),
        button(EditSection::Locations, "📍 Location"),
        button(EditSection::Details, "📝 Details"),
        CreateButton::new(cancel.to_string())
            .label("❌ Cancel")
            .style(ButtonStyle::Danger),
    ])
}
