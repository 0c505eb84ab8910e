// SPDX-License-Identifier: MIT

//! `/list-rides`: ephemeral embed of upcoming rides, optionally filtered
//! by type, soonest first.

use serenity::builder::{
    CreateCommand, CreateCommandOption, CreateEmbed, CreateEmbedFooter, CreateInteractionResponse,
    CreateInteractionResponseMessage,
};
use serenity::client::Context;
use serenity::model::application::{CommandInteraction, CommandOptionType};

use crate::discord::commands;
use crate::error::{AppError, Result};
use crate::models::RideType;
use crate::services::format::{format_date_with_today, format_time, DateStyle};
use crate::services::locations;
use crate::AppState;

pub fn register() -> CreateCommand {
    CreateCommand::new("list-rides")
        .description("List upcoming rides")
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "type", "Only show this ride type")
                .required(false)
                .add_string_choice("Road", "road")
                .add_string_choice("Gravel", "gravel")
                .add_string_choice("Trail", "trail")
                .add_string_choice("Social", "social"),
        )
}

pub async fn run(
    ctx: &Context,
    state: &AppState,
    command: &CommandInteraction,
) -> Result<()> {
    let guild_id = command
        .guild_id
        .ok_or_else(|| AppError::InvalidValue("This command only works in a server.".to_string()))?;
    let server_id = guild_id.to_string();

    let options = command.data.options();
    let filter = commands::str_option(&options, "type")
        .map(str::parse::<RideType>)
        .transpose()?;

    let today = commands::server_today(&state.store, &server_id).await?;
    let mut rides = state.store.get_active_rides(&server_id, today).await?;
    if let Some(ride_type) = filter {
        rides.retain(|ride| ride.ride_type == ride_type);
    }

    // Nothing scheduled is a normal answer, not an error.
    if rides.is_empty() {
        command
            .create_response(
                &ctx.http,
                CreateInteractionResponse::Message(
                    CreateInteractionResponseMessage::new()
                        .content(empty_notice(filter))
                        .ephemeral(true),
                ),
            )
            .await?;
        return Ok(());
    }

    let viewer_id = command.user.id.to_string();
    let mut lines = Vec::with_capacity(rides.len());
    for ride in &rides {
        let crown = if ride.leader.user_id == viewer_id {
            " 👑"
        } else {
            ""
        };
        let mut entry = format!(
            "**{} RIDE** — {} @ {}{}\n",
            ride.ride_type.as_str().to_uppercase(),
            format_date_with_today(ride.date, today, DateStyle::Short),
            format_time(ride.meet_time),
            crown,
        );
        entry.push_str(&format!("Ride ID: `{}`\n", ride.id));
        entry.push_str(&format!("Leader: <@{}>\n", ride.leader.user_id));
        entry.push_str(&format!(
            "Start: {}\n",
            locations::display(&ride.starting_location)
        ));
        if let Some(mileage) = ride.mileage {
            entry.push_str(&format!("Distance: {mileage} miles\n"));
        }
        lines.push(entry);
    }

    let embed = CreateEmbed::new()
        .title("🚴‍♂️ Active Rides")
        .colour(0x4ecdc4)
        .description(lines.join("\n"))
        .footer(CreateEmbedFooter::new(format!(
            "{} upcoming ride{}",
            rides.len(),
            if rides.len() == 1 { "" } else { "s" }
        )));

    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .embed(embed)
                    .ephemeral(true),
            ),
        )
        .await?;
    Ok(())
}

/// Friendly reply for a guild with nothing on the calendar.
fn empty_notice(filter: Option<RideType>) -> String {
    let label = filter.map(|t| format!("{t} ")).unwrap_or_default();
    format!("No upcoming {label}rides. Create one with `/create-ride`!")
}
