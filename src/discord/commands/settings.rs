// SPDX-License-Identifier: MIT

//! `/settings`: admin-only server configuration (channel mappings and
//! timezone). Missing configs are created with defaults on first write.

use serenity::builder::{
    CreateCommand, CreateCommandOption, CreateEmbed, CreateInteractionResponse,
    CreateInteractionResponseMessage,
};
use serenity::client::Context;
use serenity::model::application::{
    CommandInteraction, CommandOptionType, ResolvedOption, ResolvedValue,
};
use serenity::model::Permissions;

use crate::discord::commands;
use crate::error::{AppError, Result};
use crate::models::{RideType, ServerConfigPatch};
use crate::AppState;

pub fn register() -> CreateCommand {
    let channel = |name: &str, ride_type: &str| {
        CreateCommandOption::new(
            CommandOptionType::Channel,
            name,
            format!("Channel for {ride_type} rides"),
        )
        .required(false)
    };

    CreateCommand::new("settings")
        .description("Configure RideMaker for this server")
        .default_member_permissions(Permissions::ADMINISTRATOR)
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "channels",
                "Map ride types to channels",
            )
            .add_sub_option(channel("road-channel", "road"))
            .add_sub_option(channel("gravel-channel", "gravel"))
            .add_sub_option(channel("trail-channel", "trail"))
            .add_sub_option(channel("social-channel", "social")),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "timezone",
                "Set the server timezone",
            )
            .add_sub_option(
                CreateCommandOption::new(CommandOptionType::String, "zone", "IANA timezone")
                    .required(true)
                    .add_string_choice("Central (Chicago)", "America/Chicago")
                    .add_string_choice("Eastern (New York)", "America/New_York")
                    .add_string_choice("Mountain (Denver)", "America/Denver")
                    .add_string_choice("Pacific (Los Angeles)", "America/Los_Angeles"),
            ),
        )
        .add_option(CreateCommandOption::new(
            CommandOptionType::SubCommand,
            "view",
            "Show the current configuration",
        ))
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
    let (sub_name, sub_options): (&str, &[ResolvedOption<'_>]) = match options.first() {
        Some(ResolvedOption {
            name,
            value: ResolvedValue::SubCommand(sub),
            ..
        }) => (*name, sub.as_slice()),
        _ => {
            return Err(AppError::InvalidValue(
                "Unknown settings subcommand.".to_string(),
            ))
        }
    };

    let response = match sub_name {
        "channels" => set_channels(state, &server_id, sub_options).await?,
        "timezone" => set_timezone(state, &server_id, sub_options).await?,
        "view" => view(state, &server_id).await?,
        other => {
            return Err(AppError::InvalidValue(format!(
                "Unknown settings subcommand: {other}"
            )))
        }
    };

    command
        .create_response(&ctx.http, CreateInteractionResponse::Message(response))
        .await?;
    Ok(())
}

async fn apply_patch(
    state: &AppState,
    server_id: &str,
    patch: ServerConfigPatch,
) -> Result<crate::models::ServerConfig> {
    match state.store.get_server_config(server_id).await? {
        Some(_) => state.store.update_server_config(server_id, patch).await,
        None => state.store.create_server_config(server_id, patch).await,
    }
}

async fn set_channels(
    state: &AppState,
    server_id: &str,
    options: &[ResolvedOption<'_>],
) -> Result<CreateInteractionResponseMessage> {
    let mut patch = ServerConfigPatch::default();
    let pairs = [
        ("road-channel", RideType::Road),
        ("gravel-channel", RideType::Gravel),
        ("trail-channel", RideType::Trail),
        ("social-channel", RideType::Social),
    ];
    for (option_name, ride_type) in pairs {
        if let Some(channel) = commands::channel_option(options, option_name) {
            patch
                .channel_mappings
                .insert(ride_type, channel.id.to_string());
        }
    }

    if patch.channel_mappings.is_empty() {
        return Err(AppError::InvalidValue(
            "No channels specified. Provide at least one channel option.".to_string(),
        ));
    }

    let config = apply_patch(state, server_id, patch).await?;

    let mut lines = vec!["✅ Channel mappings updated:".to_string()];
    for ride_type in RideType::ALL {
        if let Some(channel_id) = config.channel_mappings.get(&ride_type) {
            lines.push(format!("• {} rides → <#{channel_id}>", ride_type));
        }
    }
    Ok(CreateInteractionResponseMessage::new()
        .content(lines.join("\n"))
        .ephemeral(true))
}

async fn set_timezone(
    state: &AppState,
    server_id: &str,
    options: &[ResolvedOption<'_>],
) -> Result<CreateInteractionResponseMessage> {
    let zone = commands::required_str(options, "zone")?;
    // Choices constrain input, but a stale client could send anything.
    let _: chrono_tz::Tz = zone
        .parse()
        .map_err(|_| AppError::InvalidValue(format!("Unknown timezone: {zone}")))?;

    let patch = ServerConfigPatch {
        timezone: Some(zone.to_string()),
        ..Default::default()
    };
    let config = apply_patch(state, server_id, patch).await?;

    Ok(CreateInteractionResponseMessage::new()
        .content(format!("✅ Server timezone set to **{}**.", config.timezone))
        .ephemeral(true))
}

async fn view(
    state: &AppState,
    server_id: &str,
) -> Result<CreateInteractionResponseMessage> {
    let config = state
        .store
        .get_server_config(server_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(
                "Server not configured yet. Run `/settings channels` to get started.".to_string(),
            )
        })?;

    let mut mappings = String::new();
    for ride_type in RideType::ALL {
        match config.channel_mappings.get(&ride_type) {
            Some(channel_id) => {
                mappings.push_str(&format!("• {} → <#{channel_id}>\n", ride_type));
            }
            None => mappings.push_str(&format!("• {} → *not set*\n", ride_type)),
        }
    }

    let embed = CreateEmbed::new()
        .title("⚙️ RideMaker Settings")
        .colour(0x4ecdc4)
        .field("Channel Mappings", mappings, false)
        .field("Timezone", config.timezone.clone(), true)
        .field(
            "Reminders",
            if config.settings.reminder_enabled {
                "enabled"
            } else {
                "disabled"
            },
            true,
        );

    Ok(CreateInteractionResponseMessage::new()
        .embed(embed)
        .ephemeral(true))
}
