// SPDX-License-Identifier: MIT

//! `/create-ride`: validate input, persist, post to the mapped channel,
//! seed RSVP reactions, and DM the leader an edit panel.
//!
//! When a location is "Other" the flow suspends into a free-text modal;
//! the parsed draft waits in the session store until the submission
//! arrives (see [`crate::services::sessions`]).

use chrono_tz::Tz;
use serenity::builder::{
    CreateActionRow, CreateCommand, CreateCommandOption, CreateInputText,
    CreateInteractionResponse, CreateInteractionResponseMessage, CreateMessage, CreateModal,
};
use serenity::client::Context;
use serenity::model::application::{CommandInteraction, CommandOptionType, InputTextStyle};
use serenity::model::channel::ReactionType;
use serenity::model::id::ChannelId;
use serenity::model::user::User;

use crate::discord::custom_id::CustomId;
use crate::discord::{commands, embed_from_post, EMOJI_GOING, EMOJI_MAYBE};
use crate::error::{AppError, Result};
use crate::models::{DropPolicy, Pace, Rider, RideDraft, RideType, RideUpdate};
use crate::services::format::{format_ride_post, PostAction};
use crate::services::sessions::DraftSessions;
use crate::services::{locations, parse};
use crate::AppState;

const STARTING_LOCATION_INPUT: &str = "starting_location_input";
const END_LOCATION_INPUT: &str = "end_location_input";

pub fn register() -> CreateCommand {
    let mut starting = CreateCommandOption::new(
        CommandOptionType::String,
        "starting-location",
        "Where the ride starts (defaults by time of day)",
    )
    .required(false);
    let mut ending = CreateCommandOption::new(
        CommandOptionType::String,
        "end-location",
        "Where the ride ends",
    )
    .required(false);
    for location in &locations::LOCATIONS {
        starting = starting.add_string_choice(location.name, location.key);
        ending = ending.add_string_choice(location.name, location.key);
    }
    starting = starting.add_string_choice("Other", locations::OTHER);
    ending = ending.add_string_choice("Other", locations::OTHER);

    CreateCommand::new("create-ride")
        .description("Create a new bike ride")
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "type", "Type of ride")
                .required(true)
                .add_string_choice("Road", "road")
                .add_string_choice("Gravel", "gravel")
                .add_string_choice("Trail", "trail")
                .add_string_choice("Social", "social"),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "pace", "Ride pace")
                .required(true)
                .add_string_choice("Spicy", "spicy")
                .add_string_choice("Party", "party"),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "date",
                "Ride date (MM/DD, Today, or Tomorrow)",
            )
            .required(true),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "meet-time",
                "Meet time (HH:MM or HH:MM AM/PM)",
            )
            .required(true),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "mileage",
                "Distance in miles (or km)",
            )
            .required(false),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "route",
                "Strava or RideWithGPS route URL",
            )
            .required(false),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::Integer,
                "avg-speed",
                "Average speed in MPH (required for Spicy pace)",
            )
            .required(false)
            .min_int_value(1),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::Integer,
                "roll-time",
                "Roll time offset in minutes",
            )
            .required(false)
            .add_int_choice("+5 minutes", 5)
            .add_int_choice("+15 minutes", 15)
            .add_int_choice("+30 minutes", 30),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::User, "sweep", "Sweep rider")
                .required(false),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "drop-policy",
                "Drop policy (auto-set for Party pace)",
            )
            .required(false)
            .add_string_choice("Drop", "drop")
            .add_string_choice("No Drop", "no-drop")
            .add_string_choice("Regroup", "regroup"),
        )
        .add_option(starting)
        .add_option(ending)
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

    let config = state
        .store
        .get_server_config(&server_id)
        .await?
        .ok_or_else(|| {
            AppError::InvalidValue(
                "Server not configured. Please run `/settings channels` first to set up channel mappings."
                    .to_string(),
            )
        })?;

    let options = command.data.options();

    let ride_type: RideType = commands::required_str(&options, "type")?.parse()?;
    let channel_id = config
        .channel_mappings
        .get(&ride_type)
        .cloned()
        .ok_or_else(|| {
            AppError::InvalidValue(format!(
                "No channel configured for {ride_type} rides. Please run `/settings channels` to set up channel mappings."
            ))
        })?;

    let pace: Pace = commands::required_str(&options, "pace")?.parse()?;

    let avg_speed = commands::int_option(&options, "avg-speed")
        .map(|raw| commands::positive_u32(raw, "Average speed"))
        .transpose()?;

    let tz = config.tz();
    let today = chrono::Utc::now().with_timezone(&tz).date_naive();

    let date = parse::parse_date(commands::required_str(&options, "date")?, today)?;
    let meet_time = parse::parse_time(commands::required_str(&options, "meet-time")?)?;
    let mileage = commands::str_option(&options, "mileage")
        .map(parse::parse_mileage)
        .transpose()?;
    let route = commands::str_option(&options, "route")
        .map(parse::validate_route_url)
        .transpose()?;
    let roll_time = match commands::int_option(&options, "roll-time") {
        Some(raw) => commands::positive_u32(raw, "Roll time")?,
        None => 15,
    };

    let requested_policy = commands::str_option(&options, "drop-policy")
        .map(str::parse::<DropPolicy>)
        .transpose()?;
    let drop_policy = DropPolicy::resolve(pace, requested_policy);

    let starting_location = match commands::str_option(&options, "starting-location") {
        Some(choice) => parse::validate_location(choice)?,
        None => locations::default_starting_location(meet_time.hours).to_string(),
    };
    let end_location = commands::str_option(&options, "end-location")
        .map(parse::validate_location)
        .transpose()?;

    let draft = RideDraft {
        server_id,
        channel_id,
        ride_type,
        pace,
        drop_policy,
        date,
        meet_time,
        roll_time,
        mileage,
        route,
        avg_speed,
        starting_location,
        end_location,
        leader: Rider {
            user_id: command.user.id.to_string(),
            username: command.user.name.clone(),
        },
        sweep: commands::user_option(&options, "sweep").map(|user| Rider {
            user_id: user.id.to_string(),
            username: user.name.clone(),
        }),
    };
    draft.validate()?;

    // "Other" suspends into the free-text modal; the draft waits in the
    // session store under this user + interaction.
    if draft.starting_location == locations::OTHER
        || draft.end_location.as_deref() == Some(locations::OTHER)
    {
        let session_key = DraftSessions::key(command.user.id.get(), command.id.get());
        state.sessions.put(session_key.clone(), draft);
        let modal = location_modal(&session_key);
        command
            .create_response(&ctx.http, CreateInteractionResponse::Modal(modal))
            .await?;
        return Ok(());
    }

    let confirmation = finalize(ctx, state, tz, draft, &command.user).await?;
    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .content(confirmation)
                    .ephemeral(true),
            ),
        )
        .await?;
    Ok(())
}

/// Resume a creation suspended on the location modal.
pub async fn resume(
    ctx: &Context,
    state: &AppState,
    modal: &serenity::model::application::ModalInteraction,
    session_key: &str,
) -> Result<()> {
    let mut draft = state.sessions.take(session_key)?;

    if draft.starting_location == locations::OTHER {
        let input = crate::discord::interactions::modal_input(modal, STARTING_LOCATION_INPUT)
            .unwrap_or("");
        draft.starting_location = if input.trim().is_empty() {
            // No custom input; fall back to the time-of-day default.
            locations::default_starting_location(draft.meet_time.hours).to_string()
        } else {
            parse::validate_location(input)?
        };
    }

    if draft.end_location.as_deref() == Some(locations::OTHER) {
        let input =
            crate::discord::interactions::modal_input(modal, END_LOCATION_INPUT).unwrap_or("");
        if input.trim().is_empty() {
            return Err(AppError::InvalidValue(
                "End location is required when \"Other\" is selected.".to_string(),
            ));
        }
        draft.end_location = Some(parse::validate_location(input)?);
    }

    let tz = state
        .store
        .get_server_config(&draft.server_id)
        .await?
        .map(|config| config.tz())
        .unwrap_or(chrono_tz::America::Chicago);

    let confirmation = finalize(ctx, state, tz, draft, &modal.user).await?;
    modal
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .content(confirmation)
                    .ephemeral(true),
            ),
        )
        .await?;
    Ok(())
}

/// Persist the draft, post it, seed reactions, and notify the leader.
/// Returns the confirmation line for the ephemeral reply.
async fn finalize(
    ctx: &Context,
    state: &AppState,
    tz: Tz,
    draft: RideDraft,
    leader: &User,
) -> Result<String> {
    let ride = state.store.create_ride(draft).await?;

    let channel = ChannelId::new(
        ride.channel_id
            .parse()
            .map_err(|_| AppError::Discord(format!("Bad channel id {}", ride.channel_id)))?,
    );

    let today = chrono::Utc::now().with_timezone(&tz).date_naive();
    let post = format_ride_post(&ride, PostAction::Created, today, tz);
    let message = channel
        .send_message(&ctx.http, CreateMessage::new().embed(embed_from_post(&post)))
        .await?;

    message
        .react(&ctx.http, ReactionType::Unicode(EMOJI_GOING.to_string()))
        .await?;
    message
        .react(&ctx.http, ReactionType::Unicode(EMOJI_MAYBE.to_string()))
        .await?;

    let ride = state
        .store
        .update_ride(
            &ride.id,
            RideUpdate::MessageRef {
                message_id: message.id.to_string(),
            },
        )
        .await?;

    tracing::info!(ride_id = %ride.id, channel = %ride.channel_id, "Ride created and posted");

    // Private notification is best-effort; DMs may be disabled.
    let dm = CreateMessage::new()
        .content("Your ride is posted! You can edit it below.")
        .embed(embed_from_post(&post))
        .components(vec![super::edit_ride::edit_buttons(&ride.id)]);

    match leader.dm(&ctx.http, dm).await {
        Ok(_) => Ok(format!(
            "✅ Ride created successfully! Posted to <#{}>. Check your DMs for edit options.",
            ride.channel_id
        )),
        Err(err) => {
            tracing::warn!(ride_id = %ride.id, error = %err, "Leader DM failed");
            Ok(format!(
                "✅ Ride created successfully! Posted to <#{}>. I couldn't DM you — use `/edit-ride ride-id:{}` to edit.",
                ride.channel_id, ride.id
            ))
        }
    }
}

/// Free-text location form shown when a location choice is "Other".
fn location_modal(session_key: &str) -> CreateModal {
    let custom_id = CustomId::LocationModal {
        session_key: session_key.to_string(),
    };
    CreateModal::new(custom_id.to_string(), "Custom Locations").components(vec![
        CreateActionRow::InputText(
            CreateInputText::new(
                InputTextStyle::Short,
                "Starting Location",
                STARTING_LOCATION_INPUT,
            )
            .required(false)
            .placeholder("Leave blank for the usual spot"),
        ),
        CreateActionRow::InputText(
            CreateInputText::new(InputTextStyle::Short, "End Location", END_LOCATION_INPUT)
                .required(false),
        ),
    ])
}
