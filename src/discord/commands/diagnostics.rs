// SPDX-License-Identifier: MIT

//! `/status`, `/dbstatus`, `/ping`: operational health from inside Discord.

use std::time::Instant;

use serenity::builder::{
    CreateCommand, CreateEmbed, CreateEmbedFooter, CreateInteractionResponse,
    CreateInteractionResponseMessage, EditInteractionResponse,
};
use serenity::client::Context;
use serenity::model::application::CommandInteraction;

use crate::error::Result;
use crate::AppState;

const HEALTHY: u32 = 0x00ff00;
const DEGRADED: u32 = 0xffaa00;
const DOWN: u32 = 0xff0000;

pub fn register_status() -> CreateCommand {
    CreateCommand::new("status").description("Full bot health report")
}

pub fn register_dbstatus() -> CreateCommand {
    CreateCommand::new("dbstatus").description("Check database connectivity")
}

pub fn register_ping() -> CreateCommand {
    CreateCommand::new("ping").description("Check bot latency")
}

const DISCORD_EPOCH_MS: i64 = 1_420_070_400_000;

/// Gateway latency approximated from the interaction snowflake timestamp.
fn interaction_latency_ms(command: &CommandInteraction) -> i64 {
    let sent_ms = ((command.id.get() >> 22) as i64) + DISCORD_EPOCH_MS;
    (chrono::Utc::now().timestamp_millis() - sent_ms).max(0)
}

fn format_uptime(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

pub async fn status(
    ctx: &Context,
    state: &AppState,
    command: &CommandInteraction,
) -> Result<()> {
    // The database probe can exceed the 3s interaction deadline.
    command.defer_ephemeral(&ctx.http).await?;
    let started = Instant::now();

    let latency = interaction_latency_ms(command);
    let uptime = format_uptime(state.started_at.elapsed().as_secs());

    let db_started = Instant::now();
    let db_result = state.store.ping().await;
    let db_ms = db_started.elapsed().as_millis();

    let (color, overall, db_line) = match &db_result {
        Ok(()) => (HEALTHY, "✅ All systems operational", format!("✅ Connected ({db_ms}ms)")),
        Err(err) => {
            tracing::error!(error = %err, "Database health probe failed");
            let color = if latency < 1000 { DEGRADED } else { DOWN };
            (color, "⚠️ Degraded: database unreachable", "❌ Unreachable".to_string())
        }
    };

    let total_ms = started.elapsed().as_millis();
    let embed = CreateEmbed::new()
        .title("🤖 Bot Status")
        .colour(color)
        .field("Overall Health", overall, false)
        .field("Gateway Latency", format!("{latency}ms"), true)
        .field("Uptime", uptime, true)
        .field("Database", db_line, true)
        .field("Last Check", chrono::Utc::now().format("%H:%M:%S UTC").to_string(), true)
        .field("Total Response", format!("{total_ms}ms"), true)
        .footer(CreateEmbedFooter::new("URG RideMaker"));

    command
        .edit_response(&ctx.http, EditInteractionResponse::new().embed(embed))
        .await?;
    Ok(())
}

pub async fn dbstatus(
    ctx: &Context,
    state: &AppState,
    command: &CommandInteraction,
) -> Result<()> {
    command.defer_ephemeral(&ctx.http).await?;

    let started = Instant::now();
    let result = state.store.ping().await;
    let elapsed_ms = started.elapsed().as_millis();

    let embed = match result {
        Ok(()) => CreateEmbed::new()
            .title("🗄️ Database Status")
            .colour(HEALTHY)
            .field("Connection", format!("✅ Connected ({elapsed_ms}ms)"), true)
            .field("Project", state.config.gcp_project_id.clone(), true),
        Err(err) => {
            tracing::error!(error = %err, "dbstatus probe failed");
            CreateEmbed::new()
                .title("🗄️ Database Status")
                .colour(DOWN)
                .field("Connection", "❌ Unreachable", true)
                .field("Project", state.config.gcp_project_id.clone(), true)
        }
    };

    command
        .edit_response(&ctx.http, EditInteractionResponse::new().embed(embed))
        .await?;
    Ok(())
}

pub async fn ping(ctx: &Context, command: &CommandInteraction) -> Result<()> {
    let latency = interaction_latency_ms(command);
    let embed = CreateEmbed::new()
        .title("🏓 Pong!")
        .colour(HEALTHY)
        .description(format!("Latency: {latency}ms"));

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
