// SPDX-License-Identifier: MIT

//! Discord gateway event handling.
//!
//! `Handler` is the serenity [`EventHandler`]: it registers slash commands
//! on ready, decodes component/modal custom ids once at the boundary, and
//! routes commands, buttons, modal submissions, and reactions to their
//! handlers. Every handler path produces exactly one user-visible response,
//! even on error.

pub mod commands;
pub mod custom_id;
pub mod interactions;

use std::sync::Arc;

use serenity::async_trait;
use serenity::builder::{
    CreateEmbed, CreateEmbedFooter, CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage,
};
use serenity::client::{Context, EventHandler};
use serenity::model::application::{
    Command, CommandInteraction, ComponentInteraction, Interaction, ModalInteraction,
};
use serenity::model::channel::{Reaction, ReactionType};
use serenity::model::gateway::Ready;

use crate::error::AppError;
use crate::models::{AttendeeAction, AttendeeKind};
use crate::services::format::RidePost;
use crate::AppState;

/// Reaction meaning "I'm in".
pub const EMOJI_GOING: &str = "🚴‍♂️";
/// Reaction meaning "maybe".
pub const EMOJI_MAYBE: &str = "🤔";

pub struct Handler {
    state: Arc<AppState>,
}

impl Handler {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    async fn handle_reaction(&self, ctx: &Context, reaction: &Reaction, action: AttendeeAction) {
        // Bot-authored reactions never count, including our own seed emoji.
        if reaction.member.as_ref().is_some_and(|m| m.user.bot) {
            return;
        }
        let me = ctx.cache.current_user().id;
        let Some(user_id) = reaction.user_id else {
            return;
        };
        if user_id == me {
            return;
        }

        let kind = match &reaction.emoji {
            ReactionType::Unicode(emoji) if emoji == EMOJI_GOING => AttendeeKind::Going,
            ReactionType::Unicode(emoji) if emoji == EMOJI_MAYBE => AttendeeKind::Maybe,
            _ => return,
        };

        let message_id = reaction.message_id.to_string();
        match self.state.store.find_ride_by_message(&message_id).await {
            Ok(Some(ride)) => {
                if let Err(err) = self
                    .state
                    .store
                    .update_ride_attendees(&ride.id, kind, &user_id.to_string(), action)
                    .await
                {
                    tracing::error!(ride_id = %ride.id, error = %err, "Failed to update attendees");
                } else {
                    tracing::debug!(
                        ride_id = %ride.id,
                        user_id = %user_id,
                        ?kind,
                        ?action,
                        "Attendee set updated"
                    );
                }
            }
            Ok(None) => {} // Not a ride message
            Err(err) => {
                tracing::error!(%message_id, error = %err, "Reaction lookup failed");
            }
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        tracing::info!(user = %ready.user.name, "Bot is ready");

        if let Ok(mut bot_user) = self.state.bot_user.write() {
            *bot_user = Some(ready.user.tag());
        }

        if let Err(err) = Command::set_global_commands(&ctx.http, commands::all()).await {
            tracing::error!(error = %err, "Failed to register slash commands");
        } else {
            tracing::info!("Slash commands registered");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Command(command) => {
                let name = command.data.name.clone();
                tracing::debug!(command = %name, user = %command.user.id, "Slash command received");

                let result = match name.as_str() {
                    "create-ride" => commands::create_ride::run(&ctx, &self.state, &command).await,
                    "edit-ride" => commands::edit_ride::run(&ctx, &self.state, &command).await,
                    "list-rides" => commands::list_rides::run(&ctx, &self.state, &command).await,
                    "settings" => commands::settings::run(&ctx, &self.state, &command).await,
                    "status" => commands::diagnostics::status(&ctx, &self.state, &command).await,
                    "dbstatus" => commands::diagnostics::dbstatus(&ctx, &self.state, &command).await,
                    "ping" => commands::diagnostics::ping(&ctx, &command).await,
                    other => {
                        tracing::warn!(command = %other, "Unknown command received");
                        Ok(())
                    }
                };

                if let Err(err) = result {
                    tracing::error!(command = %name, error = %err, "Command failed");
                    report_command_error(&ctx, &command, &err).await;
                }
            }
            Interaction::Component(component) => {
                if let Err(err) =
                    interactions::handle_component(&ctx, &self.state, &component).await
                {
                    tracing::error!(
                        custom_id = %component.data.custom_id,
                        error = %err,
                        "Component interaction failed"
                    );
                    report_component_error(&ctx, &component, &err).await;
                }
            }
            Interaction::Modal(modal) => {
                if let Err(err) = interactions::handle_modal(&ctx, &self.state, &modal).await {
                    tracing::error!(
                        custom_id = %modal.data.custom_id,
                        error = %err,
                        "Modal submission failed"
                    );
                    report_modal_error(&ctx, &modal, &err).await;
                }
            }
            _ => {}
        }
    }

    async fn reaction_add(&self, ctx: Context, reaction: Reaction) {
        self.handle_reaction(&ctx, &reaction, AttendeeAction::Add)
            .await;
    }

    async fn reaction_remove(&self, ctx: Context, reaction: Reaction) {
        self.handle_reaction(&ctx, &reaction, AttendeeAction::Remove)
            .await;
    }
}

/// Build a serenity embed from a rendered ride post.
pub(crate) fn embed_from_post(post: &RidePost) -> CreateEmbed {
    CreateEmbed::new()
        .title(post.title.clone())
        .colour(post.color)
        .description(post.description.clone())
        .footer(CreateEmbedFooter::new(post.footer.clone()))
}

fn ephemeral_message(content: &str) -> CreateInteractionResponseMessage {
    CreateInteractionResponseMessage::new()
        .content(content.to_string())
        .ephemeral(true)
}

/// Guarantee one user-visible response for a failed command: an initial
/// reply if nothing was sent yet, otherwise a follow-up.
async fn report_command_error(ctx: &Context, command: &CommandInteraction, err: &AppError) {
    let content = err.user_message();
    let reply = CreateInteractionResponse::Message(ephemeral_message(&content));
    if command.create_response(&ctx.http, reply).await.is_err() {
        let followup = CreateInteractionResponseFollowup::new()
            .content(content)
            .ephemeral(true);
        if let Err(err) = command.create_followup(&ctx.http, followup).await {
            tracing::error!(error = %err, "Failed to deliver error response");
        }
    }
}

async fn report_component_error(ctx: &Context, component: &ComponentInteraction, err: &AppError) {
    let content = err.user_message();
    let reply = CreateInteractionResponse::Message(ephemeral_message(&content));
    if component.create_response(&ctx.http, reply).await.is_err() {
        let followup = CreateInteractionResponseFollowup::new()
            .content(content)
            .ephemeral(true);
        if let Err(err) = component.create_followup(&ctx.http, followup).await {
            tracing::error!(error = %err, "Failed to deliver error response");
        }
    }
}

async fn report_modal_error(ctx: &Context, modal: &ModalInteraction, err: &AppError) {
    let content = err.user_message();
    let reply = CreateInteractionResponse::Message(ephemeral_message(&content));
    if modal.create_response(&ctx.http, reply).await.is_err() {
        let followup = CreateInteractionResponseFollowup::new()
            .content(content)
            .ephemeral(true);
        if let Err(err) = modal.create_followup(&ctx.http, followup).await {
            tracing::error!(error = %err, "Failed to deliver error response");
        }
    }
}
