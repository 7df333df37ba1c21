// slash.rs - Slash Commands Module
// Registers /start and /about as global application commands and answers
// them, so the bot's command menu shows up in Discord's native interface.

use log::info;
use serenity::{
    client::Context,
    http::Http,
    model::application::{
        command::Command,
        interaction::{application_command::ApplicationCommandInteraction, InteractionResponseType},
    },
};

use super::about::{about_links, ABOUT_TEXT};
use super::start::WELCOME_TEXT;

// ============================================================================
// SLASH COMMAND HANDLER
// ============================================================================

/// Handle slash command interactions
pub async fn handle_slash_command(ctx: &Context, interaction: &ApplicationCommandInteraction) -> serenity::Result<()> {
    let command_name = interaction.data.name.as_str();

    interaction
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| match command_name {
                    "start" => message.content(WELCOME_TEXT),
                    "about" => message.content(ABOUT_TEXT).components(about_links),
                    other => message.content(format!("Unknown slash command: {}", other)),
                })
        })
        .await
}

// ============================================================================
// SLASH COMMAND REGISTRATION
// ============================================================================

/// Register all slash commands with Discord
pub async fn register_slash_commands(http: &Http) -> serenity::Result<()> {
    let commands = vec![
        Command::create_global_application_command(http, |command| {
            command
                .name("start")
                .description("Start the bot and enter a query")
        })
        .await?,
        Command::create_global_application_command(http, |command| {
            command
                .name("about")
                .description("Get information about the bot and the developer")
        })
        .await?,
    ];

    info!("Registered {} slash commands with Discord", commands.len());
    Ok(())
}
