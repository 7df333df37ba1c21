mod commands;
mod config;
mod error;
mod query;
mod ranking;
mod reply;
mod session;
mod youtube;

use serenity::{
    async_trait,
    client::{Client, Context, EventHandler},
    framework::standard::{macros::group, StandardFramework},
    model::{application::interaction::Interaction, channel::Message, gateway::Ready},
    prelude::GatewayIntents,
    prelude::TypeMapKey,
};
use std::process;
use std::sync::Arc;
use tokio::signal;

use crate::commands::search::{extract_query, handle_more_button, handle_query_message};
use crate::commands::slash::{handle_slash_command, register_slash_commands};
use crate::config::BotConfig;
use crate::query::{QueryHandler, QueryHandlerKey};
use crate::youtube::YouTubeClient;

// TypeMap key for the configured command prefix
pub struct PrefixKey;
impl TypeMapKey for PrefixKey {
    type Value = String;
}

// Import all command constants generated by the #[command] macro
use crate::commands::about::ABOUT_COMMAND;
use crate::commands::help::HELP_COMMAND;
use crate::commands::start::START_COMMAND;

// Command group declaration - includes all available commands
#[group]
#[commands(start, about, help)]
struct General;

// Event handler implementation
struct Handler {
    prefix: String,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        log::info!("Bot connected as {} (ID: {})", ready.user.name, ready.user.id);
        println!("✅ Bot connected as {}!", ready.user.name);

        if let Err(e) = register_slash_commands(&ctx.http).await {
            log::error!("Failed to register slash commands: {:?}", e);
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        // Commands are dispatched by the framework, bots are never answered
        if msg.author.bot || msg.content.starts_with(&self.prefix) {
            return;
        }

        let bot_id = ctx.cache.current_user_id();
        let is_direct = msg.guild_id.is_none();
        let Some(query) = extract_query(&msg.content, bot_id, is_direct, msg.mentions_user_id(bot_id)) else {
            return;
        };

        if let Err(e) = handle_query_message(&ctx, &msg, &query).await {
            log::error!("Failed to answer query from user {} ({}): {:?}", msg.author.name, msg.author.id, e);
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::ApplicationCommand(command) => {
                if let Err(e) = handle_slash_command(&ctx, &command).await {
                    log::error!("Slash command '{}' failed: {:?}", command.data.name, e);
                }
            }
            Interaction::MessageComponent(component) => {
                if let Err(e) = handle_more_button(&ctx, &component).await {
                    log::error!("Button '{}' failed for user {}: {:?}", component.data.custom_id, component.user.id, e);
                }
            }
            _ => {}
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize logger - must be done before any logging calls
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("tetube_bot=info,serenity=warn"))
        .format_timestamp_secs()
        .init();

    let config = match BotConfig::load() {
        Ok(config) => config,
        Err(error) => {
            log::error!("❌ Failed to load configuration: {}", error);
            eprintln!("❌ Failed to load configuration: {}", error);
            eprintln!("Set DISCORD_TOKEN and YT_API_KEY in the environment or in a botconfig.txt file");
            process::exit(1);
        }
    };

    println!("🤖 Starting bot with prefix: '{}'", config.prefix);

    // Set up command framework
    let framework = StandardFramework::new()
        .configure(|c| {
            c.prefix(&config.prefix)
                .case_insensitivity(true)
                .with_whitespace(true)
        })
        .after(|_ctx, msg, command_name, result| {
            Box::pin(async move {
                if let Err(e) = result {
                    log::error!("❌ Command '{}' failed for user {} ({}): {:?}", command_name, msg.author.name, msg.author.id, e);
                }
            })
        })
        .group(&GENERAL_GROUP);

    // Configure bot intents
    let intents = GatewayIntents::non_privileged()
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::DIRECT_MESSAGES;

    let mut client = match Client::builder(&config.discord_token, intents)
        .event_handler(Handler { prefix: config.prefix.clone() })
        .framework(framework)
        .await
    {
        Ok(client) => client,
        Err(e) => {
            log::error!("❌ Error creating Discord client: {:?}", e);
            eprintln!("Check DISCORD_TOKEN in your environment or botconfig.txt");
            process::exit(1);
        }
    };

    // Shared query handler with its session store
    {
        let api = Arc::new(YouTubeClient::new(config.api_base_url.clone(), config.youtube_api_key.clone()));
        let handler = QueryHandler::new(
            api,
            config.session_ttl(),
            config.session_capacity,
        );

        let mut data = client.data.write().await;
        data.insert::<QueryHandlerKey>(Arc::new(handler));
        data.insert::<PrefixKey>(config.prefix.clone());
    }

    // Set up graceful shutdown on CTRL+C
    println!("🚀 Bot is running... Press Ctrl+C to stop");
    tokio::select! {
        _ = signal::ctrl_c() => {
            println!("\n⏹️ Stopping bot gracefully...");
        }
        result = client.start() => {
            if let Err(why) = result {
                log::error!("❌ Client error: {:?}", why);
            }
        }
    }

    client.shard_manager.lock().await.shutdown_all().await;
    println!("✅ Bot stopped");
}
