// start.rs - Start Command Module
// Greets the user and explains how to search.
//
// Used by: main.rs (command registration), slash.rs (/start)

use serenity::{
    client::Context,
    framework::standard::{macros::command, CommandResult},
    model::channel::Message,
};

pub const WELCOME_TEXT: &str = "Welcome to TeTube! Please enter a query to search for YouTube videos.\n\n\
In a server, mention me followed by your query. In direct messages, just type it.\n\n\
Type `/about` for more information.";

#[command]
#[aliases("hello")]
/// Main ^start command handler
pub async fn start(ctx: &Context, msg: &Message) -> CommandResult {
    msg.reply(ctx, WELCOME_TEXT).await?;
    Ok(())
}
