// help.rs - Help Command Module
// Lists what the bot understands.

use serenity::{
    client::Context,
    framework::standard::{macros::command, CommandResult},
    model::channel::Message,
};

pub fn help_text(prefix: &str) -> String {
    format!(
        "**TeTube - Command Help**\n\n\
        **Searching:**\n\
        • Direct message: just type your query\n\
        • Server: `@TeTube <query>`\n\
        • Press **More Videos** under a result for the next page\n\n\
        **Commands:**\n\
        • `{0}start` or `/start` - Start the bot and enter a query\n\
        • `{0}about` or `/about` - Information about the bot and the developer\n\
        • `{0}help` - Show this help message",
        prefix
    )
}

#[command]
#[aliases("h", "commands")]
/// Display help information for all available commands
pub async fn help(ctx: &Context, msg: &Message) -> CommandResult {
    let prefix = {
        let data = ctx.data.read().await;
        data.get::<crate::PrefixKey>().cloned().unwrap_or_else(|| crate::config::DEFAULT_PREFIX.to_string())
    };
    msg.reply(ctx, help_text(&prefix)).await?;
    Ok(())
}
