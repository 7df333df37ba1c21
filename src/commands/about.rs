// about.rs - About Command Module
// Describes the bot and links to the developer.
//
// Used by: main.rs (command registration), slash.rs (/about)

use serenity::{
    builder::CreateComponents,
    client::Context,
    framework::standard::{macros::command, CommandResult},
    model::{application::component::ButtonStyle, channel::Message},
};

pub const FACEBOOK_URL: &str = "https://www.facebook.com/mehedialtayib10";
pub const WEBSITE_URL: &str = "https://www.mehedialtayib.com";

pub const ABOUT_TEXT: &str = "**Bot Description:**\n\
**TeTube** is a bot that helps users find top YouTube videos based on their search queries. \
Simply type a query, and TeTube will provide the top 3 most viewed videos related to your query. \
Press **More Videos** to see the next results.\n\n\
**About the Developer:**\n\
**Mehedi Al Tayib** builds bots that make information more accessible and interactive.";

/// Two link buttons under the about text.
pub fn about_links(components: &mut CreateComponents) -> &mut CreateComponents {
    components.create_action_row(|row| {
        row.create_button(|button| button.style(ButtonStyle::Link).label("Facebook").url(FACEBOOK_URL))
            .create_button(|button| button.style(ButtonStyle::Link).label("Website").url(WEBSITE_URL))
    })
}

#[command]
#[aliases("info")]
/// Main ^about command handler
pub async fn about(ctx: &Context, msg: &Message) -> CommandResult {
    msg.channel_id
        .send_message(&ctx.http, |m| m.content(ABOUT_TEXT).components(about_links))
        .await?;
    Ok(())
}
