// search.rs - Video Search Transport
// Bridges Discord events to the query handler: plain text messages start a
// new search, the "More Videos" button fetches the next page.
//
// Used by: main.rs (message + interaction events)

use std::sync::Arc;

use log::{error, warn};
use serenity::{
    builder::CreateComponents,
    client::Context,
    model::{
        application::{
            component::ButtonStyle,
            interaction::{message_component::MessageComponentInteraction, InteractionResponseType},
        },
        channel::Message,
        id::{ChannelId, UserId},
    },
};

use crate::query::{QueryHandler, QueryHandlerKey};
use crate::reply::{render, FormattedReply, MORE_BUTTON_ID, MORE_BUTTON_LABEL};

// ============================================================================
// QUERY EXTRACTION
// ============================================================================

/// Text of a message to use as a search query, or `None` when the message
/// is not addressed to the bot. Direct messages are always queries; in
/// guilds the bot must be mentioned and the mention is removed.
pub fn extract_query(content: &str, bot_id: UserId, is_direct: bool, mentioned: bool) -> Option<String> {
    if !is_direct && !mentioned {
        return None;
    }

    let query = content
        .replace(&format!("<@{}>", bot_id.0), "")
        .replace(&format!("<@!{}>", bot_id.0), "");
    let query = query.trim();

    if query.is_empty() {
        None
    } else {
        Some(query.to_string())
    }
}

// ============================================================================
// EVENT HANDLERS
// ============================================================================

pub async fn query_handler(ctx: &Context) -> Option<Arc<QueryHandler>> {
    let data = ctx.data.read().await;
    data.get::<QueryHandlerKey>().cloned()
}

/// Run a search for a text message and post the result in the same channel.
pub async fn handle_query_message(ctx: &Context, msg: &Message, query: &str) -> serenity::Result<()> {
    let Some(handler) = query_handler(ctx).await else {
        error!("Query handler missing from client data");
        return Ok(());
    };

    let _typing = ctx.http.start_typing(msg.channel_id.0)?;
    let reply = handler.search(msg.author.id, query).await;
    send_formatted(ctx, msg.channel_id, &render(&reply)).await
}

/// Handle a press of the "More Videos" button.
pub async fn handle_more_button(ctx: &Context, component: &MessageComponentInteraction) -> serenity::Result<()> {
    if component.data.custom_id != MORE_BUTTON_ID {
        warn!("Ignoring unknown component '{}'", component.data.custom_id);
        return Ok(());
    }

    // Discord wants an acknowledgement within three seconds
    component
        .create_interaction_response(&ctx.http, |response| {
            response.kind(InteractionResponseType::DeferredUpdateMessage)
        })
        .await?;

    let Some(handler) = query_handler(ctx).await else {
        error!("Query handler missing from client data");
        return Ok(());
    };

    let reply = handler.more(component.user.id).await;
    send_formatted(ctx, component.channel_id, &render(&reply)).await
}

// ============================================================================
// MESSAGE HELPERS
// ============================================================================

pub fn more_button(components: &mut CreateComponents) -> &mut CreateComponents {
    components.create_action_row(|row| {
        row.create_button(|button| {
            button
                .custom_id(MORE_BUTTON_ID)
                .label(MORE_BUTTON_LABEL)
                .style(ButtonStyle::Primary)
        })
    })
}

pub async fn send_formatted(ctx: &Context, channel_id: ChannelId, reply: &FormattedReply) -> serenity::Result<()> {
    channel_id
        .send_message(&ctx.http, |m| {
            m.content(&reply.text);
            if reply.more_button {
                m.components(more_button);
            }
            m
        })
        .await?;
    Ok(())
}
