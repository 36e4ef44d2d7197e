use poise::serenity_prelude::{self as serenity, ButtonStyle, CreateActionRow, CreateButton, CreateMessage};
use tracing::{debug, info};

use crate::events::interaction::VERIFY_BUTTON_ID;
use crate::messages;
use crate::{Data, Error};

/// Handle incoming messages
pub async fn handle_message(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
) -> Result<(), Error> {
    // Ignore bot messages
    if msg.author.bot {
        return Ok(());
    }

    if !data.config.modal_flow || !is_setup_command(&msg.content, &data.config.setup_command) {
        return Ok(());
    }

    let Some(guild_id) = msg.guild_id else {
        debug!("Ignoring setup command from {} outside a guild", msg.author.name);
        return Ok(());
    };

    handle_setup_command(ctx, msg, guild_id).await
}

/// Exact match after trimming, so quoting the command in a sentence does nothing
pub fn is_setup_command(content: &str, trigger: &str) -> bool {
    content.trim() == trigger
}

/// Post the verification button in the channel the command was sent in
async fn handle_setup_command(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    guild_id: serenity::GuildId,
) -> Result<(), Error> {
    if !is_administrator(ctx, msg, guild_id).await {
        info!(
            "Non-admin {} tried the setup command in guild {}",
            msg.author.name, guild_id
        );
        msg.reply(&ctx.http, messages::SETUP_ADMIN_ONLY).await?;
        return Ok(());
    }

    msg.channel_id
        .send_message(&ctx.http, setup_message())
        .await?;
    msg.reply(&ctx.http, messages::SETUP_CREATED).await?;

    info!(
        "Verification button posted by {} in channel {}",
        msg.author.name, msg.channel_id
    );
    Ok(())
}

pub fn setup_message() -> CreateMessage {
    let button = CreateButton::new(VERIFY_BUTTON_ID)
        .label(messages::SETUP_BUTTON_LABEL)
        .style(ButtonStyle::Primary);

    CreateMessage::new()
        .content(messages::SETUP_PROMPT)
        .components(vec![CreateActionRow::Buttons(vec![button])])
}

async fn is_administrator(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    guild_id: serenity::GuildId,
) -> bool {
    let Ok(member) = guild_id.member(ctx, msg.author.id).await else {
        return false;
    };
    let Ok(channel) = msg.channel(ctx).await else {
        return false;
    };
    let Some(guild_channel) = channel.guild() else {
        return false;
    };

    guild_id
        .to_guild_cached(&ctx.cache)
        .map(|guild| guild.user_permissions_in(&guild_channel, &member).administrator())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_setup_command() {
        assert!(is_setup_command("!setupbotao", "!setupbotao"));
        assert!(is_setup_command("  !setupbotao\n", "!setupbotao"));
        assert!(!is_setup_command("!setupbotao agora", "!setupbotao"));
        assert!(!is_setup_command("use !setupbotao", "!setupbotao"));
        assert!(!is_setup_command("!SETUPBOTAO", "!setupbotao"));
    }

    #[test]
    fn test_setup_message_has_button() {
        let json = serde_json::to_value(setup_message()).unwrap();
        assert_eq!(json["content"], messages::SETUP_PROMPT);

        let button = &json["components"][0]["components"][0];
        assert_eq!(button["custom_id"], VERIFY_BUTTON_ID);
        assert_eq!(button["label"], messages::SETUP_BUTTON_LABEL);
        assert_eq!(button["style"], 1);
    }
}
