use poise::serenity_prelude as serenity;
use tracing::info;

use crate::managers::run_startup_permission_check;
use crate::{Data, Error};

/// Handle when the bot joins a new guild
pub async fn handle_guild_create(
    ctx: &serenity::Context,
    guild: &serenity::Guild,
    is_new: Option<bool>,
    data: &Data,
) -> Result<(), Error> {
    // Guilds present at startup are checked once the bot is ready
    if is_new != Some(true) {
        return Ok(());
    }

    info!("Joined guild: {} ({})", guild.name, guild.id);
    run_startup_permission_check(ctx.http.as_ref(), &[guild.id], data.config.role_id).await;

    Ok(())
}
