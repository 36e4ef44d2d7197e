use tracing::info;

use crate::messages::outcome_message;
use crate::{Context, Error};

/// Verifique seu e-mail para liberar o cargo de Aluno
#[poise::command(slash_command, guild_only, rename = "verificar")]
pub async fn verify(
    ctx: Context<'_>,
    #[description = "Digite o e-mail cadastrado"] email: String,
) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;

    let data = ctx.data();
    let outcome = data
        .verification
        .verify(ctx.guild_id(), ctx.author().id, &email)
        .await;

    info!(
        "/verificar by {} ({}) finished: {}",
        ctx.author().name,
        ctx.author().id,
        outcome.label()
    );

    ctx.send(
        poise::CreateReply::default()
            .content(outcome_message(&outcome, &data.config.role_label))
            .ephemeral(true),
    )
    .await?;

    Ok(())
}
