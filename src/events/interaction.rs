//! Button and modal half of the verification flow

use poise::serenity_prelude::{
    self as serenity, ActionRow, ActionRowComponent, ComponentInteraction, CreateActionRow,
    CreateInputText, CreateInteractionResponse, CreateInteractionResponseMessage, CreateModal,
    EditInteractionResponse, InputTextStyle, ModalInteraction,
};
use tracing::{debug, error, info, warn};

use crate::messages::{self, outcome_message};
use crate::{Data, Error};

/// Button posted by the setup command
pub const VERIFY_BUTTON_ID: &str = "abrir_modal_email";
/// Modal opened by the button
pub const VERIFY_MODAL_ID: &str = "modal_verificar_email";
/// Email field inside the modal
pub const EMAIL_FIELD_ID: &str = "campo_email";

/// Handle component and modal interactions. Slash commands are routed by poise.
pub async fn handle_interaction(
    ctx: &serenity::Context,
    interaction: &serenity::Interaction,
    data: &Data,
) -> Result<(), Error> {
    if !data.config.modal_flow {
        return Ok(());
    }

    match interaction {
        serenity::Interaction::Component(component)
            if component.data.custom_id == VERIFY_BUTTON_ID =>
        {
            if let Err(e) = open_email_modal(ctx, component).await {
                error!("Failed to open email modal for {}: {}", component.user.name, e);
                log_reply_failure(component.create_response(&ctx.http, unexpected_response()).await);
            }
        }
        serenity::Interaction::Modal(modal) if modal.data.custom_id == VERIFY_MODAL_ID => {
            let mut acknowledged = false;
            if let Err(e) = submit_email_modal(ctx, modal, data, &mut acknowledged).await {
                error!("Failed to handle email modal from {}: {}", modal.user.name, e);
                if !acknowledged {
                    log_reply_failure(modal.create_response(&ctx.http, unexpected_response()).await);
                }
            }
        }
        _ => {}
    }

    Ok(())
}

async fn open_email_modal(
    ctx: &serenity::Context,
    component: &ComponentInteraction,
) -> Result<(), Error> {
    debug!("{} clicked the verification button", component.user.name);
    component
        .create_response(&ctx.http, CreateInteractionResponse::Modal(email_modal()))
        .await?;
    Ok(())
}

async fn submit_email_modal(
    ctx: &serenity::Context,
    modal: &ModalInteraction,
    data: &Data,
    acknowledged: &mut bool,
) -> Result<(), Error> {
    let email = find_input_value(&modal.data.components, EMAIL_FIELD_ID).unwrap_or_default();

    modal
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Defer(
                CreateInteractionResponseMessage::new().ephemeral(true),
            ),
        )
        .await?;
    *acknowledged = true;

    let outcome = data
        .verification
        .verify(modal.guild_id, modal.user.id, &email)
        .await;

    info!(
        "Modal verification by {} ({}) finished: {}",
        modal.user.name,
        modal.user.id,
        outcome.label()
    );

    modal
        .edit_response(
            &ctx.http,
            EditInteractionResponse::new().content(outcome_message(&outcome, &data.config.role_label)),
        )
        .await?;

    Ok(())
}

/// Modal with a single required email field
pub fn email_modal() -> CreateModal {
    let email_input = CreateInputText::new(
        InputTextStyle::Short,
        messages::MODAL_EMAIL_LABEL,
        EMAIL_FIELD_ID,
    )
    .placeholder(messages::MODAL_EMAIL_PLACEHOLDER)
    .required(true);

    CreateModal::new(VERIFY_MODAL_ID, messages::MODAL_TITLE)
        .components(vec![CreateActionRow::InputText(email_input)])
}

/// Value of the text input with the given custom id
pub fn find_input_value(rows: &[ActionRow], custom_id: &str) -> Option<String> {
    rows.iter()
        .flat_map(|row| row.components.iter())
        .find_map(|component| match component {
            ActionRowComponent::InputText(input) if input.custom_id == custom_id => {
                input.value.clone()
            }
            _ => None,
        })
}

fn unexpected_response() -> CreateInteractionResponse {
    CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(messages::UNEXPECTED_ERROR)
            .ephemeral(true),
    )
}

fn log_reply_failure(result: serenity::Result<()>) {
    if let Err(e) = result {
        warn!("Could not send error reply: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(json: &str) -> Vec<ActionRow> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_find_input_value() {
        let rows = rows(
            r#"[{"type": 1, "components": [
                {"type": 4, "custom_id": "campo_email", "value": "aluno@escola.com"}
            ]}]"#,
        );
        assert_eq!(
            find_input_value(&rows, EMAIL_FIELD_ID),
            Some("aluno@escola.com".to_string())
        );
    }

    #[test]
    fn test_find_input_value_other_field() {
        let rows = rows(
            r#"[{"type": 1, "components": [
                {"type": 4, "custom_id": "outro", "value": "x"}
            ]}]"#,
        );
        assert_eq!(find_input_value(&rows, EMAIL_FIELD_ID), None);
        assert_eq!(find_input_value(&[], EMAIL_FIELD_ID), None);
    }

    #[test]
    fn test_email_modal_payload() {
        let json = serde_json::to_value(email_modal()).unwrap();
        assert_eq!(json["custom_id"], VERIFY_MODAL_ID);
        assert_eq!(json["title"], "Verificação de Aluno");

        let input = &json["components"][0]["components"][0];
        assert_eq!(input["custom_id"], EMAIL_FIELD_ID);
        assert_eq!(input["style"], 1);
        assert_eq!(input["required"], true);
        assert_eq!(input["placeholder"], "exemplo@email.com");
    }
}
