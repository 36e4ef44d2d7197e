// src/messages.rs
use crate::roster::RejectReason;
use crate::verification::VerificationOutcome;

pub const UNEXPECTED_ERROR: &str = "❌ Ocorreu um erro inesperado.";

pub const SETUP_PROMPT: &str = "**Clique no botão abaixo para verificar seu e-mail:**";
pub const SETUP_BUTTON_LABEL: &str = "📧 Verificar E-mail";
pub const SETUP_CREATED: &str = "✅ Mensagem de verificação criada!";
pub const SETUP_ADMIN_ONLY: &str = "❌ Apenas administradores podem usar este comando.";

pub const MODAL_TITLE: &str = "Verificação de Aluno";
pub const MODAL_EMAIL_LABEL: &str = "Digite seu e-mail cadastrado:";
pub const MODAL_EMAIL_PLACEHOLDER: &str = "exemplo@email.com";

pub fn outcome_message(outcome: &VerificationOutcome, role_label: &str) -> String {
    match outcome {
        VerificationOutcome::Granted => success_message(role_label),
        VerificationOutcome::VerifiedRoleNotAssigned => {
            "⚠️ E-mail verificado, mas houve um erro ao atribuir o cargo. Contate o suporte."
                .to_string()
        }
        VerificationOutcome::Rejected(reason) => rejection_message(*reason).to_string(),
    }
}

pub fn success_message(role_label: &str) -> String {
    format!(
        "✅ E-mail confirmado! Cargo **{}** atribuído com sucesso.",
        role_label
    )
}

pub fn rejection_message(reason: RejectReason) -> &'static str {
    match reason {
        RejectReason::AlreadyUsed => {
            "❌ Este e-mail **já foi utilizado anteriormente**. Se acredita que é um erro, contate o suporte."
        }
        RejectReason::StatusNotOk => {
            "⚠️ Seu e-mail foi encontrado, mas não está autorizado (status diferente de OK)."
        }
        RejectReason::NotFound => {
            "❌ Este e-mail **não foi encontrado** na lista de alunos. Verifique se digitou corretamente."
        }
        RejectReason::Error => {
            "❌ Ocorreu um erro durante a verificação. Tente novamente mais tarde."
        }
    }
}
