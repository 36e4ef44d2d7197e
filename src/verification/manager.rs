use poise::serenity_prelude::{GuildId, UserId};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::types::VerificationOutcome;
use crate::managers::RoleGranter;
use crate::roster::{EmailVerifier, RejectReason};

/// Runs the email check and the role grant for a single interaction
pub struct VerificationService {
    verifier: Arc<dyn EmailVerifier>,
    granter: Arc<dyn RoleGranter>,
    detailed_reasons: bool,
}

impl VerificationService {
    pub fn new(
        verifier: Arc<dyn EmailVerifier>,
        granter: Arc<dyn RoleGranter>,
        detailed_reasons: bool,
    ) -> Self {
        Self {
            verifier,
            granter,
            detailed_reasons,
        }
    }

    pub async fn verify(
        &self,
        guild_id: Option<GuildId>,
        user_id: UserId,
        email: &str,
    ) -> VerificationOutcome {
        let email = email.trim();
        if email.is_empty() {
            warn!("User {} submitted an empty email", user_id);
            return VerificationOutcome::Rejected(RejectReason::Error);
        }

        // A consuming lookup marks the email as used, so this must come first.
        let Some(guild_id) = guild_id else {
            warn!("User {} tried to verify outside a guild", user_id);
            return VerificationOutcome::Rejected(RejectReason::Error);
        };

        let result = self.verifier.verify_email(email, user_id).await;

        if !result.authorized {
            let reason = if self.detailed_reasons {
                result.reason
            } else {
                RejectReason::Error
            };
            info!(
                "Verification of '{}' for user {} rejected ({})",
                email,
                user_id,
                result.reason.code()
            );
            return VerificationOutcome::Rejected(reason);
        }

        match self.granter.grant(guild_id, user_id).await {
            Ok(()) => {
                info!("User {} verified with '{}' and given the role", user_id, email);
                VerificationOutcome::Granted
            }
            Err(e) => {
                error!(
                    "User {} verified with '{}' but role assignment failed: {}",
                    user_id, email, e
                );
                VerificationOutcome::VerifiedRoleNotAssigned
            }
        }
    }
}
