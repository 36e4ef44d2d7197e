use async_trait::async_trait;
use poise::serenity_prelude::{GuildId, Http, RoleId, UserId};
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;

const AUDIT_LOG_REASON: &str = "E-mail verificado na lista de alunos";

/// Gives a verified member their role
#[async_trait]
pub trait RoleGranter: Send + Sync {
    async fn grant(&self, guild_id: GuildId, user_id: UserId) -> Result<()>;
}

/// Assigns the configured role through the Discord REST API
pub struct DiscordRoleGranter {
    http: Arc<Http>,
    role_id: RoleId,
}

impl DiscordRoleGranter {
    pub fn new(http: Arc<Http>, role_id: RoleId) -> Self {
        Self { http, role_id }
    }
}

#[async_trait]
impl RoleGranter for DiscordRoleGranter {
    async fn grant(&self, guild_id: GuildId, user_id: UserId) -> Result<()> {
        debug!(
            "Adding role {} to user {} in guild {}",
            self.role_id, user_id, guild_id
        );
        self.http
            .add_member_role(guild_id, user_id, self.role_id, Some(AUDIT_LOG_REASON))
            .await?;
        Ok(())
    }
}
