// src/config/bot_config.rs
use poise::serenity_prelude::{GuildId, RoleId};
use std::time::Duration;

use crate::error::{BotError, Result};
use crate::roster::RosterConfig;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_ROLE_LABEL: &str = "Aluno";
const DEFAULT_SETUP_COMMAND: &str = "!setupbotao";
const DEFAULT_ROSTER_TIMEOUT_SECS: u64 = 15;

/// Runtime configuration, read from the environment
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub discord_token: String,
    /// Register commands in this guild instead of globally
    pub guild_id: Option<GuildId>,
    /// Role granted after a successful verification
    pub role_id: RoleId,
    /// Role name shown to users
    pub role_label: String,
    pub roster: RosterConfig,
    /// Map reason codes to specific messages instead of one generic failure
    pub detailed_reasons: bool,
    /// Enable the setup button, button click and modal flow
    pub modal_flow: bool,
    pub setup_command: String,
    pub port: u16,
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| BotError::ConfigMissing {
                name: key.to_string(),
            })
        };

        let discord_token = require("DISCORD_TOKEN")?;
        let role_id = RoleId::new(parse_id("ROLE_ID", &require("ROLE_ID")?)?);
        let url = get("GOOGLE_APPS_SCRIPT_URL")
            .or_else(|| get("ROSTER_URL"))
            .ok_or_else(|| BotError::ConfigMissing {
                name: "GOOGLE_APPS_SCRIPT_URL".to_string(),
            })?;
        let security_token = require("SECURITY_TOKEN")?;

        let guild_id = match get("GUILD_ID") {
            Some(raw) => Some(GuildId::new(parse_id("GUILD_ID", &raw)?)),
            None => None,
        };

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| BotError::ConfigValidation {
                message: format!("PORT must be a port number, got '{}'", raw),
            })?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match get("ROSTER_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| BotError::ConfigValidation {
                    message: format!(
                        "ROSTER_TIMEOUT_SECS must be a positive number of seconds, got '{}'",
                        raw
                    ),
                })?,
            None => DEFAULT_ROSTER_TIMEOUT_SECS,
        };

        Ok(Self {
            discord_token,
            guild_id,
            role_id,
            role_label: get("ROLE_LABEL").unwrap_or_else(|| DEFAULT_ROLE_LABEL.to_string()),
            roster: RosterConfig {
                url,
                security_token,
                consume: parse_flag("CONSUME_EMAILS", get("CONSUME_EMAILS"), true)?,
                timeout: Duration::from_secs(timeout_secs),
            },
            detailed_reasons: parse_flag("DETAILED_REASONS", get("DETAILED_REASONS"), true)?,
            modal_flow: parse_flag("MODAL_FLOW", get("MODAL_FLOW"), true)?,
            setup_command: get("SETUP_COMMAND")
                .unwrap_or_else(|| DEFAULT_SETUP_COMMAND.to_string()),
            port,
        })
    }
}

fn parse_id(key: &str, raw: &str) -> Result<u64> {
    raw.parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .ok_or_else(|| BotError::ConfigValidation {
            message: format!("{} must be a Discord snowflake, got '{}'", key, raw),
        })
}

fn parse_flag(key: &str, raw: Option<String>, default: bool) -> Result<bool> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(BotError::ConfigValidation {
            message: format!("{} must be true or false, got '{}'", key, raw),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("DISCORD_TOKEN", "token"),
            ("ROLE_ID", "1122334455"),
            ("GOOGLE_APPS_SCRIPT_URL", "https://script.example.com/exec"),
            ("SECURITY_TOKEN", "segredo"),
        ])
    }

    fn load(env: &HashMap<&'static str, &'static str>) -> Result<BotConfig> {
        BotConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn test_defaults() {
        let config = load(&base_env()).unwrap();
        assert_eq!(config.role_id, RoleId::new(1122334455));
        assert_eq!(config.guild_id, None);
        assert_eq!(config.port, 3000);
        assert_eq!(config.role_label, "Aluno");
        assert_eq!(config.setup_command, "!setupbotao");
        assert!(config.roster.consume);
        assert!(config.detailed_reasons);
        assert!(config.modal_flow);
        assert_eq!(config.roster.timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_missing_required() {
        let mut env = base_env();
        env.remove("SECURITY_TOKEN");
        let err = load(&env).unwrap_err();
        assert!(matches!(err, BotError::ConfigMissing { name } if name == "SECURITY_TOKEN"));
    }

    #[test]
    fn test_blank_counts_as_missing() {
        let mut env = base_env();
        env.insert("DISCORD_TOKEN", "   ");
        assert!(matches!(load(&env), Err(BotError::ConfigMissing { .. })));
    }

    #[test]
    fn test_roster_url_alias() {
        let mut env = base_env();
        env.remove("GOOGLE_APPS_SCRIPT_URL");
        env.insert("ROSTER_URL", "http://localhost:8080/roster");
        let config = load(&env).unwrap();
        assert_eq!(config.roster.url, "http://localhost:8080/roster");
    }

    #[test]
    fn test_invalid_values() {
        let mut env = base_env();
        env.insert("ROLE_ID", "aluno");
        assert!(matches!(load(&env), Err(BotError::ConfigValidation { .. })));

        let mut env = base_env();
        env.insert("PORT", "99999");
        assert!(matches!(load(&env), Err(BotError::ConfigValidation { .. })));

        let mut env = base_env();
        env.insert("CONSUME_EMAILS", "maybe");
        assert!(matches!(load(&env), Err(BotError::ConfigValidation { .. })));

        let mut env = base_env();
        env.insert("ROSTER_TIMEOUT_SECS", "0");
        assert!(matches!(load(&env), Err(BotError::ConfigValidation { .. })));
    }

    #[test]
    fn test_feature_switches() {
        let mut env = base_env();
        env.insert("CONSUME_EMAILS", "false");
        env.insert("DETAILED_REASONS", "0");
        env.insert("MODAL_FLOW", "off");
        env.insert("GUILD_ID", "998877");
        env.insert("PORT", "8080");
        let config = load(&env).unwrap();
        assert!(!config.roster.consume);
        assert!(!config.detailed_reasons);
        assert!(!config.modal_flow);
        assert_eq!(config.guild_id, Some(GuildId::new(998877)));
        assert_eq!(config.port, 8080);
    }
}
