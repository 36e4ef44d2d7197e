use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    // Configuration errors
    #[error("Missing required environment variable '{name}'")]
    ConfigMissing { name: String },

    #[error("Invalid config: {message}")]
    ConfigValidation { message: String },

    // Roster service errors
    #[error("Roster request failed: {source}")]
    RosterRequest {
        #[source]
        source: reqwest::Error,
    },

    #[error("Roster service returned HTTP {status}")]
    RosterStatus { status: u16 },

    #[error("Failed to parse roster response: {source}")]
    RosterParse {
        #[source]
        source: serde_json::Error,
    },

    // Discord errors
    #[error("Discord API error: {message}")]
    Discord { message: String },
}

impl From<serenity::Error> for BotError {
    fn from(err: serenity::Error) -> Self {
        BotError::Discord {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for BotError {
    fn from(err: reqwest::Error) -> Self {
        BotError::RosterRequest { source: err }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;

use poise::serenity_prelude as serenity;
