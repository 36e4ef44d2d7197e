//! HTTP client for the spreadsheet-backed roster service

use async_trait::async_trait;
use poise::serenity_prelude::UserId;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, error, info};

use super::types::{RosterResponse, VerificationResult};
use crate::error::{BotError, Result};

/// Anything that can answer "is this email on the roster?"
#[async_trait]
pub trait EmailVerifier: Send + Sync {
    /// Look up an email. Never fails: local errors become a generic rejection.
    async fn verify_email(&self, email: &str, claimer: UserId) -> VerificationResult;
}

/// Roster endpoint settings
#[derive(Debug, Clone)]
pub struct RosterConfig {
    pub url: String,
    pub security_token: String,
    /// Send `consume=1&claimer=<id>` so each email can be used only once
    pub consume: bool,
    pub timeout: Duration,
}

pub struct RosterClient {
    config: RosterConfig,
    http_client: reqwest::Client,
}

impl RosterClient {
    pub fn new(config: RosterConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn query_params(&self, email: &str, claimer: UserId) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("email", email.to_string()),
            ("token", self.config.security_token.clone()),
        ];
        if self.config.consume {
            params.push(("consume", "1".to_string()));
            params.push(("claimer", claimer.to_string()));
        }
        params
    }

    async fn fetch(&self, email: &str, claimer: UserId) -> Result<VerificationResult> {
        debug!(
            "Querying roster for '{}' (claimer {}, consume {})",
            email, claimer, self.config.consume
        );

        let response = self
            .http_client
            .get(&self.config.url)
            .query(&self.query_params(email, claimer))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Roster replied HTTP {}: {}", status.as_u16(), body);

        classify_response(status, &body)
    }
}

#[async_trait]
impl EmailVerifier for RosterClient {
    async fn verify_email(&self, email: &str, claimer: UserId) -> VerificationResult {
        match self.fetch(email, claimer).await {
            Ok(result) => {
                info!(
                    "Roster result for '{}': authorized={} reason={}",
                    email,
                    result.authorized,
                    result.reason.code()
                );
                result
            }
            Err(e) => {
                error!("Roster verification failed for '{}': {}", email, e);
                VerificationResult::failed()
            }
        }
    }
}

/// Turn a raw roster reply into a verification result
pub fn classify_response(status: StatusCode, body: &str) -> Result<VerificationResult> {
    if !status.is_success() {
        return Err(BotError::RosterStatus {
            status: status.as_u16(),
        });
    }

    let response: RosterResponse =
        serde_json::from_str(body).map_err(|source| BotError::RosterParse { source })?;

    Ok(response.into_result())
}
