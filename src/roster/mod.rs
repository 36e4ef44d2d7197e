//! Roster service integration
//!
//! The roster lives in an external spreadsheet-backed service. The bot only
//! asks it whether an email is authorized and interprets the reply.

mod client;
mod types;

pub use client::{EmailVerifier, RosterClient, RosterConfig};
pub use types::{RejectReason, VerificationResult};
