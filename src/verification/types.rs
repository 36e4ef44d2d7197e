// src/verification/types.rs
use crate::roster::RejectReason;

/// What the user ends up with after one verification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Email authorized and role assigned
    Granted,
    /// Email authorized but the role could not be assigned
    VerifiedRoleNotAssigned,
    /// Email refused by the roster (or the lookup failed)
    Rejected(RejectReason),
}

impl VerificationOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            VerificationOutcome::Granted => "granted",
            VerificationOutcome::VerifiedRoleNotAssigned => "verified_role_not_assigned",
            VerificationOutcome::Rejected(reason) => reason.code(),
        }
    }
}
