pub mod manager;
pub mod types;

pub use manager::VerificationService;
pub use types::VerificationOutcome;
