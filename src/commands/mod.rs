pub mod general;
pub mod verification;

pub use general::ping;
pub use verification::verify;
