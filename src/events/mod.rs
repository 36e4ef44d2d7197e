pub mod guild;
pub mod interaction;
pub mod message;

pub use guild::handle_guild_create;
pub use interaction::handle_interaction;
pub use message::handle_message;
