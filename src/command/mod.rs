//! Chat command surface: parsing, canned replies and reshuffle sessions

pub mod handler;
pub mod messages;
pub mod session;

pub use handler::{parse_command, Command, CommandContext, CommandHandler, CommandReply, MixerStats};
pub use session::{MixSession, SessionStore};
