//! Team Mixer - Chat-command team mixing service
//!
//! This crate turns messy player listings from chat messages into two
//! shuffled, balanced teams, with bracketed anti-stacking groups kept apart,
//! session storage for reshuffles, and an HTTP API around the whole thing.

pub mod balance;
pub mod command;
pub mod config;
pub mod error;
pub mod groups;
pub mod metrics;
pub mod report;
pub mod roster;
pub mod service;
pub mod types;

// Re-export commonly used types and traits
pub use error::{MixerError, Result};
pub use types::*;

// Re-export key components
pub use command::{CommandContext, CommandHandler, CommandReply};
pub use report::{render, MixReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
