//! Roster building: from raw chat text or a voice-channel member list to a
//! canonical, deduplicated player list

pub mod mentions;
pub mod normalize;

pub use mentions::resolve_mentions;
pub use normalize::{normalize, roster_from_names};
