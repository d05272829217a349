//! Player-count tiers and report rendering

pub mod render;

pub use render::{render, MixReport, NO_PLAYERS_MESSAGE};
