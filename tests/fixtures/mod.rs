//! Test fixtures and helpers for integration testing

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use team_mixer::command::{CommandContext, CommandHandler, SessionStore};
use team_mixer::config::MixSettings;
use team_mixer::metrics::MetricsCollector;
use team_mixer::types::MentionMap;

/// Build a complete command system with default settings
pub fn create_test_system() -> CommandHandler {
    create_test_system_with(MixSettings::default())
}

/// Build a complete command system with custom mix settings
pub fn create_test_system_with(settings: MixSettings) -> CommandHandler {
    let sessions = Arc::new(SessionStore::new(&settings));
    let metrics = Arc::new(MetricsCollector::new().expect("Failed to create metrics collector"));

    CommandHandler::new(settings, sessions, metrics)
}

/// Deterministic RNG for draws a test needs to reproduce
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// A comma-separated listing of `count` distinct player names
pub fn listing(count: usize) -> String {
    (1..=count)
        .map(|i| format!("player{}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A context with `names` registered as mention ids 1..=n
pub fn mention_context(names: &[&str]) -> CommandContext {
    let mut mentions = MentionMap::new();
    for (i, name) in names.iter().enumerate() {
        mentions.insert(i as u64 + 1, name.to_string());
    }

    CommandContext {
        mentions,
        voice_roster: None,
    }
}

/// A context simulating a voice channel with the given members
pub fn voice_context(names: &[&str]) -> CommandContext {
    CommandContext {
        mentions: MentionMap::new(),
        voice_roster: Some(names.iter().map(|n| n.to_string()).collect()),
    }
}
