//! Mixing policy settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings that shape how rosters are split and how long reshuffle sessions
/// stay available.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MixSettings {
    /// Players per full team
    pub team_size: usize,
    /// How long a mix stays reshufflable, in seconds
    pub session_ttl_seconds: u64,
    /// Maximum retained reshuffle sessions before the oldest is evicted
    pub max_sessions: usize,
    /// Expired-session sweep interval in seconds
    pub prune_interval_seconds: u64,
}

impl Default for MixSettings {
    fn default() -> Self {
        Self {
            team_size: 5,
            session_ttl_seconds: 3600, // 1 hour
            max_sessions: 1000,
            prune_interval_seconds: 60,
        }
    }
}

impl MixSettings {
    /// Most players that can be fielded at once; everyone beyond this waits.
    pub fn max_playable(&self) -> usize {
        self.team_size * 2
    }

    /// Get prune interval as Duration
    pub fn prune_interval(&self) -> Duration {
        Duration::from_secs(self.prune_interval_seconds)
    }
}
