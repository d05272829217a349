//! Reshuffle session registry
//!
//! A successful mix stores its defining inputs under a fresh id, so the
//! hosting layer can offer a "not balanced!" re-roll that replays the same
//! roster and groups without re-parsing anything. The registry is bounded
//! and entries expire after a TTL; a reshuffle against a pruned session
//! reports a clean not-found error instead of inventing players.

use crate::config::MixSettings;
use crate::error::{MixerError, Result};
use crate::types::{Group, MixId, Roster};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// One stored mix: the inputs a reshuffle replays.
#[derive(Debug, Clone)]
pub struct MixSession {
    pub id: MixId,
    pub roster: Roster,
    pub groups: Vec<Group>,
    pub created_at: DateTime<Utc>,
    pub reshuffles: u32,
}

/// Thread-safe registry of reshufflable mixes.
pub struct SessionStore {
    sessions: RwLock<HashMap<MixId, MixSession>>,
    max_sessions: usize,
    ttl_seconds: u64,
}

impl SessionStore {
    pub fn new(settings: &MixSettings) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions: settings.max_sessions,
            ttl_seconds: settings.session_ttl_seconds,
        }
    }

    /// Store a new session, evicting the oldest one when at capacity.
    pub fn insert(&self, roster: Roster, groups: Vec<Group>) -> Result<MixId> {
        let mut sessions = self.sessions.write().map_err(|_| MixerError::InternalError {
            message: "Failed to acquire sessions lock".to_string(),
        })?;

        if sessions.len() >= self.max_sessions {
            if let Some(oldest) = sessions.values().min_by_key(|s| s.created_at).map(|s| s.id) {
                sessions.remove(&oldest);
                debug!(mix_id = %oldest, "Evicted oldest mix session at capacity");
            }
        }

        let id = Uuid::new_v4();
        sessions.insert(
            id,
            MixSession {
                id,
                roster,
                groups,
                created_at: Utc::now(),
                reshuffles: 0,
            },
        );

        Ok(id)
    }

    /// Fetch the stored inputs for a reshuffle and bump the session counter.
    pub fn reshuffle_inputs(&self, id: MixId) -> Result<(Roster, Vec<Group>)> {
        let mut sessions = self.sessions.write().map_err(|_| MixerError::InternalError {
            message: "Failed to acquire sessions lock".to_string(),
        })?;

        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| MixerError::SessionNotFound {
                mix_id: id.to_string(),
            })?;

        session.reshuffles += 1;
        Ok((session.roster.clone(), session.groups.clone()))
    }

    /// Close a session explicitly, the "teams accepted" path. Returns whether
    /// it was still there.
    pub fn remove(&self, id: MixId) -> Result<bool> {
        let mut sessions = self.sessions.write().map_err(|_| MixerError::InternalError {
            message: "Failed to acquire sessions lock".to_string(),
        })?;

        Ok(sessions.remove(&id).is_some())
    }

    /// Drop sessions older than the TTL, returning how many went.
    pub fn prune_expired(&self) -> Result<usize> {
        let cutoff = Utc::now() - chrono::Duration::seconds(self.ttl_seconds as i64);
        self.prune_older_than(cutoff)
    }

    fn prune_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let mut sessions = self.sessions.write().map_err(|_| MixerError::InternalError {
            message: "Failed to acquire sessions lock".to_string(),
        })?;

        let before = sessions.len();
        sessions.retain(|_, session| session.created_at >= cutoff);
        let pruned = before - sessions.len();

        if pruned > 0 {
            debug!(pruned, "Pruned expired mix sessions");
        }

        Ok(pruned)
    }

    /// Number of live sessions.
    pub fn len(&self) -> Result<usize> {
        let sessions = self.sessions.read().map_err(|_| MixerError::InternalError {
            message: "Failed to acquire sessions lock".to_string(),
        })?;

        Ok(sessions.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
