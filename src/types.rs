//! Common types used throughout the team-mixing service

use serde::Serialize;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Unique identifier for reshuffle sessions
pub type MixId = Uuid;

/// Mapping of platform mention ids to resolved display names, supplied by the
/// hosting layer (resolving ids needs directory access the core does not own)
pub type MentionMap = HashMap<u64, String>;

/// Ordered list of players that are candidates for one mix
pub type Roster = Vec<PlayerName>;

/// Minimum roster size callers must enforce before rendering a mix
pub const MIN_ROSTER: usize = 2;

/// A normalized player display name.
///
/// Built through [`PlayerName::new`], which trims the input and collapses
/// internal whitespace runs to single spaces. Two names denote the same
/// player when their lowercase forms are equal; `Eq` and `Hash` implement
/// that identity so std collections deduplicate players directly, while
/// `Display` keeps the first-seen casing.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct PlayerName(String);

impl PlayerName {
    /// Normalize a raw token into a player name. Returns `None` when nothing
    /// but whitespace remains.
    pub fn new(raw: &str) -> Option<Self> {
        let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            None
        } else {
            Some(Self(collapsed))
        }
    }

    /// The display form of the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The case-folded identity key used for dedup and membership checks.
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl PartialEq for PlayerName {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for PlayerName {}

impl Hash for PlayerName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl std::fmt::Display for PlayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An anti-stacking group: players the caller marked as playing together too
/// much, to be spread across the two teams rather than kept on one side.
///
/// A group may name players that are not in the roster (the roster can come
/// from a voice channel while the groups come from typed text); the balancer
/// simply ignores the absent names.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Group(Vec<PlayerName>);

impl Group {
    pub fn new(members: Vec<PlayerName>) -> Self {
        Self(members)
    }

    pub fn members(&self) -> &[PlayerName] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, name: &PlayerName) -> bool {
        self.0.contains(name)
    }
}

/// The computed result of one mix: two teams plus the overflow waitlist.
///
/// Invariant: the union of the three lists is exactly the input roster, with
/// no player in more than one list.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TeamAssignment {
    pub team_a: Vec<PlayerName>,
    pub team_b: Vec<PlayerName>,
    pub waitlist: Vec<PlayerName>,
}

impl TeamAssignment {
    /// Total number of players covered by this assignment.
    pub fn total_players(&self) -> usize {
        self.team_a.len() + self.team_b.len() + self.waitlist.len()
    }
}
