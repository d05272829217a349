//! Chat command parsing and handling
//!
//! The hosting layer (a chat gateway or the HTTP API) hands every incoming
//! message to [`CommandHandler::handle`] together with whatever it resolved
//! about the message: mention names and, for a bare mix, the caller's voice
//! channel roster. Messages that are not commands come back as `None` so the
//! host can ignore them silently.

use crate::command::messages::{
    HELP_COMMAND, HELP_MESSAGE, MIX_COMMAND, NEED_PLAYERS_MESSAGE, REPORT_COMMAND, REPORT_MESSAGE,
    TOO_FEW_PLAYERS_MESSAGE,
};
use crate::command::session::SessionStore;
use crate::config::MixSettings;
use crate::error::{MixerError, Result};
use crate::groups::extract_groups;
use crate::metrics::MetricsCollector;
use crate::report::render;
use crate::roster::{normalize, roster_from_names};
use crate::types::{Group, MentionMap, MixId, Roster, TeamAssignment, MIN_ROSTER};
use serde::Serialize;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// A recognized command with its raw argument text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Help,
    Report { args: &'a str },
    Mix { args: &'a str },
}

/// Recognize a command at the start of a message.
///
/// `!help` must stand alone; `!report` and `!mix` take everything after the
/// prefix as their argument. Anything else is not addressed to us.
pub fn parse_command(content: &str) -> Option<Command<'_>> {
    let trimmed = content.trim();

    if trimmed == HELP_COMMAND {
        Some(Command::Help)
    } else if let Some(rest) = trimmed.strip_prefix(REPORT_COMMAND) {
        Some(Command::Report { args: rest.trim() })
    } else if let Some(rest) = trimmed.strip_prefix(MIX_COMMAND) {
        Some(Command::Mix { args: rest.trim() })
    } else {
        None
    }
}

/// Everything the hosting layer resolved for one incoming message.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    /// Mention id to display name, resolved by the platform layer
    pub mentions: MentionMap,
    /// Display names of the humans in the caller's voice channel, when the
    /// host could see one. Lets a bare `!mix` pick up the whole room.
    pub voice_roster: Option<Vec<String>>,
}

/// Reply produced for one handled command.
#[derive(Debug, Clone)]
pub struct CommandReply {
    pub text: String,
    /// Set only for successful mixes; keys the reshuffle affordance
    pub mix_id: Option<MixId>,
    /// The assignment behind a mix reply, for hosts that want structure
    pub assignment: Option<TeamAssignment>,
}

impl CommandReply {
    fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mix_id: None,
            assignment: None,
        }
    }
}

/// Running totals for the stats endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MixerStats {
    pub commands_handled: u64,
    pub mixes_created: u64,
    pub reshuffles: u64,
    pub rejected: u64,
}

/// Stateless-per-message command processor over shared session storage.
pub struct CommandHandler {
    settings: MixSettings,
    sessions: Arc<SessionStore>,
    metrics: Arc<MetricsCollector>,
    stats: Arc<RwLock<MixerStats>>,
}

impl CommandHandler {
    pub fn new(
        settings: MixSettings,
        sessions: Arc<SessionStore>,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            settings,
            sessions,
            metrics,
            stats: Arc::new(RwLock::new(MixerStats::default())),
        }
    }

    /// Handle one incoming message. `Ok(None)` means it was not a command.
    pub fn handle(&self, content: &str, context: &CommandContext) -> Result<Option<CommandReply>> {
        let Some(command) = parse_command(content) else {
            return Ok(None);
        };

        self.bump(|stats| stats.commands_handled += 1)?;

        match command {
            Command::Help => {
                self.metrics.record_command("help");
                Ok(Some(CommandReply::text_only(HELP_MESSAGE)))
            }
            Command::Report { args } => {
                self.metrics.record_command("report");
                if args.is_empty() {
                    Ok(Some(CommandReply::text_only(NEED_PLAYERS_MESSAGE)))
                } else {
                    Ok(Some(CommandReply::text_only(REPORT_MESSAGE)))
                }
            }
            Command::Mix { args } => self.handle_mix(args, context).map(Some),
        }
    }

    /// Re-roll a stored mix with the same roster and groups.
    pub fn reshuffle(&self, mix_id: MixId) -> Result<CommandReply> {
        let (roster, groups) = self.sessions.reshuffle_inputs(mix_id)?;
        let report = render(&roster, &groups, &self.settings, &mut rand::thread_rng());

        self.metrics.record_reshuffle();
        self.bump(|stats| stats.reshuffles += 1)?;
        info!(%mix_id, "Reshuffled mix");

        Ok(CommandReply {
            text: report.text,
            mix_id: Some(mix_id),
            assignment: Some(report.assignment),
        })
    }

    /// Close a mix session, the "teams accepted" path. Errors when the
    /// session is already gone.
    pub fn accept(&self, mix_id: MixId) -> Result<()> {
        if !self.sessions.remove(mix_id)? {
            return Err(MixerError::SessionNotFound {
                mix_id: mix_id.to_string(),
            }
            .into());
        }

        self.metrics.set_active_sessions(self.sessions.len()?);
        info!(%mix_id, "Mix accepted, session closed");
        Ok(())
    }

    /// Snapshot of the running totals.
    pub fn stats(&self) -> Result<MixerStats> {
        let stats = self.stats.read().map_err(|_| MixerError::InternalError {
            message: "Failed to acquire stats lock".to_string(),
        })?;

        Ok(stats.clone())
    }

    pub fn settings(&self) -> &MixSettings {
        &self.settings
    }

    pub fn sessions(&self) -> Arc<SessionStore> {
        self.sessions.clone()
    }

    fn handle_mix(&self, args: &str, context: &CommandContext) -> Result<CommandReply> {
        self.metrics.record_command("mix");
        let (roster, groups) = gather_inputs(args, context);

        if roster.is_empty() {
            self.metrics.record_rejection("no_players");
            self.bump(|stats| stats.rejected += 1)?;
            return Ok(CommandReply::text_only(NEED_PLAYERS_MESSAGE));
        }
        if roster.len() < MIN_ROSTER {
            self.metrics.record_rejection("roster_too_small");
            self.bump(|stats| stats.rejected += 1)?;
            return Ok(CommandReply::text_only(TOO_FEW_PLAYERS_MESSAGE));
        }

        let timer = self.metrics.start_timer();
        let report = render(&roster, &groups, &self.settings, &mut rand::thread_rng());
        self.metrics.record_mix(&report.assignment, timer.stop());

        info!(
            players = roster.len(),
            groups = groups.len(),
            waitlisted = report.assignment.waitlist.len(),
            "Rendered mix"
        );

        let mix_id = self.sessions.insert(roster, groups)?;
        self.metrics.set_active_sessions(self.sessions.len()?);
        self.bump(|stats| stats.mixes_created += 1)?;

        Ok(CommandReply {
            text: report.text,
            mix_id: Some(mix_id),
            assignment: Some(report.assignment),
        })
    }

    fn bump<F: FnOnce(&mut MixerStats)>(&self, update: F) -> Result<()> {
        let mut stats = self.stats.write().map_err(|_| MixerError::InternalError {
            message: "Failed to acquire stats lock".to_string(),
        })?;

        update(&mut stats);
        Ok(())
    }
}

/// Build the roster and groups for one mix invocation.
///
/// With argument text, both come from parsing it. A bare `!mix` falls back
/// to the voice channel roster; groups cannot be expressed there.
fn gather_inputs(args: &str, context: &CommandContext) -> (Roster, Vec<Group>) {
    if args.is_empty() {
        let roster = match &context.voice_roster {
            Some(members) => roster_from_names(members),
            None => Vec::new(),
        };
        debug!(players = roster.len(), "Built roster from voice channel");
        return (roster, Vec::new());
    }

    let roster = normalize(args, &context.mentions);
    let groups = extract_groups(args, &context.mentions);
    (roster, groups)
}
