//! Tier policy and report formatting
//!
//! The tier policy sits between roster parsing and balancing: with more
//! players than two full teams can hold, the surplus is drawn at random into
//! a waitlist; at or below that cap everyone plays. The formatter turns the
//! resulting assignment into the reply text posted back to the channel.

use crate::balance::balance;
use crate::config::MixSettings;
use crate::types::{Group, PlayerName, TeamAssignment};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Reply for a render with nobody to mix.
pub const NO_PLAYERS_MESSAGE: &str = "🚨 No players found. Nothing to mix!";

/// A rendered mix: the reply text plus the assignment backing it.
#[derive(Debug, Clone)]
pub struct MixReport {
    pub text: String,
    pub assignment: TeamAssignment,
}

/// Render a mix for `players`, honoring the player-count tiers.
///
/// An empty roster short-circuits to [`NO_PLAYERS_MESSAGE`] with an empty
/// assignment; this never fails. Above `max_playable` the playing set is
/// drawn uniformly at random and the rest go to the waitlist, with groups
/// that lost members dropped before balancing. At or below the cap the whole
/// roster is balanced directly.
pub fn render<R: Rng + ?Sized>(
    players: &[PlayerName],
    groups: &[Group],
    settings: &MixSettings,
    rng: &mut R,
) -> MixReport {
    if players.is_empty() {
        return MixReport {
            text: NO_PLAYERS_MESSAGE.to_string(),
            assignment: TeamAssignment::default(),
        };
    }

    let (playing, waitlist, active_groups) = if players.len() > settings.max_playable() {
        select_playing_set(players, groups, settings.max_playable(), rng)
    } else {
        (players.to_vec(), Vec::new(), groups.to_vec())
    };

    let (team_a, team_b) = balance(&playing, &active_groups, rng);
    let assignment = TeamAssignment {
        team_a,
        team_b,
        waitlist,
    };
    let text = format_report(&assignment, settings.team_size);

    MixReport { text, assignment }
}

/// Overflow tier: draw the playing set uniformly and keep only the groups
/// that survived intact.
///
/// A group with a member on the waitlist no longer describes a clique inside
/// the match, so it is dropped entirely rather than half-enforced. Trivial
/// single-member groups are dropped here too.
fn select_playing_set<R: Rng + ?Sized>(
    players: &[PlayerName],
    groups: &[Group],
    max_playable: usize,
    rng: &mut R,
) -> (Vec<PlayerName>, Vec<PlayerName>, Vec<Group>) {
    let mut playing = players.to_vec();
    playing.shuffle(rng);
    let waitlist = playing.split_off(max_playable);

    let playing_keys: HashSet<String> = playing.iter().map(PlayerName::key).collect();
    let surviving = groups
        .iter()
        .filter(|group| {
            group.len() > 1
                && group
                    .members()
                    .iter()
                    .all(|member| playing_keys.contains(&member.key()))
        })
        .cloned()
        .collect();

    (playing, waitlist, surviving)
}

/// Format the channel reply: both team blocks, plus a waitlist block when
/// anyone overflowed.
fn format_report(assignment: &TeamAssignment, team_size: usize) -> String {
    let mut report = format!(
        "# Team A 🔫\n {}\n\n# Team B 🔫\n {}",
        team_line(&assignment.team_a, &assignment.team_b, team_size),
        team_line(&assignment.team_b, &assignment.team_a, team_size),
    );

    if !assignment.waitlist.is_empty() {
        report.push_str("\n\n# Waitlist ⏳\n ");
        report.push_str(&join_names(&assignment.waitlist));
    }

    report
}

/// One team's names, plus a `(+k to complete)` tail when the team is short.
///
/// Only the short side advertises how many players it is missing: a team
/// that already outnumbers its opponent stays quiet, since the next players
/// to join would be sent to the other team first.
fn team_line(team: &[PlayerName], opponent: &[PlayerName], team_size: usize) -> String {
    let line = join_names(team);
    let missing = team_size.saturating_sub(team.len());
    if missing > 0 && team.len() <= opponent.len() {
        format!("{line} (+{missing} to complete)")
    } else {
        line
    }
}

fn join_names(names: &[PlayerName]) -> String {
    names
        .iter()
        .map(PlayerName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Roster;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn roster(names: &[&str]) -> Roster {
        names
            .iter()
            .map(|n| PlayerName::new(n).unwrap())
            .collect()
    }

    fn numbered(count: usize) -> Roster {
        (1..=count)
            .map(|i| PlayerName::new(&format!("p{i}")).unwrap())
            .collect()
    }

    fn settings() -> MixSettings {
        MixSettings::default()
    }

    #[test]
    fn test_empty_roster_renders_fixed_message() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let report = render(&[], &[], &settings(), &mut rng);
        assert_eq!(report.text, NO_PLAYERS_MESSAGE);
        assert_eq!(report.assignment.total_players(), 0);
    }

    #[test]
    fn test_eleven_players_waitlists_exactly_one() {
        let players = numbered(11);
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let report = render(&players, &[], &settings(), &mut rng);
            let assignment = &report.assignment;
            assert_eq!(assignment.team_a.len(), 5);
            assert_eq!(assignment.team_b.len(), 5);
            assert_eq!(assignment.waitlist.len(), 1);
            assert_eq!(assignment.total_players(), 11);
            assert!(report.text.contains("# Waitlist ⏳"));
        }
    }

    #[test]
    fn test_exactly_ten_players_has_no_waitlist() {
        let players = numbered(10);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let report = render(&players, &[], &settings(), &mut rng);
        assert_eq!(report.assignment.team_a.len(), 5);
        assert_eq!(report.assignment.team_b.len(), 5);
        assert!(report.assignment.waitlist.is_empty());
        assert!(!report.text.contains("Waitlist"));
        assert!(!report.text.contains("to complete"));
    }

    #[test]
    fn test_seven_players_tags_only_team_b() {
        let players = numbered(7);
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let report = render(&players, &[], &settings(), &mut rng);
            assert_eq!(report.assignment.team_a.len(), 4);
            assert_eq!(report.assignment.team_b.len(), 3);

            let team_a_block = report
                .text
                .split("# Team B")
                .next()
                .unwrap()
                .to_string();
            assert!(!team_a_block.contains("to complete"));
            assert!(report.text.contains("(+2 to complete)"));
        }
    }

    #[test]
    fn test_even_short_roster_tags_both_teams() {
        let players = numbered(6);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let report = render(&players, &[], &settings(), &mut rng);
        assert_eq!(report.assignment.team_a.len(), 3);
        assert_eq!(report.assignment.team_b.len(), 3);
        assert_eq!(report.text.matches("(+2 to complete)").count(), 2);
    }

    #[test]
    fn test_single_player_still_renders_teams() {
        let players = roster(&["solo"]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let report = render(&players, &[], &settings(), &mut rng);
        assert_eq!(report.assignment.team_a.len(), 1);
        assert!(report.assignment.team_b.is_empty());
        assert!(report.text.starts_with("# Team A 🔫"));
        assert!(report.text.contains("(+5 to complete)"));
    }

    #[test]
    fn test_overflow_drops_groups_broken_by_the_waitlist() {
        // Every player shares one big group; after the draw to 10 the group
        // has lost someone, so balancing runs without it.
        let players = numbered(12);
        let group = Group::new(players.clone());
        for seed in 0..10 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let report = render(&players, &[group.clone()], &settings(), &mut rng);
            assert_eq!(report.assignment.team_a.len(), 5);
            assert_eq!(report.assignment.team_b.len(), 5);
            assert_eq!(report.assignment.waitlist.len(), 2);
        }
    }

    #[test]
    fn test_overflow_keeps_groups_fully_inside_the_match() {
        let players = numbered(11);
        let pair = Group::new(roster(&["p1", "p2"]));
        let mut saw_surviving_pair = false;

        for seed in 0..40 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let report = render(&players, &[pair.clone()], &settings(), &mut rng);
            let assignment = &report.assignment;
            assert_eq!(assignment.total_players(), 11);

            let waiting: Vec<String> =
                assignment.waitlist.iter().map(PlayerName::key).collect();
            if !waiting.contains(&"p1".to_string()) && !waiting.contains(&"p2".to_string()) {
                saw_surviving_pair = true;
                let a_has_p1 = assignment.team_a.iter().any(|p| p.key() == "p1");
                let a_has_p2 = assignment.team_a.iter().any(|p| p.key() == "p2");
                assert_ne!(a_has_p1, a_has_p2, "intact pair not split, seed {seed}");
            }
        }

        assert!(saw_surviving_pair, "no seed kept the pair in the match");
    }

    #[test]
    fn test_groups_reach_the_balancer_below_the_cap() {
        let players = numbered(8);
        let pair = Group::new(roster(&["p1", "p2"]));
        for seed in 0..30 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let report = render(&players, &[pair.clone()], &settings(), &mut rng);
            let a_has_p1 = report.assignment.team_a.iter().any(|p| p.key() == "p1");
            let a_has_p2 = report.assignment.team_a.iter().any(|p| p.key() == "p2");
            assert_ne!(a_has_p1, a_has_p2, "pair not split, seed {seed}");
        }
    }

    #[test]
    fn test_report_layout() {
        let players = roster(&["ana", "bob", "cid", "dora"]);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let report = render(&players, &[], &settings(), &mut rng);

        let lines: Vec<&str> = report.text.lines().collect();
        assert_eq!(lines[0], "# Team A 🔫");
        assert!(lines[1].starts_with(' '));
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "# Team B 🔫");
        assert!(lines[4].starts_with(' '));
    }

    #[test]
    fn test_custom_team_size_moves_the_cap() {
        let mut settings = MixSettings::default();
        settings.team_size = 2;

        let players = numbered(5);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let report = render(&players, &[], &settings, &mut rng);
        assert_eq!(report.assignment.team_a.len(), 2);
        assert_eq!(report.assignment.team_b.len(), 2);
        assert_eq!(report.assignment.waitlist.len(), 1);
    }
}
