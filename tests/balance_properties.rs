//! Property-based tests for team balancing and the player-count tiers

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use team_mixer::balance::balance;
use team_mixer::config::MixSettings;
use team_mixer::report::render;
use team_mixer::types::{Group, PlayerName};

fn numbered_roster(count: usize) -> Vec<PlayerName> {
    (0..count)
        .map(|i| PlayerName::new(&format!("p{}", i)).expect("valid name"))
        .collect()
}

proptest! {
    /// Property: every player lands on exactly one team, nobody is invented
    #[test]
    fn prop_balance_partitions_the_roster(count in 0usize..40, seed in any::<u64>()) {
        let roster = numbered_roster(count);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (team_a, team_b) = balance(&roster, &[], &mut rng);

        prop_assert_eq!(team_a.len() + team_b.len(), count);

        let mut seen: Vec<String> = team_a
            .iter()
            .chain(team_b.iter())
            .map(PlayerName::key)
            .collect();
        seen.sort();
        let mut expected: Vec<String> = roster.iter().map(PlayerName::key).collect();
        expected.sort();
        prop_assert_eq!(seen, expected);
    }

    /// Property: team sizes never differ by more than one player
    #[test]
    fn prop_teams_stay_even(count in 0usize..40, seed in any::<u64>()) {
        let roster = numbered_roster(count);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (team_a, team_b) = balance(&roster, &[], &mut rng);

        prop_assert!(team_a.len().abs_diff(team_b.len()) <= 1);
    }

    /// Property: a pair marked as a group is always separated
    #[test]
    fn prop_pairs_are_dispersed(count in 2usize..30, seed in any::<u64>()) {
        let roster = numbered_roster(count);
        let pair = Group::new(vec![roster[0].clone(), roster[1].clone()]);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (team_a, _team_b) = balance(&roster, &[pair], &mut rng);

        let a_has_first = team_a.iter().any(|p| p.key() == "p0");
        let a_has_second = team_a.iter().any(|p| p.key() == "p1");
        prop_assert_ne!(a_has_first, a_has_second);
    }

    /// Property: any group spreads as evenly as a two-team split allows
    #[test]
    fn prop_groups_split_ceil_floor(
        extra in 0usize..25,
        group_len in 2usize..6,
        seed in any::<u64>()
    ) {
        let roster = numbered_roster(group_len + extra);
        let group = Group::new(roster[..group_len].to_vec());
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (team_a, team_b) = balance(&roster, &[group.clone()], &mut rng);

        let in_a = team_a.iter().filter(|&p| group.contains(p)).count();
        let in_b = team_b.iter().filter(|&p| group.contains(p)).count();
        prop_assert_eq!(in_a + in_b, group_len);
        prop_assert!(in_a.abs_diff(in_b) <= 1);
    }

    /// Property: the tier policy never fields more than two full teams, and
    /// exactly the surplus waits
    #[test]
    fn prop_waitlist_caps_the_match(count in 0usize..40, seed in any::<u64>()) {
        let roster = numbered_roster(count);
        let settings = MixSettings::default();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let report = render(&roster, &[], &settings, &mut rng);
        let assignment = &report.assignment;

        prop_assert!(assignment.team_a.len() <= settings.team_size);
        prop_assert!(assignment.team_b.len() <= settings.team_size);
        prop_assert_eq!(assignment.total_players(), count);
        prop_assert_eq!(
            assignment.waitlist.len(),
            count.saturating_sub(settings.max_playable())
        );
    }

    /// Property: a non-empty roster always renders both team headers, and the
    /// waitlist header appears exactly when someone overflowed
    #[test]
    fn prop_report_always_has_both_teams(count in 1usize..40, seed in any::<u64>()) {
        let roster = numbered_roster(count);
        let settings = MixSettings::default();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let report = render(&roster, &[], &settings, &mut rng);

        prop_assert!(report.text.starts_with("# Team A 🔫"));
        prop_assert!(report.text.contains("# Team B 🔫"));
        prop_assert_eq!(
            report.text.contains("# Waitlist ⏳"),
            count > settings.max_playable()
        );
    }
}
