//! Random two-team partitioning
//!
//! Fairness here means uniform randomness, not skill: every shuffle draws
//! from the caller's RNG, so production uses a thread RNG while tests seed a
//! deterministic one and replay exact layouts.

use crate::types::{Group, PlayerName};
use rand::seq::SliceRandom;
use rand::Rng;

/// Split `players` into two teams, spreading each group's members across
/// both sides.
///
/// With no groups this is a plain shuffle cut at the ceiling half, Team A
/// taking the larger side on odd counts. With groups, each group is drained
/// from the pool in a shuffled processing order and its present members are
/// divided between the teams; a player named in several groups goes with
/// whichever group comes up first. Ungrouped players then top the teams up
/// to sizes as close to even as the group splits allow, with Team B taking
/// the larger side when the count is odd. Both teams are shuffled once more
/// at the end so group members do not cluster at the front of a line.
pub fn balance<R: Rng + ?Sized>(
    players: &[PlayerName],
    groups: &[Group],
    rng: &mut R,
) -> (Vec<PlayerName>, Vec<PlayerName>) {
    if groups.is_empty() {
        return split_evenly(players, rng);
    }

    let mut pool: Vec<PlayerName> = players.to_vec();
    let mut team_a = Vec::new();
    let mut team_b = Vec::new();

    let mut order: Vec<usize> = (0..groups.len()).collect();
    order.shuffle(rng);

    for index in order {
        let group = &groups[index];

        let mut members = Vec::new();
        pool.retain(|player| {
            if group.contains(player) {
                members.push(player.clone());
                false
            } else {
                true
            }
        });

        if members.is_empty() {
            continue;
        }

        members.shuffle(rng);
        let split = (members.len() + 1) / 2;
        team_b.extend(members.split_off(split));
        team_a.extend(members);
    }

    // The pool now holds only ungrouped players. Aim Team A at the ceiling
    // half of the full roster, then concede the odd player to Team B when
    // the group splits already left Team A ahead.
    pool.shuffle(rng);
    let target_a = (players.len() + 1) / 2;
    let mut share_a = target_a.saturating_sub(team_a.len()).min(pool.len());
    let share_b = pool.len() - share_a;
    if share_a > 0 && team_a.len() + share_a > team_b.len() + share_b {
        share_a -= 1;
    }

    let mut rest = pool.split_off(share_a);
    team_a.append(&mut pool);
    team_b.append(&mut rest);

    team_a.shuffle(rng);
    team_b.shuffle(rng);
    (team_a, team_b)
}

/// The no-groups path: uniform shuffle, Team A takes the ceiling half.
fn split_evenly<R: Rng + ?Sized>(
    players: &[PlayerName],
    rng: &mut R,
) -> (Vec<PlayerName>, Vec<PlayerName>) {
    let mut team_a = players.to_vec();
    team_a.shuffle(rng);
    let team_b = team_a.split_off((team_a.len() + 1) / 2);
    (team_a, team_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Roster;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn roster(names: &[&str]) -> Roster {
        names
            .iter()
            .map(|n| PlayerName::new(n).unwrap())
            .collect()
    }

    fn keys(players: &[PlayerName]) -> HashSet<String> {
        players.iter().map(PlayerName::key).collect()
    }

    fn assert_partitions(original: &[PlayerName], a: &[PlayerName], b: &[PlayerName]) {
        assert_eq!(a.len() + b.len(), original.len());
        let union: HashSet<String> = keys(a).union(&keys(b)).cloned().collect();
        assert_eq!(union, keys(original));
        assert!(keys(a).is_disjoint(&keys(b)));
    }

    #[test]
    fn test_plain_split_gives_team_a_the_larger_half() {
        let players = roster(&["a", "b", "c", "d", "e", "f", "g"]);
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let (a, b) = balance(&players, &[], &mut rng);
            assert_eq!(a.len(), 4);
            assert_eq!(b.len(), 3);
            assert_partitions(&players, &a, &b);
        }
    }

    #[test]
    fn test_plain_split_even_roster() {
        let players = roster(&["a", "b", "c", "d"]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let (a, b) = balance(&players, &[], &mut rng);
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 2);
        assert_partitions(&players, &a, &b);
    }

    #[test]
    fn test_single_player_lands_on_team_a() {
        let players = roster(&["solo"]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let (a, b) = balance(&players, &[], &mut rng);
        assert_eq!(a.len(), 1);
        assert!(b.is_empty());
    }

    #[test]
    fn test_pair_group_is_always_split() {
        let players = roster(&["a", "b", "c", "d", "e", "f"]);
        let group = Group::new(roster(&["a", "b"]));
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let (team_a, team_b) = balance(&players, &[group.clone()], &mut rng);
            assert_partitions(&players, &team_a, &team_b);
            assert_eq!(team_a.len(), 3);
            assert_eq!(team_b.len(), 3);

            let a_has = keys(&team_a).contains("a");
            let b_has = keys(&team_b).contains("a");
            assert!(a_has != b_has);
            let together = keys(&team_a).contains("a") == keys(&team_a).contains("b");
            assert!(!together, "group landed on one team with seed {seed}");
        }
    }

    #[test]
    fn test_odd_roster_with_groups_gives_team_b_the_extra() {
        let players = roster(&["a", "b", "c", "d", "e", "f", "g", "h", "i"]);
        let group = Group::new(roster(&["a", "b"]));
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let (team_a, team_b) = balance(&players, &[group.clone()], &mut rng);
            assert_partitions(&players, &team_a, &team_b);
            assert_eq!(team_a.len(), 4);
            assert_eq!(team_b.len(), 5);
        }
    }

    #[test]
    fn test_group_of_three_splits_two_one() {
        let players = roster(&["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"]);
        let group = Group::new(roster(&["a", "b", "c"]));
        for seed in 0..30 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let (team_a, team_b) = balance(&players, &[group.clone()], &mut rng);
            assert_partitions(&players, &team_a, &team_b);
            assert_eq!(team_a.len(), 5);
            assert_eq!(team_b.len(), 5);

            let on_a = ["a", "b", "c"]
                .iter()
                .filter(|n| keys(&team_a).contains(**n))
                .count();
            assert!(on_a == 1 || on_a == 2, "group unsplit with seed {seed}");
        }
    }

    #[test]
    fn test_player_in_two_groups_is_assigned_once() {
        let players = roster(&["a", "b", "c", "d", "e", "f"]);
        let overlapping = vec![
            Group::new(roster(&["a", "b"])),
            Group::new(roster(&["a", "c"])),
        ];
        for seed in 0..30 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let (team_a, team_b) = balance(&players, &overlapping, &mut rng);
            assert_partitions(&players, &team_a, &team_b);
        }
    }

    #[test]
    fn test_absent_group_members_are_ignored() {
        let players = roster(&["a", "b", "c", "d"]);
        let group = Group::new(roster(&["zz", "yy"]));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (team_a, team_b) = balance(&players, &[group], &mut rng);
        assert_partitions(&players, &team_a, &team_b);
        assert_eq!(team_a.len(), 2);
        assert_eq!(team_b.len(), 2);
    }

    #[test]
    fn test_group_membership_is_case_insensitive() {
        let players = roster(&["Ana", "Bob", "Cid", "Dora"]);
        let group = Group::new(roster(&["ANA", "bob"]));
        for seed in 0..30 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let (team_a, team_b) = balance(&players, &[group.clone()], &mut rng);
            let together =
                keys(&team_a).contains("ana") == keys(&team_a).contains("bob");
            assert!(!together, "seed {seed}");
            assert_partitions(&players, &team_a, &team_b);
        }
    }

    #[test]
    fn test_everyone_grouped_still_partitions() {
        let players = roster(&["a", "b", "c", "d"]);
        let group = Group::new(players.clone());
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let (team_a, team_b) = balance(&players, &[group], &mut rng);
        assert_partitions(&players, &team_a, &team_b);
        assert_eq!(team_a.len(), 2);
        assert_eq!(team_b.len(), 2);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let players = roster(&["a", "b", "c", "d", "e", "f", "g"]);
        let group = Group::new(roster(&["a", "b"]));

        let mut first = ChaCha8Rng::seed_from_u64(42);
        let mut second = ChaCha8Rng::seed_from_u64(42);
        let one = balance(&players, &[group.clone()], &mut first);
        let two = balance(&players, &[group], &mut second);
        assert_eq!(one, two);
    }
}
