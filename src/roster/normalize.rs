//! Raw-text normalization into a canonical player list

use crate::roster::mentions::resolve_mentions;
use crate::types::{MentionMap, PlayerName, Roster};
use std::collections::HashSet;

/// Characters that delimit player names. Runs of any mix of these collapse
/// into a single split point, so `"a,,  - b"` parses the same as `"a b"`.
pub(crate) fn is_separator(c: char) -> bool {
    c == ',' || c == ';' || c == '-' || c.is_whitespace()
}

/// Group-syntax characters. All three bracket kinds are recognized so that
/// whichever pair the caller types, none of them leaks into a player name.
pub(crate) fn is_bracket(c: char) -> bool {
    matches!(c, '(' | ')' | '[' | ']' | '{' | '}')
}

/// Split already-resolved text into deduplicated player names.
///
/// Shared by the normalizer and the group extractor: the separator set and
/// the case-insensitive first-wins dedup are identical whether the text is a
/// whole command argument or a single bracket interior.
pub(crate) fn tokenize(text: &str) -> Vec<PlayerName> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for token in text.split(is_separator).filter(|t| !t.is_empty()) {
        if let Some(name) = PlayerName::new(token) {
            if seen.insert(name.key()) {
                names.push(name);
            }
        }
    }

    names
}

/// Turn raw command text into an ordered, deduplicated roster.
///
/// Mentions are substituted first, bracket characters are blanked out (group
/// syntax never survives into a name), and the remainder is split on
/// separator runs. First occurrence wins ties on both position and casing.
/// Empty or all-noise input yields an empty roster; this never fails.
pub fn normalize(raw: &str, mentions: &MentionMap) -> Roster {
    let resolved = resolve_mentions(raw, mentions);
    let stripped: String = resolved
        .chars()
        .map(|c| if is_bracket(c) { ' ' } else { c })
        .collect();
    tokenize(&stripped)
}

/// Build a roster from pre-resolved display names, the voice-channel path.
///
/// Unlike [`normalize`] this never splits a name, so display names with
/// internal spaces stay whole. Dedup matches the text path: case-insensitive,
/// first occurrence wins.
pub fn roster_from_names<I, S>(names: I) -> Roster
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut roster = Vec::new();

    for raw in names {
        if let Some(name) = PlayerName::new(raw.as_ref()) {
            if seen.insert(name.key()) {
                roster.push(name);
            }
        }
    }

    roster
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MentionMap;

    fn no_mentions() -> MentionMap {
        MentionMap::new()
    }

    fn names(roster: &Roster) -> Vec<&str> {
        roster.iter().map(PlayerName::as_str).collect()
    }

    #[test]
    fn test_separators_are_interchangeable() {
        let expected = vec!["A", "B", "C", "D"];
        for input in ["A,B C-D", "A, B; C - D", "A;;B,,C--D", "A\tB\nC D"] {
            let roster = normalize(input, &no_mentions());
            assert_eq!(names(&roster), expected, "input: {input:?}");
        }
    }

    #[test]
    fn test_case_insensitive_dedup_keeps_first_casing() {
        let roster = normalize("Ana, ana, ANA", &no_mentions());
        assert_eq!(names(&roster), vec!["Ana"]);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let first = normalize("  Ana,, bob -  CID ", &no_mentions());
        let rejoined = first
            .iter()
            .map(PlayerName::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let second = normalize(&rejoined, &no_mentions());
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_and_noise_only_input() {
        assert!(normalize("", &no_mentions()).is_empty());
        assert!(normalize("  ,,; --- ,  ", &no_mentions()).is_empty());
    }

    #[test]
    fn test_bracket_characters_never_reach_names() {
        let roster = normalize("ana (bob, cid) [dora] {eva}", &no_mentions());
        assert_eq!(names(&roster), vec!["ana", "bob", "cid", "dora", "eva"]);
    }

    #[test]
    fn test_mentions_resolve_before_splitting() {
        let mut mentions = MentionMap::new();
        mentions.insert(1, "Ana".to_string());
        let roster = normalize("<@1>, bob", &mentions);
        assert_eq!(names(&roster), vec!["Ana", "bob"]);
    }

    #[test]
    fn test_unresolved_mentions_degrade_to_nothing() {
        let roster = normalize("<@999>, bob", &no_mentions());
        assert_eq!(names(&roster), vec!["bob"]);
    }

    #[test]
    fn test_voice_names_keep_internal_spaces() {
        let roster = roster_from_names(["Ana Maria", "  Bob ", "ana maria"]);
        assert_eq!(names(&roster), vec!["Ana Maria", "Bob"]);
    }

    #[test]
    fn test_voice_names_skip_blanks() {
        let roster = roster_from_names(["", "  ", "Ana"]);
        assert_eq!(names(&roster), vec!["Ana"]);
    }
}
