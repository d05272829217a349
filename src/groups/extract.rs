//! Bracket scanning for anti-stacking groups
//!
//! Callers mark a clique by wrapping its names in any of the three bracket
//! pairs: `(a, b)`, `[a, b]` or `{a, b}`. Each kind is scanned independently
//! over the whole input, parentheses first, then square brackets, then
//! braces; within one kind, spans keep document order. Brackets never nest:
//! a span only counts when its interior is free of bracket characters of any
//! kind, so stray or unbalanced brackets degrade to no group rather than an
//! error.

use crate::roster::mentions::resolve_mentions;
use crate::roster::normalize::{is_bracket, tokenize};
use crate::types::{Group, MentionMap};

const BRACKET_KINDS: [(char, char); 3] = [('(', ')'), ('[', ']'), ('{', '}')];

/// Extract anti-stacking groups from the bracketed spans of the raw text.
///
/// Mentions are substituted before scanning so `(<@1>, <@2>)` groups the
/// resolved names. Interiors are tokenized with the same separator and dedup
/// rules as the roster itself; spans that tokenize to nothing are dropped. A
/// single-member group is kept here and only filtered where membership rules
/// demand it.
pub fn extract_groups(raw: &str, mentions: &MentionMap) -> Vec<Group> {
    let resolved = resolve_mentions(raw, mentions);
    let mut groups = Vec::new();

    for (open, close) in BRACKET_KINDS {
        for span in scan_spans(&resolved, open, close) {
            let members = tokenize(span);
            if !members.is_empty() {
                groups.push(Group::new(members));
            }
        }
    }

    groups
}

/// Find non-nesting `open .. close` spans and yield their interiors.
///
/// A candidate opener matches only when the next bracket character of any
/// kind is its own closer. Otherwise the scan resumes just past the opener,
/// which lets an inner span of another kind still match on its own pass.
fn scan_spans(text: &str, open: char, close: char) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut search_from = 0;

    while let Some(found) = text[search_from..].find(open) {
        let open_at = search_from + found;
        let interior_start = open_at + open.len_utf8();

        match text[interior_start..].find(is_bracket) {
            Some(next) => {
                let next_at = interior_start + next;
                if text[next_at..].starts_with(close) {
                    spans.push(&text[interior_start..next_at]);
                    search_from = next_at + close.len_utf8();
                } else {
                    search_from = interior_start;
                }
            }
            // Unclosed opener with no brackets after it; nothing left to match.
            None => break,
        }
    }

    spans
}
