//! Platform mention substitution
//!
//! Chat platforms deliver mentions as `<@123>` or `<@!123>` markers inside
//! the message text. The hosting layer resolves the numeric ids to display
//! names and hands the mapping in; this module performs the textual
//! substitution so the rest of the pipeline only ever sees names.

use crate::types::MentionMap;

/// Replace `<@id>` and `<@!id>` markers with the mapped display name.
///
/// Markers whose id is missing from the map are replaced with a space: the
/// unresolved player cannot be named, and keeping the literal marker would
/// turn it into a phantom roster entry. Malformed markers are left untouched.
pub fn resolve_mentions(raw: &str, mentions: &MentionMap) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find("<@") {
        out.push_str(&rest[..start]);
        rest = &rest[start..];

        match parse_mention(rest) {
            Some((id, marker_len)) => {
                match mentions.get(&id) {
                    Some(display) => out.push_str(display),
                    None => out.push(' '),
                }
                rest = &rest[marker_len..];
            }
            None => {
                out.push_str("<@");
                rest = &rest[2..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Parse a mention marker at the start of `text`, returning the id and the
/// marker's byte length. Accepts both the plain and the nickname form.
fn parse_mention(text: &str) -> Option<(u64, usize)> {
    let body = text.strip_prefix("<@")?;
    let (body, bang_len) = match body.strip_prefix('!') {
        Some(stripped) => (stripped, 1),
        None => (body, 0),
    };

    let digits = body.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 || !body[digits..].starts_with('>') {
        return None;
    }

    let id: u64 = body[..digits].parse().ok()?;
    Some((id, 2 + bang_len + digits + 1))
}
