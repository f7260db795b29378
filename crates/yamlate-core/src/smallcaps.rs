//! Small-caps transcoding of document text
//!
//! A stylistic transform mapping Latin letters to Unicode small-caps
//! glyphs, and back. Placeholders are protected via the tokenizer in
//! [`crate::placeholder`]; everything outside a protected span goes
//! through a fixed case-insensitive lookup per codepoint.
//!
//! The table is lossy: `s` and `x` have no distinct small-caps glyph, so
//! uppercase `S`/`X` encode to lowercase and cannot be recovered by
//! [`decode`]. That is an accepted property of the alphabet, not a bug.

use serde_yaml::Value;

use crate::document::{flatten, unflatten, FlatEntry};
use crate::placeholder::{tokenize, Token};

/// Which way the transcoder runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ordinary letters to small-caps glyphs.
    Encode,
    /// Small-caps glyphs back to ordinary letters.
    Decode,
}

/// Counters for a whole-document transform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformStats {
    /// Leaves whose text actually changed.
    pub changed: usize,
    /// All leaves visited.
    pub total: usize,
}

/// Small-caps glyph for a Latin letter, case-insensitive.
/// `s` and `x` map to themselves; there is no distinct glyph for them.
fn encode_char(c: char) -> Option<char> {
    match c.to_ascii_lowercase() {
        'a' => Some('ᴀ'),
        'b' => Some('ʙ'),
        'c' => Some('ᴄ'),
        'd' => Some('ᴅ'),
        'e' => Some('ᴇ'),
        'f' => Some('ꜰ'),
        'g' => Some('ɢ'),
        'h' => Some('ʜ'),
        'i' => Some('ɪ'),
        'j' => Some('ᴊ'),
        'k' => Some('ᴋ'),
        'l' => Some('ʟ'),
        'm' => Some('ᴍ'),
        'n' => Some('ɴ'),
        'o' => Some('ᴏ'),
        'p' => Some('ᴘ'),
        'q' => Some('ǫ'),
        'r' => Some('ʀ'),
        's' => Some('s'),
        't' => Some('ᴛ'),
        'u' => Some('ᴜ'),
        'v' => Some('ᴠ'),
        'w' => Some('ᴡ'),
        'x' => Some('x'),
        'y' => Some('ʏ'),
        'z' => Some('ᴢ'),
        _ => None,
    }
}

/// Best-effort inverse for the 24 letters with a distinct glyph.
fn decode_char(c: char) -> Option<char> {
    match c {
        'ᴀ' => Some('a'),
        'ʙ' => Some('b'),
        'ᴄ' => Some('c'),
        'ᴅ' => Some('d'),
        'ᴇ' => Some('e'),
        'ꜰ' => Some('f'),
        'ɢ' => Some('g'),
        'ʜ' => Some('h'),
        'ɪ' => Some('i'),
        'ᴊ' => Some('j'),
        'ᴋ' => Some('k'),
        'ʟ' => Some('l'),
        'ᴍ' => Some('m'),
        'ɴ' => Some('n'),
        'ᴏ' => Some('o'),
        'ᴘ' => Some('p'),
        'ǫ' => Some('q'),
        'ʀ' => Some('r'),
        'ᴛ' => Some('t'),
        'ᴜ' => Some('u'),
        'ᴠ' => Some('v'),
        'ᴡ' => Some('w'),
        'ʏ' => Some('y'),
        'ᴢ' => Some('z'),
        _ => None,
    }
}

/// Convert ordinary text to small caps, preserving placeholders verbatim.
pub fn encode(text: &str) -> String {
    transcode(text, Direction::Encode)
}

/// Convert small-caps text back to ordinary letters, preserving
/// placeholders verbatim.
pub fn decode(text: &str) -> String {
    transcode(text, Direction::Decode)
}

fn transcode(text: &str, direction: Direction) -> String {
    tokenize(text)
        .into_iter()
        .map(|token| match token {
            Token::Protected(span) => span,
            Token::Text(run) => run
                .chars()
                .map(|c| substitute(c, direction).unwrap_or(c))
                .collect(),
        })
        .collect()
}

fn substitute(c: char, direction: Direction) -> Option<char> {
    match direction {
        Direction::Encode => encode_char(c),
        Direction::Decode => decode_char(c),
    }
}

/// Apply the transcoder to every non-empty string leaf of a document.
///
/// Non-string leaves and whitespace-only strings pass through untouched.
/// Returns the rebuilt tree plus changed/total counters.
pub fn transform_document(doc: &Value, direction: Direction) -> (Value, TransformStats) {
    let mut stats = TransformStats::default();
    let entries: Vec<FlatEntry> = flatten(doc)
        .into_iter()
        .map(|mut entry| {
            stats.total += 1;
            if let Value::String(text) = &entry.value {
                if !text.trim().is_empty() {
                    let converted = transcode(text, direction);
                    if converted != *text {
                        stats.changed += 1;
                    }
                    entry.value = Value::String(converted);
                }
            }
            entry
        })
        .collect();
    (unflatten(&entries), stats)
}
