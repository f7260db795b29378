//! Placeholder protection for text transforms
//!
//! Leaf values in game and UI locale files are full of markup that must
//! survive any transformation byte-for-byte: `%server_name%` interpolation
//! markers, `{player}` braces, `&a` legacy color codes, and `<shift:-8>`
//! style tag spans. This module splits a string into an ordered token
//! stream in a single left-to-right pass; protected spans are carried as
//! whole tokens, so no sentinel text is ever spliced into the character
//! stream and collisions with user content are impossible by construction.
//!
//! Concatenating the token texts in order reproduces the input exactly.

/// One segment of a scanned string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Ordinary text, eligible for character substitution.
    Text(String),
    /// A protected span, reproduced verbatim by every consumer.
    Protected(String),
}

impl Token {
    /// The token's text regardless of kind.
    pub fn as_str(&self) -> &str {
        match self {
            Token::Text(s) | Token::Protected(s) => s,
        }
    }
}

/// Split `text` into ordinary and protected segments.
///
/// At each position the longest match among the four protected syntaxes
/// wins; everything else accumulates into `Text` runs. Tokens appear in
/// discovery order.
pub fn tokenize(text: &str) -> Vec<Token> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut run = String::new();
    let mut i = 0;
    while i < chars.len() {
        match protected_len(&chars[i..]) {
            Some(len) => {
                if !run.is_empty() {
                    tokens.push(Token::Text(std::mem::take(&mut run)));
                }
                tokens.push(Token::Protected(chars[i..i + len].iter().collect()));
                i += len;
            }
            None => {
                run.push(chars[i]);
                i += 1;
            }
        }
    }
    if !run.is_empty() {
        tokens.push(Token::Text(run));
    }
    tokens
}

/// Length in chars of the longest protected span starting at `rest[0]`.
fn protected_len(rest: &[char]) -> Option<usize> {
    [
        delimited_len(rest, '%', '%'),
        delimited_len(rest, '{', '}'),
        color_code_len(rest),
        delimited_len(rest, '<', '>'),
    ]
    .into_iter()
    .flatten()
    .max()
}

/// `open ... close` where the interior excludes the closing character.
/// Covers `%...%`, `{...}` and `<...>` spans; an unclosed opener is plain
/// text.
fn delimited_len(rest: &[char], open: char, close: char) -> Option<usize> {
    if rest.first() != Some(&open) {
        return None;
    }
    rest[1..].iter().position(|&c| c == close).map(|p| p + 2)
}

/// `&` followed by a single ASCII alphanumeric (legacy color code).
fn color_code_len(rest: &[char]) -> Option<usize> {
    if rest.first() == Some(&'&') && rest.get(1).is_some_and(|c| c.is_ascii_alphanumeric()) {
        Some(2)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn protected(text: &str) -> Vec<String> {
        tokenize(text)
            .into_iter()
            .filter_map(|t| match t {
                Token::Protected(s) => Some(s),
                Token::Text(_) => None,
            })
            .collect()
    }

    fn reassemble(text: &str) -> String {
        tokenize(text).iter().map(Token::as_str).collect()
    }

    #[test]
    fn test_percent_span() {
        assert_eq!(protected("join %server_name% now"), vec!["%server_name%"]);
    }

    #[test]
    fn test_brace_span() {
        assert_eq!(protected("hello {player}!"), vec!["{player}"]);
    }

    #[test]
    fn test_color_codes() {
        assert_eq!(protected("&7gray &atext"), vec!["&7", "&a"]);
    }

    #[test]
    fn test_tag_spans() {
        assert_eq!(
            protected("<shift:-8><glyph:skills_gui>hello"),
            vec!["<shift:-8>", "<glyph:skills_gui>"]
        );
    }

    #[test]
    fn test_attribute_tag() {
        assert_eq!(
            protected(r#"<hover:show_text:"hi">click"#),
            vec![r#"<hover:show_text:"hi">"#]
        );
    }

    #[test]
    fn test_unclosed_delimiters_are_text() {
        assert_eq!(protected("50% done"), Vec::<String>::new());
        assert_eq!(protected("open { brace"), Vec::<String>::new());
        assert_eq!(protected("a < b"), Vec::<String>::new());
    }

    #[test]
    fn test_lone_ampersand_is_text() {
        assert_eq!(protected("salt & pepper"), Vec::<String>::new());
    }

    #[test]
    fn test_tokens_in_discovery_order() {
        let tokens = tokenize("&a{x}%y%");
        assert_eq!(
            tokens,
            vec![
                Token::Protected("&a".to_string()),
                Token::Protected("{x}".to_string()),
                Token::Protected("%y%".to_string()),
            ]
        );
    }

    #[test]
    fn test_concatenation_reproduces_input() {
        for text in [
            "",
            "plain text",
            "<shift:-8><glyph:skills_gui>hello",
            "mixed %a% and {b} with &7codes",
            "unclosed %marker and { brace",
            "ünïcodé %täg% text",
        ] {
            assert_eq!(reassemble(text), text);
        }
    }
}
