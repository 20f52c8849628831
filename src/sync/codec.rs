//! Environment variable name codec.
//!
//! Environment variable names are restricted to letters, digits and `_`, so
//! characters that appear in config section and key names are spelled out as
//! escape tokens. Each row of the table is replaced across the whole name in
//! order, then the first bare `_` left separates the section from the key:
//!
//! | token          | decodes to |
//! |----------------|------------|
//! | `_DOT_`        | `.`        |
//! | `_HYPHEN_`     | `-`        |
//! | `_PLUS_`       | `+`        |
//! | `_UNDERSCORE_` | `_`        |
//!
//! `Logging_DOT_Console_Some_UNDERSCORE_Var` decodes to section
//! `Logging.Console` and key `Some_Var`.

use thiserror::Error;

const ESCAPES: [(&str, char); 4] = [
    ("_DOT_", '.'),
    ("_HYPHEN_", '-'),
    ("_PLUS_", '+'),
    ("_UNDERSCORE_", '_'),
];

/// How a de-prefixed variable name is turned into `(section, key)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NameScheme {
    /// Escape tokens are decoded before splitting on the first bare `_`.
    #[default]
    Escaped,
    /// Split on the first `_`; nothing is decoded.
    Plain,
}

/// A variable name split into its config coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedName {
    pub section: String,
    pub key: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("`{0}` has no unescaped `_` separating section and key")]
    MissingSeparator(String),
    #[error("`{0}` decodes to an empty section name")]
    EmptySection(String),
    #[error("`{0}` decodes to an empty key")]
    EmptyKey(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    /// Name character not consumed by any escape row.
    Raw(char),
    Decoded(char),
}

/// Decodes a de-prefixed variable name into section and key.
pub fn decode(raw: &str, scheme: NameScheme) -> Result<DecodedName, DecodeError> {
    let (section, key) = match scheme {
        NameScheme::Escaped => split_tokens(&tokenize(raw))
            .ok_or_else(|| DecodeError::MissingSeparator(raw.to_string()))?,
        NameScheme::Plain => raw
            .split_once('_')
            .map(|(section, key)| (section.to_string(), key.to_string()))
            .ok_or_else(|| DecodeError::MissingSeparator(raw.to_string()))?,
    };

    if section.is_empty() {
        return Err(DecodeError::EmptySection(raw.to_string()));
    }
    if key.is_empty() {
        return Err(DecodeError::EmptyKey(raw.to_string()));
    }

    Ok(DecodedName { section, key })
}

/// Spells a section and key as a variable name (without prefix).
///
/// `decode(encode(s, k))` yields `(s, k)` unless a part spells an escape
/// word next to an escaped character: a key `DOT.x` or a section `X+DOT`
/// reads back with `DOT` taken as an escape.
pub fn encode(section: &str, key: &str) -> String {
    let mut out = String::with_capacity(section.len() + key.len() + 1);
    escape_into(section, &mut out);
    out.push('_');
    escape_into(key, &mut out);
    out
}

fn escape_into(part: &str, out: &mut String) {
    for ch in part.chars() {
        match ESCAPES.iter().find(|(_, decoded)| *decoded == ch) {
            Some((token, _)) => out.push_str(token),
            None => out.push(ch),
        }
    }
}

// Rows apply in table order, each a non-overlapping left-to-right replace
// over the characters no earlier row consumed. A decoded `_` is never raw,
// so it cannot become the separator.
fn tokenize(raw: &str) -> Vec<Token> {
    ESCAPES.iter().fold(
        raw.chars().map(Token::Raw).collect::<Vec<_>>(),
        |tokens, (escape, decoded)| replace_escape(&tokens, escape, *decoded),
    )
}

fn replace_escape(tokens: &[Token], escape: &str, decoded: char) -> Vec<Token> {
    let pattern: Vec<Token> = escape.chars().map(Token::Raw).collect();
    let mut replaced = Vec::with_capacity(tokens.len());
    let mut rest = tokens;

    while let Some((first, tail)) = rest.split_first() {
        if rest.starts_with(&pattern) {
            replaced.push(Token::Decoded(decoded));
            rest = &rest[pattern.len()..];
        } else {
            replaced.push(*first);
            rest = tail;
        }
    }

    replaced
}

fn split_tokens(tokens: &[Token]) -> Option<(String, String)> {
    let split = tokens.iter().position(|token| *token == Token::Raw('_'))?;
    Some((collect(&tokens[..split]), collect(&tokens[split + 1..])))
}

fn collect(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|token| match token {
            Token::Raw(ch) | Token::Decoded(ch) => *ch,
        })
        .collect()
}
