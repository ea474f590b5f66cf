//! Token records returned by the compiler service.
//!
//! A token labels a byte range of the submitted source text with a lexical
//! kind (e.g. `KEYWORD`) and a value (the lexeme or its canonical form).
//! The service lists tokens in non-decreasing start order without overlaps,
//! but nothing here relies on that: span sanity is render-time policy in
//! [`crate::segment`], so a misbehaving service degrades a highlight rather
//! than crashing the viewer.

use serde::{Deserialize, Serialize};

/// A labeled span of the submitted source text.
///
/// `start`/`end` are byte offsets into the exact text that was compiled.
/// The wire field for the kind is `token` (the service's vocabulary); the
/// deserializer also accepts `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Lexical category, e.g. `KEYWORD` or `IDENT`.
    #[serde(rename = "token", alias = "type")]
    pub kind: String,
    /// Literal text or canonical form of the lexeme.
    pub value: String,
    /// Byte offset of the first byte of the span.
    pub start: usize,
    /// Byte offset one past the last byte of the span.
    pub end: usize,
}

impl Token {
    pub fn new(
        kind: impl Into<String>,
        value: impl Into<String>,
        start: usize,
        end: usize,
    ) -> Self {
        Token {
            kind: kind.into(),
            value: value.into(),
            start,
            end,
        }
    }
}

/// Unique token kinds in first-seen order.
///
/// Feeds the kind chooser; the order matches the order kinds appear in the
/// stream, not alphabetical order.
pub fn token_kinds(tokens: &[Token]) -> Vec<String> {
    let mut kinds: Vec<String> = Vec::new();
    for token in tokens {
        if !kinds.iter().any(|k| *k == token.kind) {
            kinds.push(token.kind.clone());
        }
    }
    kinds
}

/// Unique values among tokens of the given kind, first-seen order.
///
/// An absent kind yields no values: the value chooser only exists once a
/// kind has been chosen.
pub fn values_for_kind(tokens: &[Token], kind: Option<&str>) -> Vec<String> {
    let Some(kind) = kind else {
        return Vec::new();
    };
    let mut values: Vec<String> = Vec::new();
    for token in tokens.iter().filter(|t| t.kind == kind) {
        if !values.iter().any(|v| *v == token.value) {
            values.push(token.value.clone());
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Token> {
        vec![
            Token::new("KEYWORD", "int", 0, 3),
            Token::new("IDENT", "x", 4, 5),
            Token::new("KEYWORD", "int", 9, 12),
            Token::new("IDENT", "y", 13, 14),
            Token::new("KEYWORD", "return", 16, 22),
        ]
    }

    #[test]
    fn kinds_are_deduped_in_first_seen_order() {
        assert_eq!(token_kinds(&sample()), vec!["KEYWORD", "IDENT"]);
    }

    #[test]
    fn kinds_of_empty_list_are_empty() {
        assert_eq!(token_kinds(&[]), Vec::<String>::new());
    }

    #[test]
    fn values_are_filtered_by_kind_and_deduped() {
        assert_eq!(
            values_for_kind(&sample(), Some("KEYWORD")),
            vec!["int", "return"]
        );
        assert_eq!(values_for_kind(&sample(), Some("IDENT")), vec!["x", "y"]);
    }

    #[test]
    fn values_for_absent_kind_are_empty() {
        assert_eq!(values_for_kind(&sample(), None), Vec::<String>::new());
    }

    #[test]
    fn values_for_unknown_kind_are_empty() {
        assert_eq!(
            values_for_kind(&sample(), Some("NUMBER")),
            Vec::<String>::new()
        );
    }

    #[test]
    fn decodes_wire_field_token() {
        let token: Token =
            serde_json::from_str(r#"{"token":"KEYWORD","value":"int","start":0,"end":3}"#)
                .expect("token field decodes");
        assert_eq!(token, Token::new("KEYWORD", "int", 0, 3));
    }

    #[test]
    fn decodes_wire_field_type_alias() {
        let token: Token =
            serde_json::from_str(r#"{"type":"IDENT","value":"x","start":4,"end":5}"#)
                .expect("type alias decodes");
        assert_eq!(token, Token::new("IDENT", "x", 4, 5));
    }
}
