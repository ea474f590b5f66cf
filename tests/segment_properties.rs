//! Property-based tests for the segment builder
//!
//! The builder must uphold its invariants for *any* token list, including
//! the malformed ones a misbehaving service could send: overlapping spans,
//! inverted spans, offsets past the end of the text, offsets inside
//! multi-byte characters. Reconstruction of the original text is the
//! non-negotiable property.

use proptest::prelude::*;

use tokview::segment::{build_segments, Segment};
use tokview::selection::Selection;
use tokview::token::Token;

const KINDS: [&str; 3] = ["KEYWORD", "IDENT", "NUMBER"];
const VALUES: [&str; 4] = ["int", "x", "1", "return"];

fn reassemble(segments: &[Segment]) -> String {
    segments.iter().map(Segment::text).collect()
}

/// Arbitrary token lists, deliberately unconstrained: spans may overlap,
/// invert, or run past the end of any text they are applied to.
fn wild_tokens() -> impl Strategy<Value = Vec<Token>> {
    prop::collection::vec(
        (0usize..3, 0usize..4, 0usize..64, 0usize..64),
        0..12,
    )
    .prop_map(|raw| {
        raw.into_iter()
            .map(|(k, v, start, end)| Token::new(KINDS[k], VALUES[v], start, end))
            .collect()
    })
}

/// Selections of all three shapes: empty, value-only, kind+value.
fn selections() -> impl Strategy<Value = Selection> {
    prop_oneof![
        Just(Selection::empty()),
        (0usize..4).prop_map(|v| {
            let mut s = Selection::empty();
            s.choose_value(VALUES[v]);
            s
        }),
        (0usize..3, 0usize..4).prop_map(|(k, v)| Selection::of(KINDS[k], VALUES[v])),
    ]
}

proptest! {
    #[test]
    fn reconstruction_holds_for_any_token_list(
        text in ".{0,40}",
        tokens in wild_tokens(),
        selection in selections(),
    ) {
        let segments = build_segments(&text, &tokens, &selection);
        prop_assert_eq!(reassemble(&segments), text);
    }

    #[test]
    fn no_segment_is_empty(
        text in ".{0,40}",
        tokens in wild_tokens(),
        selection in selections(),
    ) {
        for segment in build_segments(&text, &tokens, &selection) {
            prop_assert!(!segment.text().is_empty());
        }
    }

    #[test]
    fn rebuilding_is_idempotent(
        text in ".{0,40}",
        tokens in wild_tokens(),
        selection in selections(),
    ) {
        let first = build_segments(&text, &tokens, &selection);
        let second = build_segments(&text, &tokens, &selection);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn highlight_flags_follow_the_selection(
        text in ".{0,40}",
        tokens in wild_tokens(),
        selection in selections(),
    ) {
        for segment in build_segments(&text, &tokens, &selection) {
            if let Segment::Token { kind, value, highlighted, .. } = segment {
                let expected = selection.value() == Some(value.as_str())
                    && selection.kind().map_or(true, |k| k == kind);
                prop_assert_eq!(highlighted, expected);
            }
        }
    }

    #[test]
    fn empty_token_list_falls_back_to_plain_text(
        text in ".{0,40}",
        selection in selections(),
    ) {
        let segments = build_segments(&text, &[], &selection);
        if text.is_empty() {
            prop_assert!(segments.is_empty());
        } else {
            prop_assert_eq!(segments.len(), 1);
            prop_assert_eq!(segments[0].text(), &text);
            prop_assert!(!segments[0].is_token());
        }
    }

    /// Well-formed lists (sorted, non-overlapping, on char boundaries) are
    /// passed through untouched: every token shows up as a segment with its
    /// exact span text.
    #[test]
    fn well_formed_tokens_are_emitted_verbatim(
        text in ".{1,40}",
        cuts in prop::collection::btree_set(0usize..64, 2..10),
    ) {
        // Snap the random cut points onto the text's char boundaries and
        // pair them up into disjoint, ordered spans.
        let mut offsets: Vec<usize> = cuts
            .into_iter()
            .map(|c| {
                let mut c = c.min(text.len());
                while !text.is_char_boundary(c) {
                    c -= 1;
                }
                c
            })
            .collect();
        offsets.sort_unstable();
        offsets.dedup();

        let tokens: Vec<Token> = offsets
            .chunks(2)
            .filter(|pair| pair.len() == 2 && pair[0] < pair[1])
            .map(|pair| Token::new("KEYWORD", "int", pair[0], pair[1]))
            .collect();

        let segments = build_segments(&text, &tokens, &Selection::empty());
        prop_assert_eq!(reassemble(&segments), text.clone());

        let token_segments: Vec<&Segment> =
            segments.iter().filter(|s| s.is_token()).collect();
        prop_assert_eq!(token_segments.len(), tokens.len());
        for (segment, token) in token_segments.iter().zip(&tokens) {
            prop_assert_eq!(segment.text(), &text[token.start..token.end]);
        }
    }
}
