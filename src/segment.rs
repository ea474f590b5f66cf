//! Reconciling token spans with the text they annotate.
//!
//! [`build_segments`] turns the submitted text plus the service's token list
//! into the ordered list of segments the preview renders. The one invariant
//! that must survive anything the service sends: concatenating the segment
//! texts in order reproduces the submitted text exactly. Spans that reach
//! back into already-consumed text are clamped to the unconsumed remainder,
//! spans left empty by clamping are skipped, offsets past the end of the
//! text are capped, and offsets inside a multi-byte character are snapped
//! back to the nearest boundary. A bad span degrades a highlight, never the
//! rendering.

use crate::selection::Selection;
use crate::token::Token;

/// One contiguous piece of the rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A gap no token covers.
    Plain { text: String },
    /// The span of one token, ready to be styled and activated.
    Token {
        text: String,
        kind: String,
        value: String,
        highlighted: bool,
        /// Position of the source token in the token list. Stable identity
        /// for activation, independent of how the segment was rendered.
        index: usize,
    },
}

impl Segment {
    pub fn text(&self) -> &str {
        match self {
            Segment::Plain { text } => text,
            Segment::Token { text, .. } => text,
        }
    }

    /// Whether this segment reacts to activation.
    pub fn is_token(&self) -> bool {
        matches!(self, Segment::Token { .. })
    }

    pub fn is_highlighted(&self) -> bool {
        matches!(
            self,
            Segment::Token {
                highlighted: true,
                ..
            }
        )
    }

    /// The selection produced by activating this segment: its exact
    /// kind+value pair, overriding whatever was selected before. Plain
    /// segments are not activatable.
    pub fn activate(&self) -> Option<Selection> {
        match self {
            Segment::Token { kind, value, .. } => Some(Selection::of(kind.clone(), value.clone())),
            Segment::Plain { .. } => None,
        }
    }
}

/// Cap `offset` at the text length and snap it to the nearest character
/// boundary at or before it. Slicing at a non-boundary offset would panic.
fn snap(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Build the ordered segment list for `text` under `selection`.
///
/// Pure and deterministic: identical inputs yield an identical list. The
/// list is rebuilt wholesale on every change, never patched.
pub fn build_segments(text: &str, tokens: &[Token], selection: &Selection) -> Vec<Segment> {
    if tokens.is_empty() {
        // Unannotated fallback: the whole text as one plain segment.
        if text.is_empty() {
            return Vec::new();
        }
        return vec![Segment::Plain {
            text: text.to_string(),
        }];
    }

    let mut segments = Vec::new();
    let mut last = 0;
    for (index, token) in tokens.iter().enumerate() {
        let end = snap(text, token.end);
        // Clamp spans that reach back into already-consumed text.
        let start = snap(text, token.start).max(last);
        if start >= end {
            // Degenerate after clamping (fully overlapped, inverted, or out
            // of bounds).
            continue;
        }
        if start > last {
            segments.push(Segment::Plain {
                text: text[last..start].to_string(),
            });
        }
        segments.push(Segment::Token {
            text: text[start..end].to_string(),
            kind: token.kind.clone(),
            value: token.value.clone(),
            highlighted: selection.matches(token),
            index,
        });
        last = end;
    }
    if last < text.len() {
        segments.push(Segment::Plain {
            text: text[last..].to_string(),
        });
    }
    segments
}
