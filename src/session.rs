//! Owned application state: the submitted text, the tokens fetched for it,
//! and the user's selection.
//!
//! [`Session`] is pure data in the manner of a viewer model: no rendering,
//! no I/O. The reset path (every text edit invalidates everything derived
//! from the old text) and the staleness rule (a compile completion for an
//! old revision is dropped) live here so they can be tested directly.

use crate::remote::RemoteError;
use crate::selection::Selection;
use crate::token::Token;

/// Holder for the most recent token list.
///
/// Two states: empty (no list; `tokens()` is an empty slice, never an
/// error) and loaded. Storing an empty list keeps the store empty; any text
/// change clears it.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    tokens: Vec<Token>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored list wholesale. No span validation happens here;
    /// the segment builder copes with whatever the service sent.
    pub fn set_tokens(&mut self, tokens: Vec<Token>) {
        self.tokens = tokens;
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn is_loaded(&self) -> bool {
        !self.tokens.is_empty()
    }
}

/// What a successful compile round-trip produced: the program output and
/// the token list fetched right after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutcome {
    pub output: String,
    pub tokens: Vec<Token>,
}

/// The full per-text state: text, revision, tokens, selection, output.
#[derive(Debug, Clone, Default)]
pub struct Session {
    text: String,
    /// Bumped on every text change. Compile requests snapshot it; a
    /// completion whose snapshot no longer matches is stale.
    revision: u64,
    store: TokenStore,
    selection: Selection,
    output: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn tokens(&self) -> &[Token] {
        self.store.tokens()
    }

    pub fn has_tokens(&self) -> bool {
        self.store.is_loaded()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The interaction layer owns selection transitions; everything else
    /// reads the selection through [`Session::selection`].
    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    /// Replace the text. Everything derived from the old text dies here:
    /// tokens, selection, compile output. Bumps the revision so in-flight
    /// completions for the old text are recognizably stale.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.revision += 1;
        self.store.clear();
        self.selection.clear();
        self.output.clear();
    }

    /// Record the outcome of a compile round-trip requested at `revision`.
    ///
    /// A stale outcome (the text changed since the request) is discarded
    /// without touching any state. A failure shows the synthesized error
    /// line and forces the token list empty. Returns whether the outcome
    /// was applied.
    pub fn apply_compile(
        &mut self,
        revision: u64,
        result: Result<CompileOutcome, RemoteError>,
    ) -> bool {
        if revision != self.revision {
            return false;
        }
        match result {
            Ok(outcome) => {
                self.output = outcome.output;
                self.store.set_tokens(outcome.tokens);
            }
            Err(err) => {
                self.output = format!("Error: {err}");
                self.store.clear();
                self.selection.clear();
            }
        }
        true
    }
}
