//! The user's current highlight choice.
//!
//! A selection is at most one token kind and one value. Highlighting only
//! ever happens once a value is chosen; a kind alone narrows the value
//! chooser but lights nothing up. The selection is owned by the interaction
//! layer and passed by reference into the segment builder, which holds no
//! state of its own.

use crate::token::Token;

/// The currently chosen token kind and value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    kind: Option<String>,
    value: Option<String>,
}

impl Selection {
    /// No selection at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A full kind+value pair, as produced by activating a segment.
    pub fn of(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Selection {
            kind: Some(kind.into()),
            value: Some(value.into()),
        }
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.value.is_none()
    }

    /// Choose a kind. The previously chosen value belonged to the old kind
    /// and is dropped; kind and value are never carried across a kind change.
    pub fn choose_kind(&mut self, kind: impl Into<String>) {
        self.kind = Some(kind.into());
        self.value = None;
    }

    /// Choose a value, keeping the current kind.
    pub fn choose_value(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
    }

    /// Drop both sides. Runs on every text edit and token clear.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether `token` matches the current choice.
    ///
    /// True when a value is chosen, the token's value equals it, and the
    /// chosen kind (if any) equals the token's kind. With a kind chosen but
    /// no value yet, nothing matches.
    pub fn matches(&self, token: &Token) -> bool {
        match &self.value {
            Some(value) => {
                token.value == *value && self.kind.as_deref().map_or(true, |k| token.kind == k)
            }
            None => false,
        }
    }
}
