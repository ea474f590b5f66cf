//! # tokview
//!
//! Explore the token stream a compiler service produces for a piece of source
//! text. The service compiles the text and hands back lexical tokens with
//! byte offsets; this library reconciles those spans with the original text
//! into a renderable segment list and tracks the user's kind/value selection
//! so every occurrence of the chosen pair can be highlighted.
//!
//! The segment builder in [`segment`] is the core: whatever the service
//! sends, concatenating the segment texts reproduces the submitted text
//! exactly. The `tokv` binary wraps this in a terminal UI.

pub mod config;
pub mod remote;
pub mod segment;
pub mod selection;
pub mod session;
pub mod token;
