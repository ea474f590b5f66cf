//! Client for the remote compiler service.
//!
//! The service is an opaque collaborator: it accepts source text, compiles
//! it, holds the resulting token snapshot, and discards that snapshot when
//! told to. The protocol is one JSON request per line over TCP, one JSON
//! response line back; see [`protocol`] for the wire shapes and [`client`]
//! for the async client.

pub mod client;
pub mod protocol;

pub use client::CompilerClient;

use std::fmt;

/// Failures while talking to the compiler service.
///
/// None of these are fatal to the application: every one degrades to an
/// empty token list and an error line in the output pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Could not reach the service, or the connection broke mid-exchange.
    Io(String),
    /// The service answered, but not with parseable protocol JSON.
    Protocol(String),
    /// The service reported a compile failure.
    Service(String),
    /// The exchange did not finish within the configured timeout.
    Timeout(u64),
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::Io(msg) => write!(f, "{}", msg),
            RemoteError::Protocol(msg) => {
                write!(f, "invalid response from compiler service: {}", msg)
            }
            RemoteError::Service(msg) => write!(f, "{}", msg),
            RemoteError::Timeout(secs) => {
                write!(f, "compiler service timed out after {}s", secs)
            }
        }
    }
}

impl std::error::Error for RemoteError {}
