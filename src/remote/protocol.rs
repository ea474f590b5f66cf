//! Wire shapes for the compiler-service protocol.
//!
//! One request object per line, one response object per line. Three
//! operations:
//!
//! - `compile`: submit source text, get the program output back (or an
//!   `error` envelope).
//! - `tokens`: fetch the token list for the last compiled text.
//! - `reset-tokens`: tell the service to drop its token snapshot. Advisory;
//!   the reply is ignored.
//!
//! Every request carries a client-generated `id` for correlation. Token
//! records are validated here, at the boundary, by deserializing into the
//! typed [`Token`] shape; span sanity is the segment builder's concern.

use serde::{Deserialize, Serialize};

use crate::token::Token;

/// A request line sent to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Request {
    Compile { id: String, code: String },
    Tokens { id: String },
    ResetTokens { id: String },
}

impl Request {
    pub fn id(&self) -> &str {
        match self {
            Request::Compile { id, .. } | Request::Tokens { id } | Request::ResetTokens { id } => {
                id
            }
        }
    }
}

/// A response line from the service.
///
/// Fields are populated per operation; `error` may accompany any of them
/// and wins when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    /// Echo of the request id.
    pub id: Option<String>,
    /// Program output from a compile.
    pub output: Option<String>,
    /// Token list from a tokens fetch.
    pub tokens: Option<Vec<Token>>,
    /// Service-reported failure.
    pub error: Option<String>,
}

impl Response {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
