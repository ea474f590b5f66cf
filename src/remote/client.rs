//! Async TCP client for the compiler service.
//!
//! Each operation opens a fresh connection, writes one JSON request line,
//! and reads one JSON response line back. The whole exchange is bounded by
//! a timeout so an unresponsive service degrades into an error line instead
//! of a hung UI.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, instrument};

use super::protocol::{Request, Response};
use super::RemoteError;
use crate::token::Token;

/// Client for one compiler-service endpoint.
#[derive(Debug, Clone)]
pub struct CompilerClient {
    addr: String,
    timeout: Duration,
}

impl CompilerClient {
    pub fn new(host: &str, port: u16, timeout: Duration) -> Self {
        CompilerClient {
            addr: format!("{host}:{port}"),
            timeout,
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Submit `code` for compilation; returns the program output.
    pub async fn compile(&self, code: &str) -> Result<String, RemoteError> {
        let response = self
            .exchange(&Request::Compile {
                id: next_msg_id(),
                code: code.to_string(),
            })
            .await?;
        if let Some(error) = response.error {
            return Err(RemoteError::Service(error));
        }
        Ok(response.output.unwrap_or_default())
    }

    /// Fetch the token list for the last compiled text.
    pub async fn fetch_tokens(&self) -> Result<Vec<Token>, RemoteError> {
        let response = self.exchange(&Request::Tokens { id: next_msg_id() }).await?;
        if let Some(error) = response.error {
            return Err(RemoteError::Service(error));
        }
        Ok(response.tokens.unwrap_or_default())
    }

    /// Compile then immediately fetch tokens, the pairing every successful
    /// compile performs. Either failure surfaces as the round-trip failure.
    pub async fn compile_and_fetch(&self, code: &str) -> Result<(String, Vec<Token>), RemoteError> {
        let output = self.compile(code).await?;
        let tokens = self.fetch_tokens().await?;
        Ok((output, tokens))
    }

    /// Tell the service to drop its token snapshot.
    ///
    /// Advisory cleanup: local state was already cleared by the caller, so
    /// failures are logged and swallowed.
    pub async fn reset_tokens(&self) {
        if let Err(err) = self.exchange(&Request::ResetTokens { id: next_msg_id() }).await {
            debug!(%err, "reset-tokens request failed");
        }
    }

    /// One request line out, one response line back, bounded by the timeout.
    #[instrument(skip(self, request), fields(addr = %self.addr, id = request.id()))]
    async fn exchange(&self, request: &Request) -> Result<Response, RemoteError> {
        let io_future = async {
            let stream = TcpStream::connect(&self.addr).await.map_err(|e| {
                RemoteError::Io(format!("failed to connect to {}: {e}", self.addr))
            })?;
            let (read_half, mut write_half) = stream.into_split();

            let mut line = serde_json::to_string(request)
                .map_err(|e| RemoteError::Protocol(format!("failed to encode request: {e}")))?;
            line.push('\n');
            write_half
                .write_all(line.as_bytes())
                .await
                .map_err(|e| RemoteError::Io(format!("failed to send request: {e}")))?;
            write_half
                .flush()
                .await
                .map_err(|e| RemoteError::Io(format!("failed to flush request: {e}")))?;

            let mut reply = String::new();
            BufReader::new(read_half)
                .read_line(&mut reply)
                .await
                .map_err(|e| RemoteError::Io(format!("failed to read response: {e}")))?;
            if reply.is_empty() {
                return Err(RemoteError::Io(
                    "connection closed by compiler service".to_string(),
                ));
            }

            serde_json::from_str(&reply).map_err(|e| RemoteError::Protocol(e.to_string()))
        };

        tokio::time::timeout(self.timeout, io_future)
            .await
            .map_err(|_| RemoteError::Timeout(self.timeout.as_secs()))?
    }
}

/// Generate a unique request ID.
fn next_msg_id() -> String {
    static MSG_COUNTER: AtomicU64 = AtomicU64::new(1);
    let n = MSG_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("msg-{n:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_ids_are_unique() {
        let first = next_msg_id();
        let second = next_msg_id();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn connect_failure_is_an_io_error() {
        // Port 1 should never have a compiler service listening.
        let client = CompilerClient::new("127.0.0.1", 1, Duration::from_secs(1));
        let result = client.compile("int x=1;").await;
        assert!(matches!(result, Err(RemoteError::Io(_))));
    }
}
