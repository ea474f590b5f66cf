//! Round-trip tests for the compiler-service client.
//!
//! Runs an in-process fake service speaking the same line protocol on an
//! ephemeral port, so the tests exercise real connect/write/read paths
//! without any external process.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use tokview::remote::protocol::Request;
use tokview::remote::{CompilerClient, RemoteError};
use tokview::token::Token;

/// Spawn a fake compiler service; each connection serves one request line.
/// Returns the port it listens on.
async fn spawn_fake_service() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fake service");
    let port = listener.local_addr().expect("local addr").port();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let (read_half, mut write_half) = stream.into_split();
                let mut line = String::new();
                if BufReader::new(read_half).read_line(&mut line).await.is_err() {
                    return;
                }
                let reply = match serde_json::from_str::<Request>(&line) {
                    Ok(Request::Compile { id, code }) => {
                        if code.contains('@') {
                            format!(r#"{{"id":"{id}","error":"unexpected '@'"}}"#)
                        } else {
                            format!(r#"{{"id":"{id}","output":"compiled {} bytes"}}"#, code.len())
                        }
                    }
                    // One record uses the `token` field, one the `type`
                    // alias, as seen from real services.
                    Ok(Request::Tokens { id }) => format!(
                        concat!(
                            r#"{{"id":"{}","tokens":["#,
                            r#"{{"token":"KEYWORD","value":"int","start":0,"end":3}},"#,
                            r#"{{"type":"IDENT","value":"x","start":4,"end":5}}]}}"#
                        ),
                        id
                    ),
                    Ok(Request::ResetTokens { id }) => format!(r#"{{"id":"{id}"}}"#),
                    Err(_) => r#"{"error":"bad request"}"#.to_string(),
                };
                let _ = write_half.write_all(reply.as_bytes()).await;
                let _ = write_half.write_all(b"\n").await;
            });
        }
    });

    port
}

fn client(port: u16) -> CompilerClient {
    CompilerClient::new("127.0.0.1", port, Duration::from_secs(5))
}

#[tokio::test]
async fn compile_and_fetch_round_trip() {
    let port = spawn_fake_service().await;
    let (output, tokens) = client(port)
        .compile_and_fetch("int x=1;")
        .await
        .expect("round trip succeeds");

    assert_eq!(output, "compiled 8 bytes");
    assert_eq!(
        tokens,
        vec![
            Token::new("KEYWORD", "int", 0, 3),
            Token::new("IDENT", "x", 4, 5),
        ]
    );
}

#[tokio::test]
async fn service_error_envelope_becomes_a_service_error() {
    let port = spawn_fake_service().await;
    let result = client(port).compile("int @=1;").await;

    let err = result.expect_err("compile should fail");
    assert_eq!(err, RemoteError::Service("unexpected '@'".to_string()));
    // The user-visible string the UI synthesizes from it:
    assert_eq!(format!("Error: {err}"), "Error: unexpected '@'");
}

#[tokio::test]
async fn reset_tokens_is_fire_and_forget() {
    let port = spawn_fake_service().await;
    // Nothing to assert beyond "does not hang or panic": failures are
    // swallowed by design.
    client(port).reset_tokens().await;
}

#[tokio::test]
async fn reset_tokens_against_a_dead_port_is_still_silent() {
    client(1).reset_tokens().await;
}

#[tokio::test]
async fn unresponsive_service_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    tokio::spawn(async move {
        // Accept and then sit on the connection without ever replying.
        let Ok((stream, _)) = listener.accept().await else {
            return;
        };
        tokio::time::sleep(Duration::from_secs(60)).await;
        drop(stream);
    });

    let client = CompilerClient::new("127.0.0.1", port, Duration::from_secs(1));
    let result = client.fetch_tokens().await;
    assert_eq!(result, Err(RemoteError::Timeout(1)));
}

#[tokio::test]
async fn closed_connection_is_an_io_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    tokio::spawn(async move {
        // Accept and hang up without answering.
        let Ok((stream, _)) = listener.accept().await else {
            return;
        };
        drop(stream);
    });

    let result = client(port).fetch_tokens().await;
    assert!(matches!(result, Err(RemoteError::Io(_))));
}
