//! Terminal explorer for compiler token streams.
//! Usage:
//!   tokv [--host HOST] [--port PORT] [--config FILE] [file]
//!
//! Connects to a compiler service, submits the editor's text with Ctrl+R,
//! and renders the returned token stream over the original text. Logging is
//! opt-in via the TOKV_LOG env var (the TUI owns stdout, so traces go to
//! tokv.log).

mod app;
mod ui;
mod viewer;

use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::prelude::*;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use app::App;
use tokview::config::Loader;
use tokview::remote::CompilerClient;
use tokview::session::Session;

#[derive(Parser)]
#[command(name = "tokv")]
#[command(version, about = "A terminal UI for exploring compiler token streams")]
struct Args {
    /// File whose contents preload the editor
    file: Option<PathBuf>,
    /// Compiler service host (overrides configuration)
    #[arg(long)]
    host: Option<String>,
    /// Compiler service port (overrides configuration)
    #[arg(long)]
    port: Option<u16>,
    /// Configuration file layered over the built-in defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let _log_guard = init_logging();

    let mut loader = Loader::new();
    if let Some(path) = &args.config {
        loader = loader.with_file(path);
    }
    if let Some(host) = &args.host {
        loader = loader
            .set_override("server.host", host.clone())
            .map_err(invalid_config)?;
    }
    if let Some(port) = args.port {
        loader = loader
            .set_override("server.port", i64::from(port))
            .map_err(invalid_config)?;
    }
    let config = loader.build().map_err(invalid_config)?;

    let mut session = Session::new();
    if let Some(path) = &args.file {
        session.set_text(fs::read_to_string(path)?);
    }

    let client = CompilerClient::new(
        &config.server.host,
        config.server.port,
        config.server.timeout(),
    );
    let app = App::new(session, client)?;

    // Setup terminal
    enable_raw_mode()?;
    let stdout = io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let result = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    terminal.clear()?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> io::Result<()> {
    loop {
        app.poll_remote();
        terminal.draw(|frame| ui::render(frame, &app))?;

        // Poll for events with timeout so remote completions keep draining
        // while the user is idle.
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn invalid_config(err: config::ConfigError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err.to_string())
}

fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = std::env::var("TOKV_LOG").ok()?;
    let appender = tracing_appender::rolling::never(".", "tokv.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}
