//! Main application state and event handling.
//!
//! The App brings together:
//! - Session (text, tokens, selection: the owned state)
//! - The three panels (editor, choosers, preview)
//! - Focus management and global key handling
//! - The remote bridge that runs compile round-trips off the event loop

use std::io;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::debug;

use tokview::remote::{CompilerClient, RemoteError};
use tokview::segment::{build_segments, Segment};
use tokview::session::{CompileOutcome, Session};

use crate::viewer::{EditorPanel, Focus, Panel, PanelEvent, PreviewPanel, TokensPanel};

/// A finished compile round-trip, tagged with the revision of the text it
/// was requested for so stale completions can be recognized and dropped.
#[derive(Debug)]
pub struct Completion {
    pub revision: u64,
    pub result: Result<CompileOutcome, RemoteError>,
}

/// Runs remote calls on a private runtime and reports completions back to
/// the event loop over a channel. The event loop drains the channel between
/// keystrokes; nothing here touches session state.
pub struct RemoteBridge {
    runtime: Runtime,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl RemoteBridge {
    fn new() -> io::Result<Self> {
        let runtime = Runtime::new()?;
        let (tx, rx) = mpsc::unbounded_channel();
        Ok(RemoteBridge { runtime, tx, rx })
    }

    /// Kick off compile-then-fetch for `code` as of `revision`.
    fn spawn_compile(&self, client: CompilerClient, code: String, revision: u64) {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = client
                .compile_and_fetch(&code)
                .await
                .map(|(output, tokens)| CompileOutcome { output, tokens });
            let _ = tx.send(Completion { revision, result });
        });
    }

    /// Advisory reset-tokens; nobody waits for it.
    fn spawn_reset(&self, client: CompilerClient) {
        self.runtime.spawn(async move {
            client.reset_tokens().await;
        });
    }

    fn try_recv(&mut self) -> Option<Completion> {
        self.rx.try_recv().ok()
    }
}

/// The main application.
pub struct App {
    /// The owned text/token/selection state
    pub session: Session,

    /// Text editor panel
    pub editor: EditorPanel,

    /// Kind/value chooser panel
    pub tokens_panel: TokensPanel,

    /// Segment preview panel
    pub preview: PreviewPanel,

    /// Which panel currently has focus
    pub focus: Focus,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Revision of the compile currently in flight, if any
    inflight: Option<u64>,

    client: CompilerClient,
    bridge: RemoteBridge,
}

impl App {
    pub fn new(session: Session, client: CompilerClient) -> io::Result<Self> {
        let editor = EditorPanel::new(session.text());
        Ok(App {
            session,
            editor,
            tokens_panel: TokensPanel::new(),
            preview: PreviewPanel::new(),
            focus: Focus::default(),
            should_quit: false,
            inflight: None,
            client,
            bridge: RemoteBridge::new()?,
        })
    }

    /// Whether a compile round-trip is outstanding.
    pub fn is_compiling(&self) -> bool {
        self.inflight.is_some()
    }

    /// Segments for the preview, derived fresh from the current state.
    #[allow(dead_code)]
    pub fn segments(&self) -> Vec<Segment> {
        build_segments(
            self.session.text(),
            self.session.tokens(),
            self.session.selection(),
        )
    }

    /// Handle a keyboard event.
    ///
    /// Returns whether the state changed (the loop redraws regardless; the
    /// flag exists for tests).
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            // 'q' quits everywhere except the editor, where it is just a letter
            KeyCode::Char('q') if key.modifiers.is_empty() && self.focus != Focus::Editor => {
                self.should_quit = true;
                return true;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return true;
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.trigger_compile();
                return true;
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return true;
            }
            _ => {}
        }

        // Delegate to the focused panel
        let event = match self.focus {
            Focus::Editor => self.editor.handle_key(key, &self.session),
            Focus::Tokens => self.tokens_panel.handle_key(key, &self.session),
            Focus::Preview => self.preview.handle_key(key, &self.session),
        };
        self.process_event(event)
    }

    /// Apply a panel event to the session.
    fn process_event(&mut self, event: PanelEvent) -> bool {
        match event {
            PanelEvent::EditTo(text) => {
                // The edit invalidates tokens, selection, and any compile
                // still in flight; the remote side is told to drop its
                // snapshot but local state never waits for that.
                self.session.set_text(text);
                self.inflight = None;
                self.tokens_panel.reset();
                self.preview.reset();
                self.bridge.spawn_reset(self.client.clone());
                true
            }
            PanelEvent::ChooseKind(kind) => {
                self.session.selection_mut().choose_kind(kind);
                true
            }
            PanelEvent::ChooseValue(value) => {
                self.session.selection_mut().choose_value(value);
                true
            }
            PanelEvent::Activate(selection) => {
                *self.session.selection_mut() = selection;
                true
            }
            PanelEvent::NoChange => false,
        }
    }

    /// Submit the current text for compilation.
    pub fn trigger_compile(&mut self) {
        let revision = self.session.revision();
        self.inflight = Some(revision);
        self.bridge
            .spawn_compile(self.client.clone(), self.session.text().to_string(), revision);
    }

    /// Drain finished compile round-trips from the bridge.
    ///
    /// Completions for a superseded revision are dropped; the session
    /// performs the same check, but dropping here keeps the in-flight
    /// marker accurate when several compiles overlap.
    pub fn poll_remote(&mut self) -> bool {
        let mut changed = false;
        while let Some(completion) = self.bridge.try_recv() {
            if self.inflight == Some(completion.revision) {
                self.inflight = None;
            }
            if self.session.apply_compile(completion.revision, completion.result) {
                self.tokens_panel.reset();
                self.preview.reset();
                changed = true;
            } else {
                debug!(
                    revision = completion.revision,
                    "discarding stale compile completion"
                );
            }
        }
        changed
    }

    /// Test seam: apply a completion as if the bridge had delivered it.
    #[cfg(test)]
    pub fn deliver_completion(&mut self, completion: Completion) -> bool {
        if self.inflight == Some(completion.revision) {
            self.inflight = None;
        }
        if self.session.apply_compile(completion.revision, completion.result) {
            self.tokens_panel.reset();
            self.preview.reset();
            true
        } else {
            false
        }
    }
}
