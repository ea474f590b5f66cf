//! Panel trait and the three interactive panels.
//!
//! A panel renders itself from the session and interprets keyboard input,
//! emitting a [`PanelEvent`] when an interaction requires a state change.
//! The App applies events; panels never mutate the session themselves.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use tokview::segment::{build_segments, Segment};
use tokview::selection::Selection;
use tokview::session::Session;
use tokview::token::{token_kinds, values_for_kind};

/// Which panel currently has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Text editor has focus
    #[default]
    Editor,
    /// Kind/value choosers have focus
    Tokens,
    /// Segment preview has focus
    Preview,
}

impl Focus {
    /// Cycle to the next panel.
    pub fn next(&self) -> Focus {
        match self {
            Focus::Editor => Focus::Tokens,
            Focus::Tokens => Focus::Preview,
            Focus::Preview => Focus::Editor,
        }
    }
}

/// State changes requested by a panel in response to input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    /// Replace the session text with the editor's new content.
    EditTo(String),
    /// Choose a token kind in the chooser.
    ChooseKind(String),
    /// Choose a value for the chosen kind.
    ChooseValue(String),
    /// Activate a token segment, selecting its kind+value pair.
    Activate(Selection),
    /// Nothing to apply.
    NoChange,
}

/// Trait for UI panels.
pub trait Panel {
    /// Render this panel into the given (inner) area.
    fn render(&self, frame: &mut Frame, area: Rect, session: &Session);

    /// Handle a keyboard event and return the resulting event.
    fn handle_key(&mut self, key: KeyEvent, session: &Session) -> PanelEvent;
}

/// Multi-line text editor for the source code.
///
/// The editor owns its working copy of the text; every content change is
/// reported as an `EditTo` event carrying the full new text, and the App
/// runs the reset path from there.
#[derive(Debug)]
pub struct EditorPanel {
    lines: Vec<String>,
    /// Cursor row (0-indexed line)
    cursor_row: usize,
    /// Cursor column, counted in characters
    cursor_col: usize,
}

impl EditorPanel {
    pub fn new(content: &str) -> Self {
        EditorPanel {
            lines: split_lines(content),
            cursor_row: 0,
            cursor_col: 0,
        }
    }

    /// The editor content as one string.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    #[allow(dead_code)]
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    /// Byte offset of character column `col` in `line`.
    fn byte_col(line: &str, col: usize) -> usize {
        line.char_indices().nth(col).map(|(i, _)| i).unwrap_or(line.len())
    }

    fn current_line_len(&self) -> usize {
        self.lines[self.cursor_row].chars().count()
    }

    fn insert_char(&mut self, ch: char) {
        let at = Self::byte_col(&self.lines[self.cursor_row], self.cursor_col);
        self.lines[self.cursor_row].insert(at, ch);
        self.cursor_col += 1;
    }

    fn insert_newline(&mut self) {
        let at = Self::byte_col(&self.lines[self.cursor_row], self.cursor_col);
        let rest = self.lines[self.cursor_row].split_off(at);
        self.lines.insert(self.cursor_row + 1, rest);
        self.cursor_row += 1;
        self.cursor_col = 0;
    }

    /// Delete backwards. Returns whether anything changed (backspace at the
    /// very start of the text is a no-op).
    fn backspace(&mut self) -> bool {
        if self.cursor_col > 0 {
            let at = Self::byte_col(&self.lines[self.cursor_row], self.cursor_col - 1);
            self.lines[self.cursor_row].remove(at);
            self.cursor_col -= 1;
            true
        } else if self.cursor_row > 0 {
            let tail = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            self.cursor_col = self.lines[self.cursor_row].chars().count();
            self.lines[self.cursor_row].push_str(&tail);
            true
        } else {
            false
        }
    }

    fn move_up(&mut self) {
        if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.clamp_cursor_column();
        }
    }

    fn move_down(&mut self) {
        if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.clamp_cursor_column();
        }
    }

    fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        }
    }

    fn move_right(&mut self) {
        if self.cursor_col < self.current_line_len() {
            self.cursor_col += 1;
        }
    }

    /// Clamp cursor column to valid range for the current line.
    fn clamp_cursor_column(&mut self) {
        let len = self.current_line_len();
        if self.cursor_col > len {
            self.cursor_col = len;
        }
    }
}

impl Panel for EditorPanel {
    fn render(&self, frame: &mut Frame, area: Rect, _session: &Session) {
        let lines: Vec<Line> = self
            .lines
            .iter()
            .enumerate()
            .map(|(row, line_text)| {
                if row == self.cursor_row {
                    cursor_line(line_text, self.cursor_col)
                } else {
                    Line::from(line_text.to_string())
                }
            })
            .collect();

        let paragraph = Paragraph::new(lines);
        frame.render_widget(paragraph, area);
    }

    fn handle_key(&mut self, key: KeyEvent, _session: &Session) -> PanelEvent {
        match key.code {
            KeyCode::Char(ch)
                if key
                    .modifiers
                    .intersection(KeyModifiers::CONTROL | KeyModifiers::ALT)
                    .is_empty() =>
            {
                self.insert_char(ch);
                PanelEvent::EditTo(self.text())
            }
            KeyCode::Enter => {
                self.insert_newline();
                PanelEvent::EditTo(self.text())
            }
            KeyCode::Backspace => {
                if self.backspace() {
                    PanelEvent::EditTo(self.text())
                } else {
                    PanelEvent::NoChange
                }
            }
            KeyCode::Up => {
                self.move_up();
                PanelEvent::NoChange
            }
            KeyCode::Down => {
                self.move_down();
                PanelEvent::NoChange
            }
            KeyCode::Left => {
                self.move_left();
                PanelEvent::NoChange
            }
            KeyCode::Right => {
                self.move_right();
                PanelEvent::NoChange
            }
            _ => PanelEvent::NoChange,
        }
    }
}

/// Which of the two chooser lists is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ChooserList {
    #[default]
    Kinds,
    Values,
}

/// The kind and value choosers, stacked in one panel.
///
/// Enter on a kind chooses it and moves into the value list (which only
/// exists once a kind is chosen); Enter on a value chooses the value.
#[derive(Debug, Default)]
pub struct TokensPanel {
    kind_cursor: usize,
    value_cursor: usize,
    active: ChooserList,
}

impl TokensPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget cursors and return to the kind list. Runs whenever the token
    /// list is replaced or cleared.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Panel for TokensPanel {
    fn render(&self, frame: &mut Frame, area: Rect, session: &Session) {
        let kinds = token_kinds(session.tokens());
        let values = values_for_kind(session.tokens(), session.selection().kind());

        let mut lines: Vec<Line> = Vec::new();
        if kinds.is_empty() {
            lines.push(Line::from(Span::styled(
                "no tokens loaded",
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Kind",
                Style::default().fg(Color::Yellow),
            )));
            let kind_cursor = self.kind_cursor.min(kinds.len().saturating_sub(1));
            for (i, kind) in kinds.iter().enumerate() {
                let chosen = session.selection().kind() == Some(kind.as_str());
                lines.push(chooser_line(
                    kind,
                    chosen,
                    self.active == ChooserList::Kinds && i == kind_cursor,
                ));
            }

            if session.selection().kind().is_some() {
                lines.push(Line::from(Span::styled(
                    "Value",
                    Style::default().fg(Color::Yellow),
                )));
                let value_cursor = self.value_cursor.min(values.len().saturating_sub(1));
                for (i, value) in values.iter().enumerate() {
                    let chosen = session.selection().value() == Some(value.as_str());
                    lines.push(chooser_line(
                        value,
                        chosen,
                        self.active == ChooserList::Values && i == value_cursor,
                    ));
                }
            }
        }

        let paragraph = Paragraph::new(lines);
        frame.render_widget(paragraph, area);
    }

    fn handle_key(&mut self, key: KeyEvent, session: &Session) -> PanelEvent {
        let kinds = token_kinds(session.tokens());
        let values = values_for_kind(session.tokens(), session.selection().kind());

        match (self.active, key.code) {
            (ChooserList::Kinds, KeyCode::Up) => {
                self.kind_cursor = self.kind_cursor.saturating_sub(1);
                PanelEvent::NoChange
            }
            (ChooserList::Kinds, KeyCode::Down) => {
                if self.kind_cursor + 1 < kinds.len() {
                    self.kind_cursor += 1;
                }
                PanelEvent::NoChange
            }
            (ChooserList::Kinds, KeyCode::Enter) => match kinds.get(self.kind_cursor) {
                Some(kind) => {
                    self.active = ChooserList::Values;
                    self.value_cursor = 0;
                    PanelEvent::ChooseKind(kind.clone())
                }
                None => PanelEvent::NoChange,
            },
            (ChooserList::Kinds, KeyCode::Right) if session.selection().kind().is_some() => {
                self.active = ChooserList::Values;
                PanelEvent::NoChange
            }
            (ChooserList::Values, KeyCode::Up) => {
                self.value_cursor = self.value_cursor.saturating_sub(1);
                PanelEvent::NoChange
            }
            (ChooserList::Values, KeyCode::Down) => {
                if self.value_cursor + 1 < values.len() {
                    self.value_cursor += 1;
                }
                PanelEvent::NoChange
            }
            (ChooserList::Values, KeyCode::Enter) => match values.get(self.value_cursor) {
                Some(value) => PanelEvent::ChooseValue(value.clone()),
                None => PanelEvent::NoChange,
            },
            (ChooserList::Values, KeyCode::Left | KeyCode::Esc) => {
                self.active = ChooserList::Kinds;
                PanelEvent::NoChange
            }
            _ => PanelEvent::NoChange,
        }
    }
}

/// The rendered text with token spans styled, plus a cursor over the token
/// segments so any occurrence can be activated from the keyboard.
#[derive(Debug, Default)]
pub struct PreviewPanel {
    /// Index among the *token* segments (plain segments are skipped over).
    cursor: usize,
}

impl PreviewPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the first token segment. Runs whenever the segment list is
    /// rebuilt from scratch.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    #[allow(dead_code)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn token_count(segments: &[Segment]) -> usize {
        segments.iter().filter(|s| s.is_token()).count()
    }
}

impl Panel for PreviewPanel {
    fn render(&self, frame: &mut Frame, area: Rect, session: &Session) {
        let segments = build_segments(session.text(), session.tokens(), session.selection());
        let cursor = self
            .cursor
            .min(Self::token_count(&segments).saturating_sub(1));
        let lines = segment_lines(&segments, session.has_tokens().then_some(cursor));
        let paragraph = Paragraph::new(lines);
        frame.render_widget(paragraph, area);
    }

    fn handle_key(&mut self, key: KeyEvent, session: &Session) -> PanelEvent {
        let segments = build_segments(session.text(), session.tokens(), session.selection());
        let token_count = Self::token_count(&segments);
        if token_count == 0 {
            return PanelEvent::NoChange;
        }
        self.cursor = self.cursor.min(token_count - 1);

        match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                self.cursor = self.cursor.saturating_sub(1);
                PanelEvent::NoChange
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.cursor + 1 < token_count {
                    self.cursor += 1;
                }
                PanelEvent::NoChange
            }
            KeyCode::Enter => segments
                .iter()
                .filter(|s| s.is_token())
                .nth(self.cursor)
                .and_then(Segment::activate)
                .map_or(PanelEvent::NoChange, PanelEvent::Activate),
            _ => PanelEvent::NoChange,
        }
    }
}

/// Split editor content into lines, keeping one empty line for empty text.
fn split_lines(content: &str) -> Vec<String> {
    if content.is_empty() {
        vec![String::new()]
    } else {
        content.split('\n').map(str::to_string).collect()
    }
}

/// Render one chooser entry with chosen/cursor styling.
fn chooser_line(label: &str, chosen: bool, under_cursor: bool) -> Line<'static> {
    let marker = if chosen { "● " } else { "  " };
    let mut style = Style::default();
    if chosen {
        style = style.fg(Color::Cyan);
    }
    if under_cursor {
        style = style.bg(Color::Blue).fg(Color::White);
    }
    Line::from(Span::styled(format!("{marker}{label}"), style))
}

/// Turn the segment list into styled lines, splitting on embedded newlines.
///
/// `cursor` is the index among token segments that carries the preview
/// cursor, or None when the preview is showing the unannotated fallback.
pub fn segment_lines(segments: &[Segment], cursor: Option<usize>) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = Vec::new();
    let mut spans: Vec<Span> = Vec::new();
    let mut token_index = 0;

    for segment in segments {
        let style = match segment {
            Segment::Plain { .. } => Style::default(),
            Segment::Token { highlighted, .. } => {
                let mut style = if *highlighted {
                    Style::default().bg(Color::Yellow).fg(Color::Black)
                } else {
                    Style::default().fg(Color::Cyan)
                };
                if cursor == Some(token_index) {
                    style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
                }
                token_index += 1;
                style
            }
        };

        for (i, part) in segment.text().split('\n').enumerate() {
            if i > 0 {
                lines.push(Line::from(std::mem::take(&mut spans)));
            }
            if !part.is_empty() {
                spans.push(Span::styled(part.to_string(), style));
            }
        }
    }
    lines.push(Line::from(spans));
    lines
}

/// Render the cursor row of the editor with the cursor cell inverted.
fn cursor_line(line_text: &str, cursor_col: usize) -> Line<'static> {
    let cursor_style = Style::default()
        .bg(Color::Yellow)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD);

    let mut spans = Vec::new();
    let chars: Vec<char> = line_text.chars().collect();
    for (col, ch) in chars.iter().enumerate() {
        if col == cursor_col {
            spans.push(Span::styled(ch.to_string(), cursor_style));
        } else {
            spans.push(Span::raw(ch.to_string()));
        }
    }
    // Cursor sitting past the end of the line
    if cursor_col >= chars.len() {
        spans.push(Span::styled(" ", cursor_style));
    }
    Line::from(spans)
}
