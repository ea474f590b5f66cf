//! UI rendering logic
//!
//! Handles layout and rendering of the application using Ratatui.
//! Layout structure:
//! - Title bar (1 line, fixed)
//! - Editor (10 lines, bordered)
//! - Output (4 lines, bordered)
//! - Middle section (responsive height):
//!   - Tokens panel (30 chars, fixed width)
//!   - Preview (remaining space)
//! - Status line (1 line, fixed)

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use tokview::token::token_kinds;

use crate::app::App;
use crate::viewer::{Focus, Panel};

/// Minimum terminal width required for the UI
const MIN_TERMINAL_WIDTH: u16 = 50;
/// Width allocated to the tokens panel
const TOKENS_PANEL_WIDTH: u16 = 30;
/// Height of the editor section (including its border)
const EDITOR_HEIGHT: u16 = 10;
/// Height of the output section (including its border)
const OUTPUT_HEIGHT: u16 = 4;
/// Height of the status line
const STATUS_LINE_HEIGHT: u16 = 1;

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &App) {
    let size = frame.area();

    // Check minimum width
    if size.width < MIN_TERMINAL_WIDTH {
        render_error_too_narrow(frame, size);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                  // Title bar
            Constraint::Length(EDITOR_HEIGHT),      // Editor
            Constraint::Length(OUTPUT_HEIGHT),      // Compile output
            Constraint::Min(1),                     // Middle (tokens | preview)
            Constraint::Length(STATUS_LINE_HEIGHT), // Status line
        ])
        .split(size);

    render_title_bar(frame, chunks[0]);
    render_editor(frame, chunks[1], app);
    render_output(frame, chunks[2], app);
    render_middle_section(frame, chunks[3], app);
    render_status_line(frame, chunks[4], app);
}

fn render_error_too_narrow(frame: &mut Frame, area: Rect) {
    let msg = format!(
        "Terminal too narrow: {} < {} chars",
        area.width, MIN_TERMINAL_WIDTH
    );
    let paragraph =
        Paragraph::new(msg).style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));
    frame.render_widget(paragraph, area);
}

fn render_title_bar(frame: &mut Frame, area: Rect) {
    let title = format!("tokv {}", env!("CARGO_PKG_VERSION"));
    let paragraph = Paragraph::new(title).style(
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(paragraph, area);
}

fn focus_title(base: &str, focused: bool) -> String {
    if focused {
        format!("{base} [FOCUSED]")
    } else {
        base.to_string()
    }
}

fn render_editor(frame: &mut Frame, area: Rect, app: &App) {
    let title = focus_title("Code (Ctrl+R compiles)", app.focus == Focus::Editor);
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    app.editor.render(frame, inner, &app.session);
}

fn render_output(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title("Output");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let output = app.session.output();
    let style = if output.starts_with("Error:") {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    let paragraph = Paragraph::new(output.to_string()).style(style);
    frame.render_widget(paragraph, inner);
}

fn render_middle_section(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(TOKENS_PANEL_WIDTH), // Tokens panel
            Constraint::Min(1),                     // Preview
        ])
        .split(area);

    render_tokens_panel(frame, chunks[0], app);
    render_preview(frame, chunks[1], app);
}

fn render_tokens_panel(frame: &mut Frame, area: Rect, app: &App) {
    let title = focus_title("Tokens", app.focus == Focus::Tokens);
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    app.tokens_panel.render(frame, inner, &app.session);
}

fn render_preview(frame: &mut Frame, area: Rect, app: &App) {
    let title = focus_title("Preview", app.focus == Focus::Preview);
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    app.preview.render(frame, inner, &app.session);
}

fn render_status_line(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();

    spans.push(Span::styled(
        "Selection: ",
        Style::default().fg(Color::Yellow),
    ));
    let selection = app.session.selection();
    match (selection.kind(), selection.value()) {
        (None, None) => spans.push(Span::raw("none")),
        (Some(kind), None) => spans.push(Span::raw(kind.to_string())),
        (None, Some(value)) => spans.push(Span::raw(format!("value {value:?}"))),
        (Some(kind), Some(value)) => spans.push(Span::raw(format!("{kind} {value:?}"))),
    }

    spans.push(Span::raw(" | "));
    spans.push(Span::styled("Tokens: ", Style::default().fg(Color::Yellow)));
    spans.push(Span::raw(format!(
        "{} ({} kinds)",
        app.session.tokens().len(),
        token_kinds(app.session.tokens()).len()
    )));

    if app.is_compiling() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            "compiling…",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ));
    }

    spans.push(Span::raw(" | "));
    spans.push(Span::raw("Tab focus  Ctrl+R compile  q quit"));

    let paragraph = Paragraph::new(ratatui::text::Line::from(spans))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_panel_width_constant() {
        assert_eq!(TOKENS_PANEL_WIDTH, 30);
    }

    #[test]
    fn test_status_line_height_constant() {
        assert_eq!(STATUS_LINE_HEIGHT, 1);
    }

    #[test]
    fn test_min_terminal_width() {
        assert_eq!(MIN_TERMINAL_WIDTH, 50);
    }
}
