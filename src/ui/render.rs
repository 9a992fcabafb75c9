use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::Model;
use crate::format::{EditSurface, Selection};

use super::status;
use super::style::{style_for_inline, style_for_line_type};
use super::toolbar;

/// Split the frame into toolbar, main panes, and status rows.
pub fn layout_rows(area: Rect) -> (Rect, Rect, Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    (rows[0], rows[1], rows[2])
}

/// Split the main area into editor, divider, and preview panes. With the
/// preview hidden the editor takes the full width.
pub fn split_panes(
    area: Rect,
    split_percent: u16,
    preview_visible: bool,
) -> (Rect, Option<Rect>, Option<Rect>) {
    if !preview_visible {
        return (area, None, None);
    }
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(split_percent.clamp(10, 90)),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);
    (columns[0], Some(columns[1]), Some(columns[2]))
}

/// Width needed for the line number gutter.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}

/// Render the whole frame from the model.
pub fn render(model: &Model, frame: &mut Frame) {
    let (toolbar_area, main_area, status_area) = layout_rows(frame.area());

    frame.render_widget(Paragraph::new(toolbar::toolbar_line()), toolbar_area);

    let (editor_area, divider_area, preview_area) =
        split_panes(main_area, model.split_percent, model.preview_visible);
    render_editor(model, frame, editor_area);
    if let Some(divider_area) = divider_area {
        render_divider(frame, divider_area);
    }
    if let Some(preview_area) = preview_area {
        render_preview(model, frame, preview_area);
    }

    status::render_status_bar(model, frame, status_area);

    if model.help_visible {
        render_help_overlay(model, frame);
    }
}

fn render_editor(model: &Model, frame: &mut Frame, area: Rect) {
    let gutter_width = line_number_width(model.editor.line_count());
    let content_width = area.width.saturating_sub(gutter_width + 1) as usize;
    let gutter_style = Style::default().fg(Color::DarkGray);
    let selection = model.editor.selection();
    let (cursor_line, cursor_col) = model.editor.head_line_col();

    let mut lines = Vec::with_capacity(area.height as usize);
    for row in 0..area.height as usize {
        let line_idx = model.editor_scroll + row;
        if line_idx >= model.editor.line_count() {
            break;
        }
        let mut spans = vec![Span::styled(
            format!("{:>width$} ", line_idx + 1, width = gutter_width as usize),
            gutter_style,
        )];
        let cursor = (line_idx == cursor_line).then_some(cursor_col);
        spans.extend(content_spans(
            &model.editor.line_at(line_idx),
            model.editor.offset_at(line_idx, 0),
            selection,
            cursor,
            content_width,
        ));
        lines.push(Line::from(spans));
    }

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines), area);
}

/// Style the characters of one buffer line: a block cursor cell, reversed
/// video for the selected range, plain text elsewhere. Consecutive equal
/// styles are merged into one span.
pub(super) fn content_spans(
    text: &str,
    line_start: usize,
    selection: Selection,
    cursor: Option<usize>,
    max_width: usize,
) -> Vec<Span<'static>> {
    let selection_style = Style::default().add_modifier(Modifier::REVERSED);
    let cursor_style = Style::default().bg(Color::White).fg(Color::Black);

    let chars: Vec<char> = text.chars().take(max_width).collect();
    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_style = Style::default();
    for (i, ch) in chars.iter().enumerate() {
        let offset = line_start + i;
        let style = if cursor == Some(i) {
            cursor_style
        } else if !selection.is_caret() && offset >= selection.start && offset < selection.end {
            selection_style
        } else {
            Style::default()
        };
        if style != run_style && !run.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
        }
        run_style = style;
        run.push(*ch);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }
    // Cursor sitting at the end of the line gets a block on the padding.
    if cursor.is_some_and(|col| col >= chars.len()) && chars.len() < max_width {
        spans.push(Span::styled(" ".to_string(), cursor_style));
    }
    spans
}

fn render_divider(frame: &mut Frame, area: Rect) {
    let lines: Vec<Line> = (0..area.height).map(|_| Line::from("│")).collect();
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn render_preview(model: &Model, frame: &mut Frame, area: Rect) {
    let offset = model.preview_scroll(area.height as usize);
    let mut lines = Vec::with_capacity(area.height as usize);
    for rendered in model.preview.visible_lines(offset, area.height as usize) {
        let base = style_for_line_type(rendered.line_type());
        let line = rendered.spans().map_or_else(
            || Line::styled(rendered.content().to_string(), base),
            |spans| {
                Line::from(
                    spans
                        .iter()
                        .map(|span| {
                            Span::styled(
                                span.text().to_string(),
                                style_for_inline(span.style(), base),
                            )
                        })
                        .collect::<Vec<_>>(),
                )
            },
        );
        lines.push(line);
    }

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_help_overlay(model: &Model, frame: &mut Frame) {
    let mut lines = vec![
        Line::from("Ctrl+B bold          Ctrl+I italic        Ctrl+K link"),
        Line::from("Alt+1..6 heading     Alt+S strikethrough  Alt+G image"),
        Line::from("Alt+U bullet list    Alt+O numbered list  Alt+Q quote"),
        Line::from("Alt+C inline code    Alt+F code fence"),
        Line::from(""),
        Line::from("Ctrl+Y copy          Ctrl+P preview       Ctrl+A select all"),
        Line::from("Alt+←/→ resize split                      Ctrl+Q quit"),
    ];
    if let Some(path) = &model.config_global_path {
        lines.push(Line::from(""));
        lines.push(Line::from(format!("Config: {}", path.display())));
    }
    if let Some(path) = &model.config_local_path {
        lines.push(Line::from(format!("Local override: {}", path.display())));
    }

    let height = lines.len() as u16 + 2;
    let area = centered_rect(frame.area(), 62, height);
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Help ")),
        area,
    );
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
