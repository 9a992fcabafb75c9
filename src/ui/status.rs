use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};
use crate::format::EditSurface;

/// Bottom status row. An active toast takes the row over entirely.
pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    if let Some((message, level)) = model.active_toast() {
        render_toast_bar(frame, area, message, level);
        return;
    }

    let (line, col) = model.editor.head_line_col();
    let selection = model.editor.selection();
    let selection_info = if selection.is_caret() {
        String::new()
    } else {
        format!("  ({} selected)", selection.len())
    };
    let name = model.file_name.as_deref().unwrap_or("[scratch]");
    let left = format!(" {name}  Ln {}, Col {}{selection_info}", line + 1, col + 1);
    let right = "F1:help  Ctrl+P:preview  Ctrl+Y:copy  Ctrl+Q:quit ";

    let width = area.width as usize;
    let pad = width.saturating_sub(left.chars().count() + right.chars().count());
    let content = format!("{left}{}{right}", " ".repeat(pad));

    let style = Style::default().bg(Color::Magenta).fg(Color::White);
    frame.render_widget(Paragraph::new(content).style(style), area);
}

fn render_toast_bar(frame: &mut Frame, area: Rect, message: &str, level: ToastLevel) {
    let style = match level {
        ToastLevel::Info => Style::default().bg(Color::DarkGray).fg(Color::White),
        ToastLevel::Warning => Style::default().bg(Color::Yellow).fg(Color::Black),
        ToastLevel::Error => Style::default().bg(Color::Red).fg(Color::White),
    };
    frame.render_widget(Paragraph::new(format!(" {message}")).style(style), area);
}
