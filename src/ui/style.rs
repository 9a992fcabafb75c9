//! Styling for preview line types and inline spans.

use ratatui::style::{Color, Modifier, Style};

use crate::preview::{InlineStyle, LineType};

/// Base style for a rendered preview line.
pub fn style_for_line_type(line_type: &LineType) -> Style {
    match line_type {
        LineType::Heading(1) => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        LineType::Heading(2) => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        LineType::Heading(3) => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        LineType::Heading(4) => Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        LineType::Heading(_) => Style::default().fg(Color::Magenta),
        LineType::CodeBlock => Style::default().fg(Color::Indexed(245)),
        LineType::BlockQuote => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::ITALIC),
        LineType::HorizontalRule => Style::default()
            .fg(Color::Indexed(240))
            .add_modifier(Modifier::DIM),
        LineType::Image => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::ITALIC),
        _ => Style::default(),
    }
}

/// Merge inline style flags onto a base line style.
pub fn style_for_inline(inline: InlineStyle, base: Style) -> Style {
    let mut style = base;
    if inline.emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if inline.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if inline.strikethrough {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    if inline.link {
        style = style.fg(Color::LightBlue).add_modifier(Modifier::UNDERLINED);
    }
    if inline.code {
        style = style.fg(Color::Red);
    }
    style
}
