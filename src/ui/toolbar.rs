//! The clickable formatting toolbar.

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::app::Message;
use crate::format::FormatOp;

enum Action {
    Op(FormatOp),
    Copy,
}

/// Buttons in display order. Each is rendered as ` label ` with a one
/// column gap between buttons; `message_at` walks the same layout.
const BUTTONS: &[(&str, Action)] = &[
    ("H1", Action::Op(FormatOp::Heading(1))),
    ("H2", Action::Op(FormatOp::Heading(2))),
    ("H3", Action::Op(FormatOp::Heading(3))),
    ("B", Action::Op(FormatOp::BOLD)),
    ("I", Action::Op(FormatOp::ITALIC)),
    ("S", Action::Op(FormatOp::STRIKETHROUGH)),
    ("`", Action::Op(FormatOp::INLINE_CODE)),
    ("```", Action::Op(FormatOp::CODE_BLOCK)),
    ("•", Action::Op(FormatOp::List { ordered: false })),
    ("1.", Action::Op(FormatOp::List { ordered: true })),
    (">", Action::Op(FormatOp::Blockquote)),
    ("Link", Action::Op(FormatOp::Link)),
    ("Img", Action::Op(FormatOp::Image)),
    ("Copy", Action::Copy),
];

/// The message a click at this toolbar column triggers, if it hit a button.
pub fn message_at(column: u16) -> Option<Message> {
    let mut x = 0u16;
    for (label, action) in BUTTONS {
        let width = label.chars().count() as u16 + 2;
        if column >= x && column < x + width {
            return Some(match action {
                Action::Op(op) => Message::Format(*op),
                Action::Copy => Message::CopyBuffer,
            });
        }
        x += width + 1;
    }
    None
}

pub fn toolbar_line() -> Line<'static> {
    let button_style = Style::default().bg(Color::Indexed(237)).fg(Color::White);
    let mut spans = Vec::with_capacity(BUTTONS.len() * 2);
    for (i, (label, _)) in BUTTONS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(format!(" {label} "), button_style));
    }
    Line::from(spans)
}
