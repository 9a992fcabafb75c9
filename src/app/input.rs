use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};

use crate::editor::Direction;
use crate::format::FormatOp;
use crate::ui;

use super::model::Model;
use super::update::Message;

/// Lines scrolled per mouse wheel tick.
const SCROLL_STEP: usize = 3;

/// Translate a terminal event into a message, if it maps to one.
pub fn handle_event(event: &Event, model: &Model) -> Option<Message> {
    match event {
        Event::Key(key) => handle_key(*key, model),
        Event::Mouse(mouse) => handle_mouse(*mouse, model),
        _ => None,
    }
}

fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    // Any key dismisses the help overlay.
    if model.help_visible {
        return Some(Message::HideHelp);
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    let msg = match key.code {
        KeyCode::F(1) => Message::ToggleHelp,
        KeyCode::Char('q' | 'c') if ctrl => Message::Quit,
        KeyCode::Char('p') if ctrl => Message::TogglePreview,
        KeyCode::Char('y') if ctrl => Message::CopyBuffer,
        KeyCode::Char('a') if ctrl => Message::SelectAll,

        // Formatting shortcuts
        KeyCode::Char('b') if ctrl => Message::Format(FormatOp::BOLD),
        KeyCode::Char('i') if ctrl => Message::Format(FormatOp::ITALIC),
        KeyCode::Char('k') if ctrl => Message::Format(FormatOp::Link),
        KeyCode::Char(ch @ '1'..='6') if alt => {
            Message::Format(FormatOp::Heading(ch as u8 - b'0'))
        }
        KeyCode::Char('u') if alt => Message::Format(FormatOp::List { ordered: false }),
        KeyCode::Char('o') if alt => Message::Format(FormatOp::List { ordered: true }),
        KeyCode::Char('q') if alt => Message::Format(FormatOp::Blockquote),
        KeyCode::Char('c') if alt => Message::Format(FormatOp::INLINE_CODE),
        KeyCode::Char('f') if alt => Message::Format(FormatOp::CODE_BLOCK),
        KeyCode::Char('s') if alt => Message::Format(FormatOp::STRIKETHROUGH),
        KeyCode::Char('g') if alt => Message::Format(FormatOp::Image),

        // Split resizing
        KeyCode::Left if alt => Message::ShrinkSplit,
        KeyCode::Right if alt => Message::GrowSplit,

        // Cursor movement
        KeyCode::Left if ctrl => Message::MoveWordLeft(shift),
        KeyCode::Right if ctrl => Message::MoveWordRight(shift),
        KeyCode::Left => Message::MoveCursor(Direction::Left, shift),
        KeyCode::Right => Message::MoveCursor(Direction::Right, shift),
        KeyCode::Up => Message::MoveCursor(Direction::Up, shift),
        KeyCode::Down => Message::MoveCursor(Direction::Down, shift),
        KeyCode::Home if ctrl => Message::MoveToStart(shift),
        KeyCode::End if ctrl => Message::MoveToEnd(shift),
        KeyCode::Home => Message::MoveHome(shift),
        KeyCode::End => Message::MoveEnd(shift),
        KeyCode::PageUp => Message::EditorScrollUp(model.pane_height()),
        KeyCode::PageDown => Message::EditorScrollDown(model.pane_height()),

        // Editing
        KeyCode::Enter => Message::SplitLine,
        KeyCode::Backspace => Message::DeleteBack,
        KeyCode::Delete => Message::DeleteForward,
        KeyCode::Tab => Message::InsertText("    ".to_string()),
        KeyCode::Char(ch) if !ctrl && !alt => Message::InsertChar(ch),
        _ => return None,
    };
    Some(msg)
}

fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
    let (width, height) = model.terminal_size;
    let frame = Rect::new(0, 0, width, height);
    let (toolbar_area, main_area, _status_area) = ui::layout_rows(frame);
    let (editor_area, divider_area, _preview_area) =
        ui::split_panes(main_area, model.split_percent, model.preview_visible);
    let position = Position::new(mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if model.help_visible {
                return Some(Message::HideHelp);
            }
            if toolbar_area.contains(position) {
                return ui::toolbar_message_at(mouse.column);
            }
            if divider_area.is_some_and(|rect| rect.contains(position)) {
                return Some(Message::StartDividerDrag);
            }
            if editor_area.contains(position) {
                return Some(click_message(mouse, model, editor_area, false));
            }
            None
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if model.divider_drag {
                return Some(Message::DragDivider(mouse.column));
            }
            if editor_area.contains(position) {
                return Some(click_message(mouse, model, editor_area, true));
            }
            None
        }
        MouseEventKind::Up(MouseButton::Left) if model.divider_drag => {
            Some(Message::EndDividerDrag)
        }
        MouseEventKind::ScrollUp => Some(Message::EditorScrollUp(SCROLL_STEP)),
        MouseEventKind::ScrollDown => Some(Message::EditorScrollDown(SCROLL_STEP)),
        _ => None,
    }
}

/// Map a mouse position inside the editor pane to a buffer position.
fn click_message(mouse: MouseEvent, model: &Model, editor_area: Rect, extend: bool) -> Message {
    let gutter = ui::line_number_width(model.editor.line_count()) + 1;
    let line = model.editor_scroll + (mouse.row - editor_area.y) as usize;
    let col = mouse
        .column
        .saturating_sub(editor_area.x)
        .saturating_sub(gutter) as usize;
    Message::MoveTo(line.min(model.max_editor_scroll()), col, extend)
}
