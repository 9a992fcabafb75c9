use crate::editor::Direction;
use crate::format::{EditSurface, FormatOp, Selection, dispatch};

use super::model::Model;

/// All the messages that can update the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // --- Editing ---
    /// Insert a character at the cursor
    InsertChar(char),
    /// Insert a string at the cursor
    InsertText(String),
    /// Break the current line at the cursor
    SplitLine,
    /// Delete backwards (Backspace)
    DeleteBack,
    /// Delete forwards (Delete)
    DeleteForward,

    // --- Cursor movement; the bool extends the selection ---
    MoveCursor(Direction, bool),
    MoveHome(bool),
    MoveEnd(bool),
    MoveWordLeft(bool),
    MoveWordRight(bool),
    MoveToStart(bool),
    MoveToEnd(bool),
    /// Place the cursor at a buffer position (mouse click / drag)
    MoveTo(usize, usize, bool),
    SelectAll,

    // --- Formatting ---
    /// Apply a markdown formatting operation to the current selection
    Format(FormatOp),
    /// Re-apply a selection deferred from a formatting operation
    RestoreSelection(Selection),

    // --- Clipboard ---
    /// Copy the selection (or the whole buffer) to the clipboard
    CopyBuffer,

    // --- Panes and layout ---
    TogglePreview,
    /// Widen the editor pane by 5%
    GrowSplit,
    /// Narrow the editor pane by 5%
    ShrinkSplit,
    StartDividerDrag,
    /// Drag the divider to a terminal column
    DragDivider(u16),
    EndDividerDrag,
    EditorScrollUp(usize),
    EditorScrollDown(usize),

    // --- Overlays and lifecycle ---
    ToggleHelp,
    HideHelp,
    Resize(u16, u16),
    Quit,
}

/// Pure update function. Takes the model and a message, returns the new
/// model. No side effects here; those live in `handle_message_side_effects`.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        Message::InsertChar(ch) => {
            model.editor.insert_char(ch);
            model.preview_dirty = true;
            model.ensure_cursor_visible();
        }
        Message::InsertText(text) => {
            model.editor.insert_str(&text);
            model.preview_dirty = true;
            model.ensure_cursor_visible();
        }
        Message::SplitLine => {
            model.editor.split_line();
            model.preview_dirty = true;
            model.ensure_cursor_visible();
        }
        Message::DeleteBack => {
            if model.editor.delete_back() {
                model.preview_dirty = true;
            }
            model.ensure_cursor_visible();
        }
        Message::DeleteForward => {
            if model.editor.delete_forward() {
                model.preview_dirty = true;
            }
            model.ensure_cursor_visible();
        }
        Message::MoveCursor(direction, extend) => {
            model.editor.move_cursor(direction, extend);
            model.ensure_cursor_visible();
        }
        Message::MoveHome(extend) => {
            model.editor.move_home(extend);
            model.ensure_cursor_visible();
        }
        Message::MoveEnd(extend) => {
            model.editor.move_end(extend);
            model.ensure_cursor_visible();
        }
        Message::MoveWordLeft(extend) => {
            model.editor.move_word_left(extend);
            model.ensure_cursor_visible();
        }
        Message::MoveWordRight(extend) => {
            model.editor.move_word_right(extend);
            model.ensure_cursor_visible();
        }
        Message::MoveToStart(extend) => {
            model.editor.move_to_start(extend);
            model.ensure_cursor_visible();
        }
        Message::MoveToEnd(extend) => {
            model.editor.move_to_end(extend);
            model.ensure_cursor_visible();
        }
        Message::MoveTo(line, col, extend) => {
            model.editor.move_to(line, col, extend);
            model.ensure_cursor_visible();
        }
        Message::SelectAll => {
            model.editor.move_to_start(false);
            model.editor.move_to_end(true);
        }
        Message::Format(op) => {
            // The buffer swap collapses the caret; the predicted selection
            // is re-applied on the next pass via RestoreSelection.
            model.pending_selection = dispatch(Some(&mut model.editor), &op);
            model.preview_dirty = true;
            model.ensure_cursor_visible();
        }
        Message::RestoreSelection(selection) => {
            model.editor.set_selection(selection);
            model.ensure_cursor_visible();
        }
        Message::CopyBuffer => {
            // Handled entirely by side effects.
        }
        Message::TogglePreview => {
            model.preview_visible = !model.preview_visible;
            if model.preview_visible {
                model.preview_dirty = true;
            }
        }
        Message::GrowSplit => {
            model.split_percent = (model.split_percent + 5).min(90);
            model.preview_dirty = true;
        }
        Message::ShrinkSplit => {
            model.split_percent = model.split_percent.saturating_sub(5).max(10);
            model.preview_dirty = true;
        }
        Message::StartDividerDrag => {
            model.divider_drag = true;
        }
        Message::DragDivider(column) => {
            let width = model.terminal_size.0.max(1);
            let percent = u32::from(column) * 100 / u32::from(width);
            model.split_percent = u16::try_from(percent).unwrap_or(90).clamp(10, 90);
            model.preview_dirty = true;
        }
        Message::EndDividerDrag => {
            model.divider_drag = false;
        }
        Message::EditorScrollUp(lines) => {
            model.editor_scroll = model.editor_scroll.saturating_sub(lines);
        }
        Message::EditorScrollDown(lines) => {
            model.editor_scroll = (model.editor_scroll + lines).min(model.max_editor_scroll());
        }
        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
        }
        Message::HideHelp => {
            model.help_visible = false;
        }
        Message::Resize(width, height) => {
            model.terminal_size = (width, height);
            model.editor_scroll = model.editor_scroll.min(model.max_editor_scroll());
            model.preview_dirty = true;
            model.ensure_cursor_visible();
        }
        Message::Quit => {
            model.should_quit = true;
        }
    }
    model
}
