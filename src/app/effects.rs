use crate::clipboard;
use crate::format::EditSurface;

use super::model::{Model, ToastLevel};
use super::update::Message;

/// Run the side effects a message implies, after the pure update.
pub fn handle_message_side_effects(model: &mut Model, msg: &Message) {
    if *msg == Message::CopyBuffer {
        copy_buffer(model);
    }
}

/// Copy the selection, or the whole buffer when nothing is selected.
fn copy_buffer(model: &mut Model) {
    let selected = model.editor.selected_text();
    let text = if selected.is_empty() {
        model.editor.text()
    } else {
        selected
    };
    match clipboard::copy(&text) {
        Ok(()) => model.show_toast(ToastLevel::Info, "Copied"),
        Err(err) => {
            tracing::warn!("clipboard copy failed: {err}");
            model.show_toast(ToastLevel::Error, format!("Copy failed: {err}"));
        }
    }
}
