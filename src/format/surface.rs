//! Dispatch of formatting operations onto an editing surface.
//!
//! The engine itself is pure; this module is the seam between it and
//! whatever owns the text. A host exposes its buffer through [`EditSurface`]
//! and [`dispatch`] drives one operation through it: read, transform,
//! replace, hand back the selection for the host to re-apply.

use super::{FormatOp, Selection, apply};

/// The contract an editable text surface offers to the formatting engine.
///
/// Replacing the text is wholesale: the surface swaps its entire content and
/// is free to collapse its own caret while doing so. The selection returned
/// by [`dispatch`] is what the host should restore afterwards.
pub trait EditSurface {
    /// Current buffer contents.
    fn text(&self) -> String;

    /// Current selection in character offsets.
    fn selection(&self) -> Selection;

    /// Move the selection. Offsets out of range are clamped.
    fn set_selection(&mut self, selection: Selection);

    /// Replace the entire buffer.
    fn replace(&mut self, text: String);

    /// Ask the surface to take keyboard focus.
    fn request_focus(&mut self);
}

/// Run one formatting operation against a surface, if one is attached.
///
/// With no surface this is a silent no-op. Otherwise the buffer is replaced
/// immediately and the selection the engine predicted is *returned*, not
/// applied: the host must schedule it after the replacement has been
/// observed, so the buffer update always lands first.
pub fn dispatch(surface: Option<&mut dyn EditSurface>, op: &FormatOp) -> Option<Selection> {
    let surface = surface?;
    let edit = apply(&surface.text(), surface.selection(), op);
    surface.replace(edit.text);
    surface.request_focus();
    Some(edit.selection)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockSurface {
        text: String,
        selection: Selection,
        focus_requests: usize,
        selection_sets: Vec<Selection>,
    }

    impl MockSurface {
        fn new(text: &str, start: usize, end: usize) -> Self {
            Self {
                text: text.to_string(),
                selection: Selection::new(start, end),
                focus_requests: 0,
                selection_sets: Vec::new(),
            }
        }
    }

    impl EditSurface for MockSurface {
        fn text(&self) -> String {
            self.text.clone()
        }

        fn selection(&self) -> Selection {
            self.selection
        }

        fn set_selection(&mut self, selection: Selection) {
            self.selection = selection.clamped(self.text.chars().count());
            self.selection_sets.push(self.selection);
        }

        fn replace(&mut self, text: String) {
            // Model a real surface recomputing after a content swap: the
            // caret collapses to the end of the new text.
            self.selection = Selection::caret(text.chars().count());
            self.text = text;
        }

        fn request_focus(&mut self) {
            self.focus_requests += 1;
        }
    }

    #[test]
    fn test_dispatch_without_surface_is_noop() {
        assert_eq!(dispatch(None, &FormatOp::BOLD), None);
    }

    #[test]
    fn test_dispatch_replaces_buffer_and_requests_focus() {
        let mut surface = MockSurface::new("hello", 0, 5);
        let pending = dispatch(Some(&mut surface), &FormatOp::BOLD);

        assert_eq!(surface.text, "**hello**");
        assert_eq!(surface.focus_requests, 1);
        assert_eq!(pending, Some(Selection::new(2, 7)));
        // The replace collapsed the caret; restoring is the caller's job.
        assert_eq!(surface.selection, Selection::caret(9));
    }

    #[test]
    fn test_dispatch_leaves_selection_restore_to_caller() {
        let mut surface = MockSurface::new("hi", 0, 2);
        let pending = dispatch(Some(&mut surface), &FormatOp::ITALIC).expect("surface attached");

        assert!(surface.selection_sets.is_empty());
        surface.set_selection(pending);
        assert_eq!(surface.selection, Selection::new(1, 3));
    }
}
