use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::editor::EditorBuffer;
use crate::format::{EditSurface, Selection};
use crate::preview::Preview;

/// How long a toast stays on screen.
const TOAST_TTL: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// The complete application state.
///
/// All state lives here, no globals. The buffer being edited is the single
/// source of truth; the preview is re-rendered from it whenever
/// `preview_dirty` is set.
pub struct Model {
    /// The buffer being edited
    pub editor: EditorBuffer,
    /// Name of the file the buffer was seeded from, for the status bar
    pub file_name: Option<String>,
    /// Rendered preview of the buffer
    pub preview: Preview,
    /// Whether the preview pane is shown
    pub preview_visible: bool,
    /// Whether the preview needs re-rendering before the next frame
    pub preview_dirty: bool,
    /// Editor pane width as a percentage of the main area (10..=90)
    pub split_percent: u16,
    /// First visible buffer line in the editor pane
    pub editor_scroll: usize,
    /// Selection to re-apply after the current update pass. Set when a
    /// formatting operation replaces the buffer; drained by the event loop
    /// so the buffer update is always observed first.
    pub pending_selection: Option<Selection>,
    /// Whether the help overlay is visible
    pub help_visible: bool,
    /// Whether the split divider is being dragged with the mouse
    pub divider_drag: bool,
    toast: Option<Toast>,
    /// Current terminal size
    pub terminal_size: (u16, u16),
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    /// Whether the app should quit
    pub should_quit: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("file_name", &self.file_name)
            .field("preview_visible", &self.preview_visible)
            .field("split_percent", &self.split_percent)
            .field("should_quit", &self.should_quit)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a new model seeded with the given buffer text.
    pub fn new(text: &str, terminal_size: (u16, u16)) -> Self {
        Self {
            editor: EditorBuffer::from_text(text),
            file_name: None,
            preview: Preview::default(),
            preview_visible: true,
            preview_dirty: true,
            split_percent: 50,
            editor_scroll: 0,
            pending_selection: None,
            help_visible: false,
            divider_drag: false,
            toast: None,
            terminal_size,
            config_global_path: None,
            config_local_path: None,
            should_quit: false,
        }
    }

    /// Rows available to the editor and preview panes (frame minus the
    /// toolbar and status rows).
    pub fn pane_height(&self) -> usize {
        self.terminal_size.1.saturating_sub(2) as usize
    }

    /// Scroll the editor pane so the cursor line is visible.
    pub fn ensure_cursor_visible(&mut self) {
        let height = self.pane_height();
        if height == 0 {
            return;
        }
        let (line, _) = self.editor.head_line_col();
        if line < self.editor_scroll {
            self.editor_scroll = line;
        } else if line >= self.editor_scroll + height {
            self.editor_scroll = line + 1 - height;
        }
    }

    pub fn max_editor_scroll(&self) -> usize {
        self.editor.line_count().saturating_sub(1)
    }

    /// Preview scroll offset following the editor proportionally.
    pub fn preview_scroll(&self, view_height: usize) -> usize {
        let total = self.preview.line_count();
        let buffer_lines = self.editor.line_count().max(1);
        let mapped = self.editor_scroll * total / buffer_lines;
        mapped.min(total.saturating_sub(view_height))
    }

    /// Re-render the preview from the buffer at the given pane width.
    pub fn refresh_preview(&mut self, width: u16) {
        match crate::preview::render(&self.editor.text(), width) {
            Ok(preview) => self.preview = preview,
            Err(err) => {
                // Keep the previous preview on screen.
                self.show_toast(ToastLevel::Error, format!("Preview failed: {err}"));
            }
        }
        self.preview_dirty = false;
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

// Default allows std::mem::take in the event loop.
impl Default for Model {
    fn default() -> Self {
        Self::new("", (80, 24))
    }
}
