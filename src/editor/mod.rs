//! The editable text surface.
//!
//! A rope-backed text buffer with selection management: anchor/head offsets,
//! sticky-column vertical movement, word motions, and selection-aware
//! editing. Implements the [`crate::format::EditSurface`] contract so
//! formatting operations can be dispatched onto it.

mod buffer;

pub use buffer::{Direction, EditorBuffer};
