//! Live markdown preview.
//!
//! Renders the editor buffer into styled terminal lines with comrak. The
//! preview is a pure function of the buffer text and the pane width; the app
//! re-renders it whenever the buffer changes.

mod parser;
mod types;

pub use parser::render;
pub use types::{InlineSpan, InlineStyle, LineType, Preview, RenderedLine};
