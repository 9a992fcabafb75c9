//! markpad is a terminal markdown editor with a live preview pane.
//!
//! # Architecture
//!
//! The application follows The Elm Architecture (TEA):
//! - **Model**: all state lives in [`app::Model`]
//! - **Message**: every state change is an [`app::Message`]
//! - **Update**: [`app::update`] is a pure function from model and message
//!   to the next model; side effects run separately after each update
//! - **View**: [`ui::render`] draws the model, and nothing else
//!
//! # Modules
//!
//! - [`format`]: the pure markdown formatting engine
//! - [`editor`]: the rope-backed editable buffer
//! - [`preview`]: markdown parsing and preview rendering
//! - [`app`]: model, messages, update, input, and the event loop
//! - [`ui`]: ratatui widgets and layout
//! - [`clipboard`]: OSC 52 clipboard writes
//! - [`config`]: persisted startup flags

// Transitive dependencies pin different versions of a few crates.
#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod clipboard;
pub mod config;
pub mod editor;
pub mod format;
pub mod preview;
pub mod ui;

pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::editor::EditorBuffer;
    pub use crate::format::{FormatOp, Selection, apply};
    pub use crate::preview::Preview;
}
