//! Terminal rendering.

pub mod style;

mod render;
mod status;
mod toolbar;

pub use render::{layout_rows, line_number_width, render, split_panes};
pub use toolbar::message_at as toolbar_message_at;
