//! Application state and event handling.

use std::path::PathBuf;

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Model, ToastLevel};
pub use update::{Message, update};


/// The application entry point, configured with the builder methods and
/// started with [`App::run`].
pub struct App {
    text: String,
    file_name: Option<String>,
    preview_visible: bool,
    split_percent: u16,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            file_name: None,
            preview_visible: true,
            split_percent: 50,
            config_global_path: None,
            config_local_path: None,
        }
    }

    #[must_use]
    pub fn with_file_name(mut self, file_name: Option<String>) -> Self {
        self.file_name = file_name;
        self
    }

    #[must_use]
    pub const fn with_preview_visible(mut self, visible: bool) -> Self {
        self.preview_visible = visible;
        self
    }

    #[must_use]
    pub const fn with_split_percent(mut self, percent: u16) -> Self {
        self.split_percent = percent;
        self
    }

    #[must_use]
    pub fn with_config_paths(mut self, global: PathBuf, local: PathBuf) -> Self {
        self.config_global_path = Some(global);
        self.config_local_path = Some(local);
        self
    }

    fn build_model(&self, terminal_size: (u16, u16)) -> Model {
        let mut model = Model::new(&self.text, terminal_size);
        model.file_name = self.file_name.clone();
        model.preview_visible = self.preview_visible;
        model.split_percent = self.split_percent.clamp(10, 90);
        model.config_global_path = self.config_global_path.clone();
        model.config_local_path = self.config_local_path.clone();
        model
    }
}
