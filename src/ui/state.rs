use std::path::PathBuf;

use gtk4 as gtk;
use memorama_core::{Config, Game};

#[derive(Default)]
pub struct AppState {
    pub view_stack: Option<gtk::Stack>,
    pub board_container: Option<gtk::Box>,
    pub dynamic_css_provider: Option<gtk::CssProvider>,

    pub config: Config,
    pub asset_root: PathBuf,
    pub game: Option<Game>,
}

impl AppState {
    pub fn new(config: Config, asset_root: PathBuf) -> Self {
        AppState {
            config,
            asset_root,
            ..Default::default()
        }
    }
}
