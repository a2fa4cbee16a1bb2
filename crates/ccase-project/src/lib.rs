mod config;
mod error;
mod project;
mod shared;
mod state;

pub const CONFIG_FILENAME: &str = "ccase.toml";
pub const DEFAULT_STATE_DIR: &str = ".ccase";

pub use config::{ViewConfig, load_view_config, parse_view_config};
pub use error::ProjectError;
pub use project::{ViewProject, discover_project};
pub use shared::SharedConfig;
pub use state::{STATE_FILENAME, load_tracking_state, save_tracking_state};

pub type Result<T> = std::result::Result<T, ProjectError>;
