//! `app.json` loading and path resolution.

mod paths;
mod read;


pub use paths::{default_config_path, executable_dir, resolve_relative, CONFIG_FILE_NAME};
pub use read::{load_default, load_from_path};
