//! Configuration schema and loading.

pub mod loader;
pub mod schema;

pub use loader::{get_config_path, load_config, resolve_api_key, save_config};
pub use schema::Config;
