pub mod config;
pub mod tracing;
pub mod wiring;

pub use config::{load_config, load_config_or_default, resolve_config_path};
pub use wiring::{resolve_data_dir, wire_dependencies, ClientDeps};
