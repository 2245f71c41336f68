//! Configuration loading
//!
//! Resolves [`eventrelay_domain::Config`] from `EVENTRELAY_*` environment
//! variables or a JSON/TOML file.

pub mod loader;

pub use loader::{
    env_configured, find_config_file, load, load_file_with_source, load_from_env, load_from_file,
    load_with_source, ConfigSource,
};
