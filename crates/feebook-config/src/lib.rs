//! feebook-config
//!
//! Persistent user preferences for the Feebook CLI.
//! Owns the Config data structure, base-directory resolution and disk persistence.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::{resolve_base_dir, ConfigManager, HOME_ENV};
pub use model::Config;
