//! Parsing and validation of the optional `vsnip.toml` project file.
//!
//! Every section is optional; a project without a `vsnip.toml` runs with
//! [`VsnipConfig::default`].

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, load_config_or_default, CONFIG_FILE_NAME};
pub use types::*;
