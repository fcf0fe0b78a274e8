pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;
pub use crate::config::toml_config::TomlConfig;

pub use crate::adapters::{http::HttpBlendApi, storage::LocalStorage};
pub use crate::core::engine::{BlendEngine, BlendJob};
pub use crate::domain::model::{OutputMode, RunReport};
pub use crate::utils::error::{BlendError, Result};
