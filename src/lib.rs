pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::storage::LocalStorage;
pub use config::{toml_config::TomlConfig, NotionConfig};
pub use crate::core::{
    export::{ExportFormat, ProjectExporter},
    repository::NotionProjectRepository,
};
pub use domain::{
    model::{Project, ProjectPage},
    ports::ProjectRepository,
};
pub use utils::error::{NotionError, Result};
