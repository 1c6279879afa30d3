pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod input;
pub mod utils;

pub use adapters::storage::LocalStorage;
pub use config::{toml_config::TomlConfig, CliConfig};
pub use core::{engine::UpsetEngine, pipeline::UpsetPipeline};
pub use domain::model::{IncidenceMatrix, SetCollection, SetInput, UpsetSummary};
pub use utils::error::{Result, UpsetError};
