pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use adapters::http::HttpClassifier;
pub use core::report::{PredictionReport, ReportExporter};
pub use core::session::{Session, SessionSnapshot};
pub use utils::error::{Result, StellarError};
