pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;
pub use config::Settings;

pub use adapters::{ApiFootballClient, LocalStorage, MySqlSink};
pub use core::{
    etl::{EtlEngine, RunOutcome},
    pipeline::TopScorersPipeline,
};
pub use utils::error::{EtlError, Result};
