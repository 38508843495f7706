pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::cli::LocalStorage;
pub use config::scenario::ScenarioConfig;
pub use core::{engine::PricingEngine, pipeline::PricingPipeline};
pub use utils::error::{PricingError, Result};
