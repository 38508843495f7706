pub mod engine;
pub mod pipeline;
pub mod simulation;
pub mod stats;

pub use crate::domain::model::{
    InstrumentSpec, MarketData, PriceEstimate, PricingOutcome, ReportBundle, SimulationSettings,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
