use crate::domain::model::{
    InstrumentSpec, MarketData, PricingOutcome, ReportBundle, SimulationSettings,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn market(&self) -> MarketData;
    fn simulation(&self) -> SimulationSettings;
    fn instruments(&self) -> Result<Vec<InstrumentSpec>>;
    fn output_path(&self) -> &str;
    fn charts_enabled(&self) -> bool;
    fn archive_enabled(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Run the Monte Carlo engine over every configured instrument.
    async fn price(&self) -> Result<Vec<PricingOutcome>>;
    /// Turn the raw estimates into table, CSV and JSON reports.
    async fn report(&self, outcomes: Vec<PricingOutcome>) -> Result<ReportBundle>;
    /// Persist the reports (and charts/archive when enabled), returning the
    /// output location.
    async fn load(&self, bundle: ReportBundle) -> Result<String>;
}
