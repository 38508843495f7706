use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct PricingEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> PricingEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Drive the three pipeline phases, printing the pricing table between
    /// report and load.
    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting pricing run...");
        self.monitor.log_stats("Startup");

        tracing::info!("Pricing instruments...");
        let outcomes = self.pipeline.price().await?;
        tracing::info!("Priced {} instruments", outcomes.len());
        self.monitor.log_stats("Price");

        tracing::info!("Building reports...");
        let bundle = self.pipeline.report(outcomes).await?;
        self.monitor.log_stats("Report");

        println!("{}", bundle.table_output);

        tracing::info!("Writing output...");
        let output_path = self.pipeline.load(bundle).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
