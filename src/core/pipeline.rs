use crate::adapters::{render_bar_chart, BarChartSpec};
use crate::core::simulation::MonteCarloEngine;
use crate::core::{ConfigProvider, Pipeline, PricingOutcome, ReportBundle, Storage};
use crate::utils::error::{PricingError, Result};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

const CSV_REPORT: &str = "price_report.csv";
const JSON_REPORT: &str = "price_report.json";
const ARCHIVE_NAME: &str = "pricing_results.zip";
const CHART_WIDTH: u32 = 800;
const CHART_HEIGHT: u32 = 600;

pub struct PricingPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> PricingPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn build_table(&self, outcomes: &[PricingOutcome]) -> String {
        let mut lines = Vec::new();
        lines.push("Option Pricing Results:".to_string());
        lines.push("=".repeat(61));
        lines.push(format!(
            "{:<25} {:<20} {:<10} {:<10}",
            "Option Type", "Price", "Lower CI", "Upper CI"
        ));
        lines.push("-".repeat(61));
        for outcome in outcomes {
            lines.push(format!(
                "{:<25} {:<20.6} {:<10.6} {:<10.6}",
                outcome.label,
                outcome.estimate.price,
                outcome.estimate.ci_lower,
                outcome.estimate.ci_upper
            ));
        }
        lines.push("=".repeat(61));
        lines.join("\n")
    }

    fn build_csv(&self, outcomes: &[PricingOutcome]) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["label", "price", "ci_lower", "ci_upper", "std_error"])?;
        for outcome in outcomes {
            let price = format!("{:.6}", outcome.estimate.price);
            let ci_lower = format!("{:.6}", outcome.estimate.ci_lower);
            let ci_upper = format!("{:.6}", outcome.estimate.ci_upper);
            let std_error = format!("{:.6}", outcome.estimate.std_error);
            writer.write_record([
                outcome.label.as_str(),
                price.as_str(),
                ci_lower.as_str(),
                ci_upper.as_str(),
                std_error.as_str(),
            ])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| PricingError::IoError(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| {
            PricingError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }

    fn build_json(&self, outcomes: &[PricingOutcome]) -> Result<String> {
        let market = self.config.market();
        let simulation = self.config.simulation();
        let report = serde_json::json!({
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "market": market,
            "simulation": {
                "paths": simulation.paths,
                "confidence_percent": simulation.confidence.percent(),
                "seed": simulation.seed,
                "batches": simulation.batches,
            },
            "results": outcomes,
        });
        Ok(serde_json::to_string_pretty(&report)?)
    }

    /// Render and save the three bar charts the reporter publishes: price
    /// per instrument plus the lower and upper confidence bounds. Charts are
    /// best-effort end to end; a failed render or save is logged and the
    /// remaining output still stands.
    async fn write_charts(
        &self,
        outcomes: &[PricingOutcome],
        produced: &mut Vec<(String, Vec<u8>)>,
    ) {
        let categories: Vec<String> = outcomes.iter().map(|o| o.label.clone()).collect();
        let datasets: [(&str, &str, &str, Vec<f64>); 3] = [
            (
                "Option Prices",
                "Price",
                "option_prices.png",
                outcomes.iter().map(|o| o.estimate.price).collect(),
            ),
            (
                "Lower CI",
                "Lower CI",
                "lower_ci.png",
                outcomes.iter().map(|o| o.estimate.ci_lower).collect(),
            ),
            (
                "Upper CI",
                "Upper CI",
                "upper_ci.png",
                outcomes.iter().map(|o| o.estimate.ci_upper).collect(),
            ),
        ];

        for (title, y_label, file_name, values) in datasets {
            let spec = BarChartSpec {
                title,
                x_label: "Option Type",
                y_label,
                categories: &categories,
                values: &values,
                width: CHART_WIDTH,
                height: CHART_HEIGHT,
            };
            match render_bar_chart(&spec) {
                Ok(png) => match self.storage.write_file(file_name, &png).await {
                    Ok(()) => {
                        tracing::info!("📈 Chart saved: {}", file_name);
                        produced.push((file_name.to_string(), png));
                    }
                    Err(e) => tracing::warn!("Failed to save {}: {}", file_name, e),
                },
                Err(e) => tracing::warn!("Failed to render {}: {}", file_name, e),
            }
        }
    }

    fn build_archive(&self, produced: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        for (name, data) in produced {
            zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
            zip.write_all(data)?;
        }
        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for PricingPipeline<S, C> {
    async fn price(&self) -> Result<Vec<PricingOutcome>> {
        let instruments = self.config.instruments()?;
        let engine = MonteCarloEngine::new(self.config.market(), self.config.simulation());

        let mut outcomes = Vec::with_capacity(instruments.len());
        for instrument in instruments {
            let estimate = engine.price(&instrument).await?;
            tracing::debug!(
                "{}: price={:.6} ci=[{:.6}, {:.6}]",
                instrument.label,
                estimate.price,
                estimate.ci_lower,
                estimate.ci_upper
            );
            outcomes.push(PricingOutcome {
                label: instrument.label,
                estimate,
            });
        }
        Ok(outcomes)
    }

    async fn report(&self, outcomes: Vec<PricingOutcome>) -> Result<ReportBundle> {
        let table_output = self.build_table(&outcomes);
        let csv_output = self.build_csv(&outcomes)?;
        let report_json = self.build_json(&outcomes)?;

        Ok(ReportBundle {
            outcomes,
            table_output,
            csv_output,
            report_json,
        })
    }

    async fn load(&self, bundle: ReportBundle) -> Result<String> {
        let mut produced: Vec<(String, Vec<u8>)> = Vec::new();

        let csv_bytes = bundle.csv_output.into_bytes();
        self.storage.write_file(CSV_REPORT, &csv_bytes).await?;
        produced.push((CSV_REPORT.to_string(), csv_bytes));

        let json_bytes = bundle.report_json.into_bytes();
        self.storage.write_file(JSON_REPORT, &json_bytes).await?;
        produced.push((JSON_REPORT.to_string(), json_bytes));

        if self.config.charts_enabled() {
            self.write_charts(&bundle.outcomes, &mut produced).await;
        }

        if self.config.archive_enabled() {
            tracing::debug!("Archiving {} report files", produced.len());
            let archive = self.build_archive(&produced)?;
            self.storage.write_file(ARCHIVE_NAME, &archive).await?;
            return Ok(format!("{}/{}", self.config.output_path(), ARCHIVE_NAME));
        }

        Ok(self.config.output_path().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{
        ConfidenceLevel, ExerciseStyle, InstrumentSpec, MarketData, OptionKind,
        SimulationSettings,
    };
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                PricingError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct TestConfig {
        archive: bool,
        charts: bool,
    }

    impl ConfigProvider for TestConfig {
        fn market(&self) -> MarketData {
            MarketData {
                spot: 100.0,
                volatility: 0.2,
                risk_free_rate: 0.05,
                time_to_expiry: 1.0,
            }
        }

        fn simulation(&self) -> SimulationSettings {
            SimulationSettings {
                paths: 2_000,
                confidence: ConfidenceLevel::NinetyFive,
                seed: Some(11),
                batches: 2,
            }
        }

        fn instruments(&self) -> Result<Vec<InstrumentSpec>> {
            Ok(vec![
                InstrumentSpec {
                    label: "European Call".to_string(),
                    kind: OptionKind::Call,
                    style: ExerciseStyle::European,
                    strike: 100.0,
                },
                InstrumentSpec {
                    label: "European Put".to_string(),
                    kind: OptionKind::Put,
                    style: ExerciseStyle::European,
                    strike: 100.0,
                },
            ])
        }

        fn output_path(&self) -> &str {
            "./test-output"
        }

        fn charts_enabled(&self) -> bool {
            self.charts
        }

        fn archive_enabled(&self) -> bool {
            self.archive
        }
    }

    #[tokio::test]
    async fn test_price_produces_one_outcome_per_instrument() {
        let pipeline = PricingPipeline::new(MockStorage::new(), TestConfig { archive: false, charts: false });
        let outcomes = pipeline.price().await.unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].label, "European Call");
        assert_eq!(outcomes[1].label, "European Put");
        for outcome in &outcomes {
            assert!(outcome.estimate.ci_lower <= outcome.estimate.price);
            assert!(outcome.estimate.price <= outcome.estimate.ci_upper);
        }
    }

    #[tokio::test]
    async fn test_report_builds_table_and_csv() {
        let pipeline = PricingPipeline::new(MockStorage::new(), TestConfig { archive: false, charts: false });
        let outcomes = pipeline.price().await.unwrap();
        let bundle = pipeline.report(outcomes).await.unwrap();

        assert!(bundle.table_output.contains("Option Pricing Results:"));
        assert!(bundle.table_output.contains("European Call"));
        assert!(bundle.table_output.contains("Lower CI"));

        let mut reader = csv::Reader::from_reader(bundle.csv_output.as_bytes());
        let rows: Vec<_> = reader.records().collect::<std::result::Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "European Call");

        let json: serde_json::Value = serde_json::from_str(&bundle.report_json).unwrap();
        assert_eq!(json["results"].as_array().unwrap().len(), 2);
        assert_eq!(json["simulation"]["confidence_percent"], 95);
    }

    #[tokio::test]
    async fn test_load_writes_reports_to_storage() {
        let storage = MockStorage::new();
        let pipeline = PricingPipeline::new(storage.clone(), TestConfig { archive: false, charts: false });
        let outcomes = pipeline.price().await.unwrap();
        let bundle = pipeline.report(outcomes).await.unwrap();
        let output = pipeline.load(bundle).await.unwrap();

        assert_eq!(output, "./test-output");
        assert!(storage.get_file("price_report.csv").await.is_some());
        assert!(storage.get_file("price_report.json").await.is_some());
    }

    // Accepts the report files but refuses every chart image, like a target
    // that runs out of space after the numeric output lands
    #[derive(Clone)]
    struct PngRejectingStorage {
        inner: MockStorage,
    }

    impl Storage for PngRejectingStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.inner.read_file(path).await
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            if path.ends_with(".png") {
                return Err(PricingError::IoError(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "disk full while writing chart",
                )));
            }
            self.inner.write_file(path, data).await
        }
    }

    #[tokio::test]
    async fn test_load_continues_when_chart_write_fails() {
        let storage = PngRejectingStorage {
            inner: MockStorage::new(),
        };
        let pipeline = PricingPipeline::new(
            storage.clone(),
            TestConfig {
                archive: false,
                charts: true,
            },
        );
        let outcomes = pipeline.price().await.unwrap();
        let bundle = pipeline.report(outcomes).await.unwrap();

        // Failed chart saves must not sink the run; the reports still land
        let output = pipeline.load(bundle).await.unwrap();
        assert_eq!(output, "./test-output");
        assert!(storage.inner.get_file("price_report.csv").await.is_some());
        assert!(storage.inner.get_file("price_report.json").await.is_some());
        assert!(storage.inner.get_file("option_prices.png").await.is_none());
    }

    #[tokio::test]
    async fn test_load_with_archive_bundles_reports() {
        let storage = MockStorage::new();
        let pipeline = PricingPipeline::new(storage.clone(), TestConfig { archive: true, charts: false });
        let outcomes = pipeline.price().await.unwrap();
        let bundle = pipeline.report(outcomes).await.unwrap();
        let output = pipeline.load(bundle).await.unwrap();

        assert!(output.ends_with("pricing_results.zip"));

        let zip_data = storage.get_file("pricing_results.zip").await.unwrap();
        let cursor = std::io::Cursor::new(zip_data);
        let mut archive = zip::ZipArchive::new(cursor).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert!(names.contains(&"price_report.csv".to_string()));
        assert!(names.contains(&"price_report.json".to_string()));
    }
}
