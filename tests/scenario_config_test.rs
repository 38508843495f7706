use mc_pricer::config::scenario::ScenarioConfig;
use mc_pricer::domain::ports::ConfigProvider;
use mc_pricer::utils::validation::Validate;
use mc_pricer::{LocalStorage, PricingEngine, PricingPipeline};
use tempfile::TempDir;

fn scenario_toml(output_path: &str) -> String {
    format!(
        r#"
[scenario]
name = "integration-suite"
description = "Small end-to-end scenario"
version = "1.0"

[market]
spot = 100.0
volatility = 0.25
risk_free_rate = 0.03
time_to_expiry = 0.5

[simulation]
paths = 2000
batches = 2
seed = 99
confidence_level = 99

[[instruments]]
label = "ATM Call"
kind = "call"
style = "european"
strike = 100.0

[[instruments]]
label = "Protective Put"
kind = "put"
style = "european"
strike = 95.0

[[instruments]]
label = "Knock-In Call 115"
kind = "call"
style = "barrier"
strike = 100.0
barrier = 115.0
trigger = "knock_in"

[[instruments]]
label = "Asian Call"
kind = "call"
style = "asian"
strike = 100.0
steps = 16

[output]
path = "{output_path}"
charts = false
archive = true
"#
    )
}

#[tokio::test]
async fn test_scenario_file_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let scenario_path = temp_dir.path().join("scenario.toml");
    std::fs::write(&scenario_path, scenario_toml(&output_path)).unwrap();

    let config = ScenarioConfig::from_file(&scenario_path).unwrap();
    config.validate().unwrap();

    assert_eq!(config.scenario.name, "integration-suite");
    assert_eq!(config.confidence_level().percent(), 99);
    assert!(config.archive_enabled());
    assert!(!config.charts_enabled());

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = PricingPipeline::new(storage, config);
    let engine = PricingEngine::new(pipeline);

    let result = engine.run().await.unwrap();
    assert!(result.ends_with("pricing_results.zip"));

    let csv_content =
        std::fs::read_to_string(temp_dir.path().join("price_report.csv")).unwrap();
    let lines: Vec<&str> = csv_content.trim().lines().collect();
    // Header plus the four scenario instruments, in declaration order
    assert_eq!(lines.len(), 5);
    assert!(lines[1].starts_with("ATM Call,"));
    assert!(lines[4].starts_with("Asian Call,"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(temp_dir.path().join("price_report.json")).unwrap())
            .unwrap();
    assert_eq!(json["simulation"]["confidence_percent"], 99);
    assert_eq!(json["simulation"]["seed"], 99);
    assert_eq!(json["market"]["volatility"], 0.25);
}

#[tokio::test]
async fn test_invalid_scenario_does_not_run() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    // Barrier instrument without a trigger must fail validation
    let toml = scenario_toml(&output_path).replace("trigger = \"knock_in\"\n", "");
    let config = ScenarioConfig::from_toml_str(&toml).unwrap();
    assert!(config.validate().is_err());
}
