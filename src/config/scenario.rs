use crate::domain::model::{
    BarrierTrigger, ConfidenceLevel, ExerciseStyle, InstrumentSpec, MarketData, OptionKind,
    SimulationSettings,
};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{PricingError, Result};
use crate::core::simulation::MAX_BATCHES;
use crate::utils::validation::{
    validate_confidence_level, validate_non_empty_string, validate_path, validate_positive_f64,
    validate_positive_number, validate_range, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// TOML-driven pricing scenario: shared market data, simulation settings and
/// an arbitrary instrument list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub scenario: ScenarioMeta,
    pub market: MarketSection,
    pub simulation: SimulationSection,
    pub instruments: Vec<InstrumentSection>,
    pub output: OutputSection,
    pub monitoring: Option<MonitoringSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioMeta {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSection {
    pub spot: f64,
    pub volatility: f64,
    pub risk_free_rate: f64,
    pub time_to_expiry: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSection {
    pub paths: u64,
    pub batches: Option<usize>,
    pub seed: Option<u64>,
    pub confidence_level: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentSection {
    pub label: String,
    pub kind: String,
    pub style: String,
    pub strike: f64,
    pub barrier: Option<f64>,
    pub trigger: Option<String>,
    pub steps: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    pub path: String,
    pub charts: Option<bool>,
    pub archive: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringSection {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl InstrumentSection {
    fn parse_kind(&self) -> Result<OptionKind> {
        match self.kind.as_str() {
            "call" => Ok(OptionKind::Call),
            "put" => Ok(OptionKind::Put),
            other => Err(PricingError::InvalidConfigValueError {
                field: format!("instruments.{}.kind", self.label),
                value: other.to_string(),
                reason: "Supported kinds: call, put".to_string(),
            }),
        }
    }

    fn parse_style(&self) -> Result<ExerciseStyle> {
        match self.style.as_str() {
            "european" => Ok(ExerciseStyle::European),
            "barrier" => {
                let level = self.barrier.ok_or_else(|| PricingError::MissingConfigError {
                    field: format!("instruments.{}.barrier", self.label),
                })?;
                let trigger = match self.trigger.as_deref() {
                    Some("knock_in") => BarrierTrigger::KnockIn,
                    Some("knock_out") => BarrierTrigger::KnockOut,
                    Some(other) => {
                        return Err(PricingError::InvalidConfigValueError {
                            field: format!("instruments.{}.trigger", self.label),
                            value: other.to_string(),
                            reason: "Supported triggers: knock_in, knock_out".to_string(),
                        })
                    }
                    None => {
                        return Err(PricingError::MissingConfigError {
                            field: format!("instruments.{}.trigger", self.label),
                        })
                    }
                };
                Ok(ExerciseStyle::Barrier { level, trigger })
            }
            "asian" => {
                let steps = self.steps.ok_or_else(|| PricingError::MissingConfigError {
                    field: format!("instruments.{}.steps", self.label),
                })?;
                Ok(ExerciseStyle::Asian { steps })
            }
            other => Err(PricingError::InvalidConfigValueError {
                field: format!("instruments.{}.style", self.label),
                value: other.to_string(),
                reason: "Supported styles: european, barrier, asian".to_string(),
            }),
        }
    }

    pub fn to_spec(&self) -> Result<InstrumentSpec> {
        Ok(InstrumentSpec {
            label: self.label.clone(),
            kind: self.parse_kind()?,
            style: self.parse_style()?,
            strike: self.strike,
        })
    }
}

impl ScenarioConfig {
    /// Load a scenario from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PricingError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parse a scenario from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PricingError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR_NAME}` placeholders with environment variables.
    /// Unset variables are left as-is so validation can report them.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").expect("static regex");

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("scenario.name", &self.scenario.name)?;

        validate_positive_f64("market.spot", self.market.spot)?;
        validate_positive_f64("market.volatility", self.market.volatility)?;
        validate_positive_f64("market.time_to_expiry", self.market.time_to_expiry)?;

        validate_positive_number("simulation.paths", self.simulation.paths as usize, 1)?;
        if let Some(batches) = self.simulation.batches {
            validate_range("simulation.batches", batches, 1, MAX_BATCHES)?;
        }
        if let Some(percent) = self.simulation.confidence_level {
            validate_confidence_level("simulation.confidence_level", percent)?;
        }

        validate_path("output.path", &self.output.path)?;

        if self.instruments.is_empty() {
            return Err(PricingError::ConfigValidationError {
                field: "instruments".to_string(),
                message: "At least one instrument is required".to_string(),
            });
        }

        let mut labels = HashSet::new();
        for instrument in &self.instruments {
            validate_non_empty_string("instruments.label", &instrument.label)?;
            if !labels.insert(instrument.label.as_str()) {
                return Err(PricingError::ConfigValidationError {
                    field: "instruments".to_string(),
                    message: format!("Duplicate instrument label: {}", instrument.label),
                });
            }

            validate_positive_f64(
                &format!("instruments.{}.strike", instrument.label),
                instrument.strike,
            )?;
            if let Some(barrier) = instrument.barrier {
                validate_positive_f64(
                    &format!("instruments.{}.barrier", instrument.label),
                    barrier,
                )?;
            }
            if let Some(steps) = instrument.steps {
                validate_positive_number(
                    &format!("instruments.{}.steps", instrument.label),
                    steps,
                    1,
                )?;
            }

            // Catches unknown kinds/styles and missing barrier/trigger/steps
            instrument.to_spec()?;
        }

        Ok(())
    }

    pub fn confidence_level(&self) -> ConfidenceLevel {
        self.simulation
            .confidence_level
            .and_then(ConfidenceLevel::from_percent)
            .unwrap_or(ConfidenceLevel::NinetyFive)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for ScenarioConfig {
    fn market(&self) -> MarketData {
        MarketData {
            spot: self.market.spot,
            volatility: self.market.volatility,
            risk_free_rate: self.market.risk_free_rate,
            time_to_expiry: self.market.time_to_expiry,
        }
    }

    fn simulation(&self) -> SimulationSettings {
        SimulationSettings {
            paths: self.simulation.paths,
            confidence: self.confidence_level(),
            seed: self.simulation.seed,
            batches: self.simulation.batches.unwrap_or(4),
        }
    }

    fn instruments(&self) -> Result<Vec<InstrumentSpec>> {
        self.instruments.iter().map(|i| i.to_spec()).collect()
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn charts_enabled(&self) -> bool {
        self.output.charts.unwrap_or(true)
    }

    fn archive_enabled(&self) -> bool {
        self.output.archive.unwrap_or(false)
    }
}

impl Validate for ScenarioConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC_SCENARIO: &str = r#"
[scenario]
name = "vanilla-suite"
description = "European options only"
version = "1.0"

[market]
spot = 100.0
volatility = 0.2
risk_free_rate = 0.05
time_to_expiry = 1.0

[simulation]
paths = 10000
seed = 42

[[instruments]]
label = "European Call"
kind = "call"
style = "european"
strike = 100.0

[[instruments]]
label = "Knock-Out Call"
kind = "call"
style = "barrier"
strike = 100.0
barrier = 120.0
trigger = "knock_out"

[[instruments]]
label = "Asian Put"
kind = "put"
style = "asian"
strike = 100.0
steps = 252

[output]
path = "./scenario-output"
charts = false
"#;

    #[test]
    fn test_parse_basic_scenario() {
        let config = ScenarioConfig::from_toml_str(BASIC_SCENARIO).unwrap();

        assert_eq!(config.scenario.name, "vanilla-suite");
        assert_eq!(config.simulation.paths, 10_000);
        assert!(config.validate().is_ok());

        let specs = ConfigProvider::instruments(&config).unwrap();
        assert_eq!(specs.len(), 3);
        assert_eq!(
            specs[1].style,
            ExerciseStyle::Barrier {
                level: 120.0,
                trigger: BarrierTrigger::KnockOut
            }
        );
        assert_eq!(specs[2].style, ExerciseStyle::Asian { steps: 252 });
        assert!(!config.charts_enabled());
        assert!(!config.archive_enabled());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_SCENARIO_OUTPUT", "./env-output");

        let toml_content = BASIC_SCENARIO.replace("./scenario-output", "${TEST_SCENARIO_OUTPUT}");
        let config = ScenarioConfig::from_toml_str(&toml_content).unwrap();
        assert_eq!(config.output.path, "./env-output");

        std::env::remove_var("TEST_SCENARIO_OUTPUT");
    }

    #[test]
    fn test_validation_rejects_excessive_batches() {
        let toml_content = BASIC_SCENARIO.replace("seed = 42", "seed = 42\nbatches = 1000");
        let config = ScenarioConfig::from_toml_str(&toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_negative_volatility() {
        let toml_content = BASIC_SCENARIO.replace("volatility = 0.2", "volatility = -0.2");
        let config = ScenarioConfig::from_toml_str(&toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_barrier_without_level_is_rejected() {
        let toml_content = BASIC_SCENARIO.replace("barrier = 120.0\n", "");
        let config = ScenarioConfig::from_toml_str(&toml_content).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, PricingError::MissingConfigError { .. }));
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let toml_content = BASIC_SCENARIO.replace(r#"kind = "put""#, r#"kind = "straddle""#);
        let config = ScenarioConfig::from_toml_str(&toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_labels_are_rejected() {
        let toml_content = BASIC_SCENARIO.replace("Knock-Out Call", "European Call");
        let config = ScenarioConfig::from_toml_str(&toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC_SCENARIO.as_bytes()).unwrap();

        let config = ScenarioConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.scenario.name, "vanilla-suite");
        assert_eq!(config.simulation.seed, Some(42));
    }
}
