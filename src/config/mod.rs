pub mod cli;
pub mod scenario;

#[cfg(feature = "cli")]
use crate::core::simulation::MAX_BATCHES;
#[cfg(feature = "cli")]
use crate::domain::model::{
    BarrierTrigger, ConfidenceLevel, ExerciseStyle, InstrumentSpec, MarketData, OptionKind,
    SimulationSettings,
};
#[cfg(feature = "cli")]
use crate::domain::ports::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{
    self, validate_confidence_level, validate_path, validate_positive_f64,
    validate_positive_number, validate_range,
};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

/// Flag-driven configuration for the classic six-instrument pricing suite:
/// European call/put, knock-in/knock-out call at the barrier, Asian call/put.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "mc-pricer")]
#[command(about = "Monte Carlo option pricing with confidence intervals and charts")]
pub struct CliConfig {
    #[arg(long, default_value = "100.0")]
    pub strike: f64,

    #[arg(long, default_value = "100.0")]
    pub spot: f64,

    #[arg(long, default_value = "0.2")]
    pub volatility: f64,

    #[arg(long, default_value = "1.0")]
    pub time_to_expiry: f64,

    #[arg(long, default_value = "0.05")]
    pub risk_free_rate: f64,

    #[arg(long, default_value = "100000")]
    pub paths: u64,

    /// Daily steps over one year for the Asian averages
    #[arg(long, default_value = "252")]
    pub time_steps: usize,

    #[arg(long, default_value = "120.0")]
    pub barrier: f64,

    #[arg(long, default_value = "95", help = "Confidence level in percent (90, 95 or 99)")]
    pub confidence_level: u32,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, help = "Fixed RNG seed for reproducible runs")]
    pub seed: Option<u64>,

    #[arg(long, default_value = "4", help = "Number of simulation worker batches")]
    pub batches: usize,

    #[arg(long, help = "Skip chart rendering")]
    pub no_charts: bool,

    #[arg(long, help = "Bundle the reports into a ZIP archive")]
    pub archive: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Enable system monitoring")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn market(&self) -> MarketData {
        MarketData {
            spot: self.spot,
            volatility: self.volatility,
            risk_free_rate: self.risk_free_rate,
            time_to_expiry: self.time_to_expiry,
        }
    }

    fn simulation(&self) -> SimulationSettings {
        SimulationSettings {
            paths: self.paths,
            // Validated before the run starts
            confidence: ConfidenceLevel::from_percent(self.confidence_level)
                .unwrap_or(ConfidenceLevel::NinetyFive),
            seed: self.seed,
            batches: self.batches,
        }
    }

    fn instruments(&self) -> Result<Vec<InstrumentSpec>> {
        let suite = [
            ("European Call", OptionKind::Call, ExerciseStyle::European),
            ("European Put", OptionKind::Put, ExerciseStyle::European),
            (
                "Knock-In Call",
                OptionKind::Call,
                ExerciseStyle::Barrier {
                    level: self.barrier,
                    trigger: BarrierTrigger::KnockIn,
                },
            ),
            (
                "Knock-Out Call",
                OptionKind::Call,
                ExerciseStyle::Barrier {
                    level: self.barrier,
                    trigger: BarrierTrigger::KnockOut,
                },
            ),
            (
                "Asian Call",
                OptionKind::Call,
                ExerciseStyle::Asian {
                    steps: self.time_steps,
                },
            ),
            (
                "Asian Put",
                OptionKind::Put,
                ExerciseStyle::Asian {
                    steps: self.time_steps,
                },
            ),
        ];

        Ok(suite
            .into_iter()
            .map(|(label, kind, style)| InstrumentSpec {
                label: label.to_string(),
                kind,
                style,
                strike: self.strike,
            })
            .collect())
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn charts_enabled(&self) -> bool {
        !self.no_charts
    }

    fn archive_enabled(&self) -> bool {
        self.archive
    }
}

#[cfg(feature = "cli")]
impl validation::Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_positive_f64("strike", self.strike)?;
        validate_positive_f64("spot", self.spot)?;
        validate_positive_f64("volatility", self.volatility)?;
        validate_positive_f64("time_to_expiry", self.time_to_expiry)?;
        validate_positive_f64("barrier", self.barrier)?;
        validate_positive_number("paths", self.paths as usize, 1)?;
        validate_positive_number("time_steps", self.time_steps, 1)?;
        validate_range("batches", self.batches, 1, MAX_BATCHES)?;
        validate_confidence_level("confidence_level", self.confidence_level)?;
        validate_path("output_path", &self.output_path)?;
        Ok(())
    }
}
