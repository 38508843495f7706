use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    Call,
    Put,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarrierTrigger {
    KnockIn,
    KnockOut,
}

/// How the payoff is read off the simulated spot.
///
/// Barrier options check the terminal spot against the barrier level only;
/// the path in between is not monitored. Asian options average the sampled
/// path points (the starting spot is not part of the average).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseStyle {
    European,
    Barrier {
        level: f64,
        trigger: BarrierTrigger,
    },
    Asian {
        steps: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentSpec {
    pub label: String,
    pub kind: OptionKind,
    pub style: ExerciseStyle,
    pub strike: f64,
}

/// Risk-neutral market parameters shared by every instrument in a run.
/// Rates and volatility are annualized; time to expiry is in years.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MarketData {
    pub spot: f64,
    pub volatility: f64,
    pub risk_free_rate: f64,
    pub time_to_expiry: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLevel {
    Ninety,
    NinetyFive,
    NinetyNine,
}

impl ConfidenceLevel {
    pub fn from_percent(percent: u32) -> Option<Self> {
        match percent {
            90 => Some(ConfidenceLevel::Ninety),
            95 => Some(ConfidenceLevel::NinetyFive),
            99 => Some(ConfidenceLevel::NinetyNine),
            _ => None,
        }
    }

    pub fn percent(&self) -> u32 {
        match self {
            ConfidenceLevel::Ninety => 90,
            ConfidenceLevel::NinetyFive => 95,
            ConfidenceLevel::NinetyNine => 99,
        }
    }

    /// Two-sided standard normal quantile for the level.
    pub fn z_score(&self) -> f64 {
        match self {
            ConfidenceLevel::Ninety => 1.645,
            ConfidenceLevel::NinetyFive => 1.960,
            ConfidenceLevel::NinetyNine => 2.576,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SimulationSettings {
    pub paths: u64,
    pub confidence: ConfidenceLevel,
    /// Fixed seed makes a run reproducible for a given batch count.
    pub seed: Option<u64>,
    /// Number of blocking worker tasks the paths are split across.
    pub batches: usize,
}

/// Discounted price estimate with its sampling error. The confidence bounds
/// always bracket the price.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriceEstimate {
    pub price: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub std_error: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingOutcome {
    pub label: String,
    pub estimate: PriceEstimate,
}

/// Output of the report phase, consumed by the load phase.
#[derive(Debug, Clone)]
pub struct ReportBundle {
    pub outcomes: Vec<PricingOutcome>,
    pub table_output: String,
    pub csv_output: String,
    pub report_json: String,
}
