use crate::core::stats::StatsAccumulator;
use crate::domain::model::{
    BarrierTrigger, ExerciseStyle, InstrumentSpec, MarketData, OptionKind, PriceEstimate,
    SimulationSettings,
};
use crate::utils::error::{PricingError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Upper bound on simulation worker batches. More batches than cores only
/// adds task overhead, and reseeding thousands of RNGs wastes the path
/// budget.
pub const MAX_BATCHES: usize = 256;

/// Risk-neutral GBM terminal spot for a single standard normal draw:
/// S_T = S0 * exp((r - sigma^2/2) * T + sigma * sqrt(T) * z)
pub fn terminal_spot(market: &MarketData, z: f64) -> f64 {
    let MarketData {
        spot,
        volatility,
        risk_free_rate,
        time_to_expiry,
    } = *market;
    spot * ((risk_free_rate - 0.5 * volatility * volatility) * time_to_expiry
        + volatility * time_to_expiry.sqrt() * z)
        .exp()
}

pub fn vanilla_payoff(kind: OptionKind, spot_price: f64, strike: f64) -> f64 {
    match kind {
        OptionKind::Call => (spot_price - strike).max(0.0),
        OptionKind::Put => (strike - spot_price).max(0.0),
    }
}

/// Terminal-spot barrier payoff. Knock-in and knock-out partition the vanilla
/// payoff at the barrier, so for any spot their payoffs sum to the vanilla
/// payoff.
pub fn barrier_payoff(
    kind: OptionKind,
    trigger: BarrierTrigger,
    spot_price: f64,
    strike: f64,
    level: f64,
) -> f64 {
    let triggered = match (kind, trigger) {
        (OptionKind::Call, BarrierTrigger::KnockIn) => spot_price >= level,
        (OptionKind::Call, BarrierTrigger::KnockOut) => spot_price < level,
        (OptionKind::Put, BarrierTrigger::KnockIn) => spot_price <= level,
        (OptionKind::Put, BarrierTrigger::KnockOut) => spot_price > level,
    };
    if triggered {
        vanilla_payoff(kind, spot_price, strike)
    } else {
        0.0
    }
}

/// Arithmetic average of a sampled GBM path. The starting spot is not part of
/// the average.
pub fn sample_path_average<R: Rng>(market: &MarketData, steps: usize, rng: &mut R) -> f64 {
    let dt = market.time_to_expiry / steps as f64;
    let drift = (market.risk_free_rate - 0.5 * market.volatility * market.volatility) * dt;
    let diffusion = market.volatility * dt.sqrt();

    let mut current = market.spot;
    let mut sum = 0.0;
    for _ in 0..steps {
        let z: f64 = rng.sample(StandardNormal);
        current *= (drift + diffusion * z).exp();
        sum += current;
    }
    sum / steps as f64
}

/// Draw one path for the instrument and evaluate its (undiscounted) payoff.
pub fn sample_payoff<R: Rng>(
    market: &MarketData,
    instrument: &InstrumentSpec,
    rng: &mut R,
) -> f64 {
    match instrument.style {
        ExerciseStyle::European => {
            let z: f64 = rng.sample(StandardNormal);
            vanilla_payoff(instrument.kind, terminal_spot(market, z), instrument.strike)
        }
        ExerciseStyle::Barrier { level, trigger } => {
            let z: f64 = rng.sample(StandardNormal);
            barrier_payoff(
                instrument.kind,
                trigger,
                terminal_spot(market, z),
                instrument.strike,
                level,
            )
        }
        ExerciseStyle::Asian { steps } => {
            let average = sample_path_average(market, steps, rng);
            vanilla_payoff(instrument.kind, average, instrument.strike)
        }
    }
}

pub struct MonteCarloEngine {
    market: MarketData,
    settings: SimulationSettings,
}

impl MonteCarloEngine {
    pub fn new(market: MarketData, settings: SimulationSettings) -> Self {
        Self { market, settings }
    }

    /// Price one instrument: simulate the configured number of paths split
    /// across blocking worker tasks, then discount and attach the confidence
    /// interval.
    pub async fn price(&self, instrument: &InstrumentSpec) -> Result<PriceEstimate> {
        let chunks = split_paths(self.settings.paths, self.settings.batches);
        tracing::debug!(
            "Simulating {} paths in {} batches for '{}'",
            self.settings.paths,
            chunks.len(),
            instrument.label
        );

        let mut handles = Vec::with_capacity(chunks.len());
        for (batch_index, batch_paths) in chunks.into_iter().enumerate() {
            let market = self.market;
            let instrument = instrument.clone();
            let seed = self.settings.seed;

            handles.push(tokio::task::spawn_blocking(move || {
                let mut rng = match seed {
                    Some(s) => StdRng::seed_from_u64(s.wrapping_add(batch_index as u64)),
                    None => StdRng::from_entropy(),
                };
                let mut acc = StatsAccumulator::new();
                for _ in 0..batch_paths {
                    acc.add(sample_payoff(&market, &instrument, &mut rng));
                }
                acc
            }));
        }

        let mut acc = StatsAccumulator::new();
        for handle in handles {
            let partial = handle.await.map_err(|e| PricingError::SimulationError {
                message: format!("simulation worker panicked: {}", e),
            })?;
            acc.merge(&partial);
        }

        Ok(self.estimate_from(&acc))
    }

    /// Discount the payoff statistics and build the interval on the
    /// discounted scale, so the bounds always bracket the price.
    fn estimate_from(&self, acc: &StatsAccumulator) -> PriceEstimate {
        let discount = (-self.market.risk_free_rate * self.market.time_to_expiry).exp();
        let price = discount * acc.mean();
        let std_error = if acc.count() > 0 {
            discount * acc.std_dev() / (acc.count() as f64).sqrt()
        } else {
            0.0
        };
        let margin = self.settings.confidence.z_score() * std_error;

        PriceEstimate {
            price,
            ci_lower: price - margin,
            ci_upper: price + margin,
            std_error,
        }
    }
}

/// Split `paths` into `batches` chunks, dropping empty chunks when there are
/// more batches than paths.
fn split_paths(paths: u64, batches: usize) -> Vec<u64> {
    let batches = batches.max(1) as u64;
    let base = paths / batches;
    let remainder = paths % batches;
    (0..batches)
        .map(|i| base + u64::from(i < remainder))
        .filter(|&n| n > 0)
        .collect()
}
