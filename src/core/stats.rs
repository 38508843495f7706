/// Running sum / sum-of-squares accumulator for payoff samples.
///
/// Worker batches each keep their own accumulator and the partials are merged
/// afterwards, so a run never has to hold every payoff in memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsAccumulator {
    count: u64,
    sum: f64,
    sum_sq: f64,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, sample: f64) {
        self.count += 1;
        self.sum += sample;
        self.sum_sq += sample * sample;
    }

    pub fn merge(&mut self, other: &StatsAccumulator) {
        self.count += other.count;
        self.sum += other.sum;
        self.sum_sq += other.sum_sq;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }

    /// Sample variance with the n-1 divisor. Zero for fewer than two samples.
    pub fn sample_variance(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        let n = self.count as f64;
        let variance = (self.sum_sq - self.sum * self.sum / n) / (n - 1.0);
        // Rounding can push a near-zero variance slightly negative
        variance.max(0.0)
    }

    pub fn std_dev(&self) -> f64 {
        self.sample_variance().sqrt()
    }

    /// z * sd / sqrt(n), the half-width of the confidence interval.
    pub fn confidence_margin(&self, z_score: f64) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        z_score * self.std_dev() / (self.count as f64).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accumulate(samples: &[f64]) -> StatsAccumulator {
        let mut acc = StatsAccumulator::new();
        for &s in samples {
            acc.add(s);
        }
        acc
    }

    #[test]
    fn test_mean_and_variance() {
        let acc = accumulate(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(acc.count(), 8);
        assert!((acc.mean() - 5.0).abs() < 1e-12);
        // Sample variance of the classic data set is 32/7
        assert!((acc.sample_variance() - 32.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_merge_matches_single_pass() {
        let mut left = accumulate(&[1.0, 2.0, 3.0]);
        let right = accumulate(&[4.0, 5.0]);
        left.merge(&right);

        let whole = accumulate(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(left.count(), whole.count());
        assert!((left.mean() - whole.mean()).abs() < 1e-12);
        assert!((left.sample_variance() - whole.sample_variance()).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_inputs() {
        let empty = StatsAccumulator::new();
        assert_eq!(empty.mean(), 0.0);
        assert_eq!(empty.sample_variance(), 0.0);
        assert_eq!(empty.confidence_margin(1.96), 0.0);

        let single = accumulate(&[3.5]);
        assert_eq!(single.sample_variance(), 0.0);
        assert!((single.mean() - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_constant_samples_have_zero_margin() {
        let acc = accumulate(&[7.0; 100]);
        assert_eq!(acc.std_dev(), 0.0);
        assert_eq!(acc.confidence_margin(2.576), 0.0);
    }
}
