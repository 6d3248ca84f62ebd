//! Generic Monte Carlo estimator
//!
//! `generate` draws a batch of i.i.d. rows from a `SamplingRule`, `reduce`
//! counts the rows a predicate accepts. The generator state is owned by the
//! `Estimator` value the caller builds, so reproducibility depends only on
//! the seed the caller passes in.

use rand::distributions::{Distribution as _, Uniform, WeightedIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::MAX_BATCH_SAMPLES;
use crate::errors::{InvalidParameterError, Result};
use crate::types::{Distribution, EstimationResult, Sample, SamplingRule, TrialBatch};

/// Where the generator state comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seed {
    /// Reproducible: identical parameters give bit-identical results
    Fixed(u64),
    /// Seeded from OS entropy
    Entropy,
}

impl From<Option<u64>> for Seed {
    fn from(seed: Option<u64>) -> Self {
        seed.map_or(Seed::Entropy, Seed::Fixed)
    }
}

impl std::fmt::Display for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Seed::Fixed(seed) => write!(f, "{}", seed),
            Seed::Entropy => write!(f, "entropy"),
        }
    }
}

/// Runs trial batches against a caller-owned random generator
pub struct Estimator<R = ChaCha8Rng> {
    rng: R,
}

impl Estimator<ChaCha8Rng> {
    pub fn new(seed: Seed) -> Self {
        let rng = match seed {
            Seed::Fixed(seed) => ChaCha8Rng::seed_from_u64(seed),
            Seed::Entropy => ChaCha8Rng::from_entropy(),
        };
        Self { rng }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(Seed::Fixed(seed))
    }
}

impl<R: Rng> Estimator<R> {
    /// Use an existing generator, e.g. one shared across a test
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Draw `n` rows according to `rule`
    ///
    /// All parameters are checked before the first draw, so on error no
    /// generator state has been consumed and no partial batch exists.
    pub fn generate(&mut self, rule: &SamplingRule, n: usize) -> Result<TrialBatch> {
        if n == 0 {
            return Err(InvalidParameterError::ZeroTrials);
        }
        let width = rule.width();
        let total = n
            .checked_mul(width)
            .filter(|total| *total <= MAX_BATCH_SAMPLES)
            .ok_or(InvalidParameterError::BatchTooLarge {
                rows: n,
                width,
                max: MAX_BATCH_SAMPLES,
            })?;

        let samplers = rule
            .columns()
            .iter()
            .map(ColumnSampler::compile)
            .collect::<Result<Vec<_>>>()?;

        let mut samples = Vec::with_capacity(total);
        for _ in 0..n {
            for sampler in &samplers {
                samples.push(sampler.draw(&mut self.rng));
            }
        }

        debug!(trials = n, width, "Trial batch generated");
        Ok(TrialBatch::from_samples(width, samples))
    }

    /// `generate` followed by `reduce`
    pub fn estimate<P>(&mut self, rule: &SamplingRule, n: usize, predicate: P) -> Result<EstimationResult>
    where
        P: Fn(&[Sample]) -> bool,
    {
        let batch = self.generate(rule, n)?;
        Ok(reduce(&batch, predicate))
    }

    pub(crate) fn rng(&mut self) -> &mut R {
        &mut self.rng
    }
}

/// Count the rows `predicate` accepts
pub fn reduce<P>(batch: &TrialBatch, predicate: P) -> EstimationResult
where
    P: Fn(&[Sample]) -> bool,
{
    let successes = batch.rows().filter(|row| predicate(row)).count();
    let result = EstimationResult::from_counts(batch.len(), successes);
    debug!(
        trials = result.trials(),
        successes = result.successes(),
        probability = result.probability(),
        "Trial batch reduced"
    );
    result
}

/// Conditional share: among rows accepted by `given`, how many `event` accepts
///
/// The result's `trials` is the number of rows matching `given`; if none
/// match, the probability is 0.
pub fn reduce_given<G, E>(batch: &TrialBatch, given: G, event: E) -> EstimationResult
where
    G: Fn(&[Sample]) -> bool,
    E: Fn(&[Sample]) -> bool,
{
    let (conditioned, successes) = batch
        .rows()
        .filter(|row| given(row))
        .fold((0usize, 0usize), |(total, hits), row| {
            (total + 1, hits + usize::from(event(row)))
        });
    EstimationResult::from_counts(conditioned, successes)
}

/// A validated distribution ready to draw from
enum ColumnSampler {
    Int(Uniform<i64>),
    Real(Uniform<f64>),
    Uniform(Uniform<usize>),
    Weighted(WeightedIndex<f64>),
    Gaussian(Normal<f64>),
}

impl ColumnSampler {
    fn compile(dist: &Distribution) -> Result<Self> {
        dist.validate()?;
        let sampler = match dist {
            Distribution::UniformInt { low, high } => Self::Int(Uniform::new(*low, *high)),
            Distribution::UniformReal { low, high } => Self::Real(Uniform::new(*low, *high)),
            Distribution::Categorical {
                labels,
                weights: None,
            } => Self::Uniform(Uniform::new(0, labels.len())),
            Distribution::Categorical {
                weights: Some(weights),
                ..
            } => Self::Weighted(WeightedIndex::new(weights).map_err(|e| {
                InvalidParameterError::out_of_domain("weights", e.to_string())
            })?),
            Distribution::Gaussian { mean, std_dev } => {
                Self::Gaussian(Normal::new(*mean, *std_dev).map_err(|_| {
                    InvalidParameterError::InvalidGaussian {
                        mean: *mean,
                        std_dev: *std_dev,
                    }
                })?)
            }
        };
        Ok(sampler)
    }

    fn draw<R: Rng>(&self, rng: &mut R) -> Sample {
        match self {
            Self::Int(uniform) => Sample::Int(uniform.sample(rng)),
            Self::Real(uniform) => Sample::Real(uniform.sample(rng)),
            Self::Uniform(uniform) => Sample::Category(uniform.sample(rng)),
            Self::Weighted(index) => Sample::Category(index.sample(rng)),
            Self::Gaussian(normal) => Sample::Real(normal.sample(rng)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConfidenceLevel;

    fn die() -> Distribution {
        Distribution::uniform_int(1, 7).unwrap()
    }

    #[test]
    fn test_generate_exact_length_and_support() {
        let rule = SamplingRule::repeat(die(), 3).unwrap();
        let batch = Estimator::seeded(7).generate(&rule, 5_000).unwrap();

        assert_eq!(batch.len(), 5_000);
        assert_eq!(batch.width(), 3);
        assert_eq!(batch.samples().len(), 15_000);
        assert!(batch
            .samples()
            .iter()
            .all(|s| matches!(s, Sample::Int(v) if (1..=6).contains(v))));
    }

    #[test]
    fn test_generate_rejects_zero_trials() {
        let rule = SamplingRule::single(die()).unwrap();
        assert_eq!(
            Estimator::seeded(1).generate(&rule, 0),
            Err(InvalidParameterError::ZeroTrials)
        );
    }

    #[test]
    fn test_generate_rejects_oversized_batch() {
        let rule = SamplingRule::repeat(die(), 10).unwrap();
        let err = Estimator::seeded(1).generate(&rule, usize::MAX).unwrap_err();
        assert_eq!(err.code(), "VALIDATION_BATCH_TOO_LARGE");
    }

    #[test]
    fn test_failed_validation_consumes_no_randomness() {
        let good = SamplingRule::single(die()).unwrap();
        let mut untouched = Estimator::seeded(99);
        let mut failed_first = Estimator::seeded(99);
        assert!(failed_first.generate(&good, 0).is_err());

        let a = untouched.generate(&good, 100).unwrap();
        let b = failed_first.generate(&good, 100).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_categorical_draws_indices_in_range() {
        let coin = Distribution::categorical(["Heads", "Tails"]).unwrap();
        let rule = SamplingRule::single(coin).unwrap();
        let batch = Estimator::seeded(3).generate(&rule, 1_000).unwrap();
        assert!(batch
            .samples()
            .iter()
            .all(|s| matches!(s.category(), Some(0) | Some(1))));
    }

    #[test]
    fn test_weighted_categorical_respects_zero_weight() {
        let dist = Distribution::weighted(["never", "always"], vec![0.0, 1.0]).unwrap();
        let rule = SamplingRule::single(dist).unwrap();
        let batch = Estimator::seeded(5).generate(&rule, 2_000).unwrap();
        assert!(batch.samples().iter().all(|s| s.category() == Some(1)));
    }

    #[test]
    fn test_reduce_counts_matching_rows() {
        let rule = SamplingRule::single(die()).unwrap();
        let batch = Estimator::seeded(11).generate(&rule, 10_000).unwrap();

        let always = reduce(&batch, |_| true);
        assert_eq!(always.successes(), 10_000);
        assert_eq!(always.probability(), 1.0);

        let never = reduce(&batch, |_| false);
        assert_eq!(never.successes(), 0);

        let six = reduce(&batch, |row| row[0] == Sample::Int(6));
        assert!((six.probability() - 1.0 / 6.0).abs() < 0.02);
    }

    #[test]
    fn test_reduce_given_conditions_on_subset() {
        let rule = SamplingRule::single(die()).unwrap();
        let batch = Estimator::seeded(13).generate(&rule, 60_000).unwrap();

        // P(6 | even) = 1/3
        let result = reduce_given(
            &batch,
            |row| row[0].as_i64().map_or(false, |v| v % 2 == 0),
            |row| row[0] == Sample::Int(6),
        );
        assert!(result.trials() > 25_000 && result.trials() < 35_000);
        assert!((result.probability() - 1.0 / 3.0).abs() < 0.02);

        let empty = reduce_given(&batch, |_| false, |_| true);
        assert_eq!(empty.trials(), 0);
        assert_eq!(empty.probability(), 0.0);
    }

    #[test]
    fn test_same_seed_is_bit_identical() {
        let rule = SamplingRule::repeat(Distribution::uniform_real(-1.0, 1.0).unwrap(), 2).unwrap();
        let inside = |row: &[Sample]| {
            let (x, y) = (row[0].as_f64(), row[1].as_f64());
            x * x + y * y <= 1.0
        };

        let a = Estimator::seeded(2024)
            .estimate(&rule, 20_000, inside)
            .unwrap()
            .with_confidence(ConfidenceLevel::NinetyFive)
            .unwrap();
        let b = Estimator::seeded(2024)
            .estimate(&rule, 20_000, inside)
            .unwrap()
            .with_confidence(ConfidenceLevel::NinetyFive)
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.probability().to_bits(), b.probability().to_bits());

        let c = Estimator::seeded(2025).estimate(&rule, 20_000, inside).unwrap();
        assert_ne!(a.successes(), c.successes());
    }

    #[test]
    fn test_with_rng_accepts_any_generator() {
        use rand::rngs::StdRng;
        let rule = SamplingRule::single(die()).unwrap();
        let mut estimator = Estimator::with_rng(StdRng::seed_from_u64(1));
        assert_eq!(estimator.generate(&rule, 10).unwrap().len(), 10);
    }

    #[test]
    fn test_seed_from_option() {
        assert_eq!(Seed::from(Some(4)), Seed::Fixed(4));
        assert_eq!(Seed::from(None), Seed::Entropy);
        assert_eq!(Seed::Fixed(4).to_string(), "4");
    }
}
