/// Data model for Monte Carlo estimation
///
/// These types enforce validation at construction time: a `SamplingRule` only
/// exists with at least one valid column, a `TrialBatch` only exists with
/// exactly the requested number of rows, and an `EstimationResult` always
/// holds `successes <= trials` and a probability in [0, 1].

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::errors::{InvalidParameterError, Result};

/// A declared distribution for one column of a trial row
///
/// Fields are public so rules can be deserialized from configuration;
/// `validate()` is the gate every sampler goes through before drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Distribution {
    /// Uniform integer on the half-open range [low, high)
    UniformInt { low: i64, high: i64 },
    /// Uniform real on the half-open range [low, high)
    UniformReal { low: f64, high: f64 },
    /// Finite labeled set; uniform when `weights` is `None`
    Categorical {
        labels: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        weights: Option<Vec<f64>>,
    },
    /// Normal distribution
    Gaussian { mean: f64, std_dev: f64 },
}

impl Distribution {
    pub fn uniform_int(low: i64, high: i64) -> Result<Self> {
        let dist = Self::UniformInt { low, high };
        dist.validate()?;
        Ok(dist)
    }

    pub fn uniform_real(low: f64, high: f64) -> Result<Self> {
        let dist = Self::UniformReal { low, high };
        dist.validate()?;
        Ok(dist)
    }

    /// Uniform categorical distribution over `labels`
    pub fn categorical<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dist = Self::Categorical {
            labels: labels.into_iter().map(Into::into).collect(),
            weights: None,
        };
        dist.validate()?;
        Ok(dist)
    }

    /// Weighted categorical distribution; weights must already sum to 1
    pub fn weighted<I, S>(labels: I, weights: Vec<f64>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dist = Self::Categorical {
            labels: labels.into_iter().map(Into::into).collect(),
            weights: Some(weights),
        };
        dist.validate()?;
        Ok(dist)
    }

    /// Weighted categorical distribution from raw counts (e.g. balls per colour)
    ///
    /// Counts are normalized into weights. A zero total is rejected.
    pub fn from_counts<S: Into<String>>(counts: Vec<(S, u64)>) -> Result<Self> {
        let total: u64 = counts.iter().map(|(_, count)| *count).sum();
        if total == 0 {
            return Err(InvalidParameterError::out_of_domain(
                "counts",
                "at least one category needs a positive count",
            ));
        }
        let (labels, weights): (Vec<String>, Vec<f64>) = counts
            .into_iter()
            .map(|(label, count)| (label.into(), count as f64 / total as f64))
            .unzip();
        Self::weighted(labels, weights)
    }

    pub fn gaussian(mean: f64, std_dev: f64) -> Result<Self> {
        let dist = Self::Gaussian { mean, std_dev };
        dist.validate()?;
        Ok(dist)
    }

    /// Check that the parameters define a non-degenerate distribution
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::UniformInt { low, high } => {
                if low >= high {
                    return Err(InvalidParameterError::EmptyIntRange {
                        low: *low,
                        high: *high,
                    });
                }
            }
            Self::UniformReal { low, high } => {
                if !low.is_finite() || !high.is_finite() || low >= high {
                    return Err(InvalidParameterError::EmptyRealRange {
                        low: *low,
                        high: *high,
                    });
                }
            }
            Self::Categorical { labels, weights } => {
                if labels.is_empty() {
                    return Err(InvalidParameterError::NoCategories);
                }
                if let Some(weights) = weights {
                    validate_weights(weights, labels.len())?;
                }
            }
            Self::Gaussian { mean, std_dev } => {
                if !mean.is_finite() || !std_dev.is_finite() || *std_dev <= 0.0 {
                    return Err(InvalidParameterError::InvalidGaussian {
                        mean: *mean,
                        std_dev: *std_dev,
                    });
                }
            }
        }
        Ok(())
    }

    /// Label of a categorical outcome, if this is a categorical distribution
    pub fn label(&self, index: usize) -> Option<&str> {
        match self {
            Self::Categorical { labels, .. } => labels.get(index).map(String::as_str),
            _ => None,
        }
    }

    /// Index of a categorical label, if present
    pub fn index_of(&self, label: &str) -> Option<usize> {
        match self {
            Self::Categorical { labels, .. } => labels.iter().position(|l| l == label),
            _ => None,
        }
    }
}

fn validate_weights(weights: &[f64], categories: usize) -> Result<()> {
    if weights.len() != categories {
        return Err(InvalidParameterError::WeightCountMismatch {
            weights: weights.len(),
            categories,
        });
    }
    for (index, weight) in weights.iter().enumerate() {
        if !weight.is_finite() || *weight < 0.0 {
            return Err(InvalidParameterError::InvalidWeight {
                index,
                weight: *weight,
            });
        }
    }
    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(InvalidParameterError::WeightsNotNormalized {
            sum,
            tolerance: WEIGHT_SUM_TOLERANCE,
        });
    }
    Ok(())
}

/// How one trial row is drawn: one distribution per column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamplingRule {
    columns: Vec<Distribution>,
}

impl SamplingRule {
    pub fn new(columns: Vec<Distribution>) -> Result<Self> {
        if columns.is_empty() {
            return Err(InvalidParameterError::EmptyRule);
        }
        check_width(columns.len())?;
        for column in &columns {
            column.validate()?;
        }
        Ok(Self { columns })
    }

    /// One draw per trial
    pub fn single(dist: Distribution) -> Result<Self> {
        Self::new(vec![dist])
    }

    /// `width` independent draws of the same distribution per trial
    ///
    /// The width is checked before the columns are allocated.
    pub fn repeat(dist: Distribution, width: usize) -> Result<Self> {
        check_width(width)?;
        Self::new(vec![dist; width])
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Distribution] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Result<&Distribution> {
        self.columns
            .get(index)
            .ok_or(InvalidParameterError::ColumnOutOfBounds {
                column: index,
                width: self.columns.len(),
            })
    }
}

fn check_width(width: usize) -> Result<()> {
    if width > MAX_BATCH_SAMPLES {
        return Err(InvalidParameterError::RuleTooWide {
            width,
            max: MAX_BATCH_SAMPLES,
        });
    }
    Ok(())
}

/// One elementary draw
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sample {
    Int(i64),
    Real(f64),
    /// Index into the column's categorical labels
    Category(usize),
}

impl Sample {
    /// Integer value; categorical indices count as integers
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Category(index) => i64::try_from(*index).ok(),
            Self::Real(_) => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Int(value) => *value as f64,
            Self::Real(value) => *value,
            Self::Category(index) => *index as f64,
        }
    }

    pub fn category(&self) -> Option<usize> {
        match self {
            Self::Category(index) => Some(*index),
            _ => None,
        }
    }
}

/// An ordered batch of i.i.d. trial rows
///
/// Only the estimator creates batches, so a batch always holds exactly the
/// requested number of rows (never zero) of exactly `width` samples each.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialBatch {
    width: usize,
    samples: Vec<Sample>,
}

impl TrialBatch {
    pub(crate) fn from_samples(width: usize, samples: Vec<Sample>) -> Self {
        debug_assert!(width > 0 && !samples.is_empty() && samples.len() % width == 0);
        Self { width, samples }
    }

    /// Number of trials (rows)
    pub fn len(&self) -> usize {
        self.samples.len() / self.width
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Draws per trial
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[Sample]> + '_ {
        self.samples.chunks_exact(self.width)
    }

    pub fn row(&self, index: usize) -> Option<&[Sample]> {
        let start = index.checked_mul(self.width)?;
        let end = start.checked_add(self.width)?;
        self.samples.get(start..end)
    }

    pub fn column(&self, index: usize) -> Result<impl Iterator<Item = Sample> + '_> {
        if index >= self.width {
            return Err(InvalidParameterError::ColumnOutOfBounds {
                column: index,
                width: self.width,
            });
        }
        Ok(self.rows().map(move |row| row[index]))
    }

    /// Flat view of every sample in row-major order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
}

/// Supported confidence levels for the normal-approximation margin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Ninety,
    NinetyFive,
}

impl ConfidenceLevel {
    pub fn z_score(&self) -> f64 {
        match self {
            Self::Ninety => Z_SCORE_90,
            Self::NinetyFive => Z_SCORE_95,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Ninety => 0.90,
            Self::NinetyFive => 0.95,
        }
    }
}

impl Default for ConfidenceLevel {
    fn default() -> Self {
        Self::NinetyFive
    }
}

impl TryFrom<f64> for ConfidenceLevel {
    type Error = InvalidParameterError;

    fn try_from(value: f64) -> Result<Self> {
        if (value - 0.95).abs() < CONFIDENCE_LEVEL_TOLERANCE {
            Ok(Self::NinetyFive)
        } else if (value - 0.90).abs() < CONFIDENCE_LEVEL_TOLERANCE {
            Ok(Self::Ninety)
        } else {
            Err(InvalidParameterError::UnsupportedConfidence(value))
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.0}%", self.as_f64() * 100.0)
    }
}

/// Margin of a normal-approximation interval: z * sqrt(p(1-p)/n)
pub fn confidence_margin(probability: f64, trials: usize, confidence: f64) -> Result<f64> {
    let level = ConfidenceLevel::try_from(confidence)?;
    margin_for(probability, trials, level)
}

pub(crate) fn margin_for(probability: f64, trials: usize, level: ConfidenceLevel) -> Result<f64> {
    if trials == 0 {
        return Err(InvalidParameterError::ZeroTrials);
    }
    if !(0.0..=1.0).contains(&probability) {
        return Err(InvalidParameterError::ProbabilityOutOfRange(probability));
    }
    Ok(level.z_score() * (probability * (1.0 - probability) / trials as f64).sqrt())
}

/// Outcome of reducing one batch with one predicate
///
/// Immutable once built; the `with_*` methods consume and return a new value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimationResult {
    trials: usize,
    successes: usize,
    probability: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    theoretical: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_margin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    confidence: Option<ConfidenceLevel>,
}

impl EstimationResult {
    /// Build from raw counts; `successes` is clamped to `trials`
    pub fn from_counts(trials: usize, successes: usize) -> Self {
        let successes = successes.min(trials);
        let probability = if trials == 0 {
            0.0
        } else {
            successes as f64 / trials as f64
        };
        Self {
            trials,
            successes,
            probability,
            theoretical: None,
            error_margin: None,
            confidence: None,
        }
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    pub fn successes(&self) -> usize {
        self.successes
    }

    pub fn failures(&self) -> usize {
        self.trials - self.successes
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn theoretical(&self) -> Option<f64> {
        self.theoretical
    }

    pub fn error_margin(&self) -> Option<f64> {
        self.error_margin
    }

    pub fn confidence(&self) -> Option<ConfidenceLevel> {
        self.confidence
    }

    /// Attach the closed-form reference probability
    pub fn with_theoretical(mut self, theoretical: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&theoretical) {
            return Err(InvalidParameterError::ProbabilityOutOfRange(theoretical));
        }
        self.theoretical = Some(theoretical);
        Ok(self)
    }

    /// Attach the normal-approximation margin at `level`
    pub fn with_confidence(mut self, level: ConfidenceLevel) -> Result<Self> {
        self.error_margin = Some(margin_for(self.probability, self.trials, level)?);
        self.confidence = Some(level);
        Ok(self)
    }

    /// |estimate - theoretical|, when a reference is attached
    pub fn absolute_error(&self) -> Option<f64> {
        self.theoretical.map(|t| (self.probability - t).abs())
    }

    /// Interval [p - margin, p + margin] clamped to [0, 1]
    pub fn interval(&self) -> Option<(f64, f64)> {
        self.error_margin.map(|m| {
            (
                (self.probability - m).max(0.0),
                (self.probability + m).min(1.0),
            )
        })
    }

    /// Whether the theoretical value lies within the confidence margin
    pub fn covers_theoretical(&self) -> Option<bool> {
        match (self.theoretical, self.error_margin) {
            (Some(t), Some(m)) => Some((self.probability - t).abs() <= m),
            _ => None,
        }
    }

    /// Derived estimate `factor * p`, e.g. pi = 4 * P(inside circle)
    pub fn scaled(&self, factor: f64) -> ScaledEstimate {
        ScaledEstimate {
            value: self.probability * factor,
            error_margin: self.error_margin.map(|m| m * factor.abs()),
        }
    }
}

/// A quantity derived linearly from an empirical probability
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaledEstimate {
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_margin: Option<f64>,
}
