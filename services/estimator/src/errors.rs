/// Error types for the Monte Carlo estimator
///
/// Design:
/// - One error kind only: invalid parameters. Sampling and reduction are total
///   once their inputs validate, so nothing else can fail.
/// - Every variant carries the offending values for debugging.
/// - Every variant maps to a stable machine code (`code()`), following the
///   `<CATEGORY>_<SPECIFIC>` pattern, so callers can branch without matching
///   on message text.
///
/// Validation always happens before the first draw; a failed call never
/// exposes a partial batch.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidParameterError {
    #[error("Trial count must be a positive integer, got 0")]
    ZeroTrials,

    #[error("Batch too large: {rows} rows x {width} columns exceeds {max} samples")]
    BatchTooLarge { rows: usize, width: usize, max: usize },

    #[error("Empty integer range: low {low} must be below high {high}")]
    EmptyIntRange { low: i64, high: i64 },

    #[error("Empty real range: low {low} must be below high {high} (both finite)")]
    EmptyRealRange { low: f64, high: f64 },

    #[error("Categorical distribution has no categories")]
    NoCategories,

    #[error("Weight count {weights} does not match category count {categories}")]
    WeightCountMismatch { weights: usize, categories: usize },

    #[error("Invalid weight {weight} at index {index}")]
    InvalidWeight { index: usize, weight: f64 },

    #[error("Weights sum to {sum}, expected 1 within {tolerance}")]
    WeightsNotNormalized { sum: f64, tolerance: f64 },

    #[error("Gaussian parameters invalid: mean {mean}, std_dev {std_dev}")]
    InvalidGaussian { mean: f64, std_dev: f64 },

    #[error("Sampling rule has no columns")]
    EmptyRule,

    #[error("Sampling rule has {width} columns, at most {max} allowed")]
    RuleTooWide { width: usize, max: usize },

    #[error("Column {column} out of bounds for row width {width}")]
    ColumnOutOfBounds { column: usize, width: usize },

    #[error("Column {column} holds real values; discrete frequencies need integer or categorical samples")]
    NonDiscreteColumn { column: usize },

    #[error("Unsupported confidence level {0}; expected 0.90 or 0.95")]
    UnsupportedConfidence(f64),

    #[error("Probability {0} outside [0, 1]")]
    ProbabilityOutOfRange(f64),

    #[error("Barriers must satisfy lower < start < upper (lower {lower}, start {start}, upper {upper})")]
    BarrierOrder { lower: f64, start: f64, upper: f64 },

    #[error("Walk step budget must be positive")]
    ZeroSteps,

    #[error("Parameter `{name}` out of domain: {reason}")]
    OutOfDomain { name: &'static str, reason: String },
}

impl InvalidParameterError {
    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::ZeroTrials => "VALIDATION_ZERO_TRIALS",
            Self::BatchTooLarge { .. } => "VALIDATION_BATCH_TOO_LARGE",
            Self::EmptyIntRange { .. } => "VALIDATION_EMPTY_INT_RANGE",
            Self::EmptyRealRange { .. } => "VALIDATION_EMPTY_REAL_RANGE",
            Self::NoCategories => "VALIDATION_NO_CATEGORIES",
            Self::WeightCountMismatch { .. } => "VALIDATION_WEIGHT_COUNT_MISMATCH",
            Self::InvalidWeight { .. } => "VALIDATION_INVALID_WEIGHT",
            Self::WeightsNotNormalized { .. } => "VALIDATION_WEIGHTS_NOT_NORMALIZED",
            Self::InvalidGaussian { .. } => "VALIDATION_INVALID_GAUSSIAN",
            Self::EmptyRule => "VALIDATION_EMPTY_RULE",
            Self::RuleTooWide { .. } => "VALIDATION_RULE_TOO_WIDE",
            Self::ColumnOutOfBounds { .. } => "VALIDATION_COLUMN_OUT_OF_BOUNDS",
            Self::NonDiscreteColumn { .. } => "VALIDATION_NON_DISCRETE_COLUMN",
            Self::UnsupportedConfidence(_) => "VALIDATION_UNSUPPORTED_CONFIDENCE",
            Self::ProbabilityOutOfRange(_) => "VALIDATION_PROBABILITY_OUT_OF_RANGE",
            Self::BarrierOrder { .. } => "VALIDATION_BARRIER_ORDER",
            Self::ZeroSteps => "VALIDATION_ZERO_STEPS",
            Self::OutOfDomain { .. } => "VALIDATION_OUT_OF_DOMAIN",
        }
    }

    /// Shorthand for a predicate or scenario parameter outside its domain
    pub fn out_of_domain(name: &'static str, reason: impl Into<String>) -> Self {
        Self::OutOfDomain {
            name,
            reason: reason.into(),
        }
    }
}

// Convenience type alias
pub type Result<T> = std::result::Result<T, InvalidParameterError>;
