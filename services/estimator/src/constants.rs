/// Shared constants for the Monte Carlo estimator
///
/// This module centralizes the numeric defaults and tolerances used by the
/// estimator and by the scenario runner, so both sides agree on them.

/// Default minimum trial count for a scenario run
///
/// Rationale: below this, the 95% margin for a mid-range probability is wider
/// than ±0.003 and the printed estimates stop being stable to three decimals.
pub const DEFAULT_MIN_TRIALS: usize = 100_000;

/// Tolerance applied when checking that categorical weights sum to 1
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Tolerance used when matching a requested confidence level (0.90 / 0.95)
pub const CONFIDENCE_LEVEL_TOLERANCE: f64 = 1e-9;

/// z-score for a two-sided 90% normal interval
pub const Z_SCORE_90: f64 = 1.64;

/// z-score for a two-sided 95% normal interval
pub const Z_SCORE_95: f64 = 1.96;

/// Upper bound on samples held by a single batch (rows x columns)
///
/// Rationale: one `Sample` is 16 bytes, so this caps a batch at ~3.2 GB.
/// Anything larger is almost certainly a typo in the trial count.
pub const MAX_BATCH_SAMPLES: usize = 200_000_000;
