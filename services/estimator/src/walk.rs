//! Bounded random walks with stop-loss / take-profit barriers
//!
//! Each trial starts at `start` and applies up to `steps` multiplicative
//! updates `value *= 1 + r` with `r` drawn from the step distribution. The
//! walk stops at the first step where it reaches either barrier.

use rand::distributions::Distribution as _;
use rand::Rng;
use rand_distr::Normal;
use serde::Serialize;
use tracing::debug;

use crate::errors::{InvalidParameterError, Result};
use crate::estimator::Estimator;
use crate::types::EstimationResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarrierWalk {
    pub start: f64,
    pub steps: usize,
    pub lower: f64,
    pub upper: f64,
    pub step_mean: f64,
    pub step_std_dev: f64,
}

impl BarrierWalk {
    pub fn validate(&self) -> Result<()> {
        if self.steps == 0 {
            return Err(InvalidParameterError::ZeroSteps);
        }
        let ordered = self.lower.is_finite()
            && self.upper.is_finite()
            && self.lower < self.start
            && self.start < self.upper;
        if !ordered {
            return Err(InvalidParameterError::BarrierOrder {
                lower: self.lower,
                start: self.start,
                upper: self.upper,
            });
        }
        if !self.step_mean.is_finite() || !self.step_std_dev.is_finite() || self.step_std_dev <= 0.0 {
            return Err(InvalidParameterError::InvalidGaussian {
                mean: self.step_mean,
                std_dev: self.step_std_dev,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkExit {
    /// Reached the upper barrier
    TakeProfit,
    /// Reached the lower barrier
    StopLoss,
    /// Ran out of steps between the barriers
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WalkOutcome {
    pub exit: WalkExit,
    pub final_value: f64,
    pub steps_taken: usize,
}

impl WalkOutcome {
    /// Barrier exits decide directly; an expired walk compares against `start`
    pub fn ended_above(&self, start: f64) -> bool {
        match self.exit {
            WalkExit::TakeProfit => true,
            WalkExit::StopLoss => false,
            WalkExit::Expired => self.final_value > start,
        }
    }
}

/// Outcomes of `n` independent walks
#[derive(Debug, Clone, PartialEq)]
pub struct WalkBatch {
    walk: BarrierWalk,
    outcomes: Vec<WalkOutcome>,
}

impl WalkBatch {
    pub fn walk(&self) -> &BarrierWalk {
        &self.walk
    }

    pub fn outcomes(&self) -> &[WalkOutcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn count_exits(&self, exit: WalkExit) -> usize {
        self.outcomes.iter().filter(|o| o.exit == exit).count()
    }

    pub fn reduce<P>(&self, predicate: P) -> EstimationResult
    where
        P: Fn(&WalkOutcome) -> bool,
    {
        let successes = self.outcomes.iter().filter(|o| predicate(o)).count();
        EstimationResult::from_counts(self.outcomes.len(), successes)
    }

    /// Share of walks that ended above their starting value
    pub fn ended_above_start(&self) -> EstimationResult {
        let start = self.walk.start;
        self.reduce(|outcome| outcome.ended_above(start))
    }
}

impl<R: Rng> Estimator<R> {
    /// Run `n` independent barrier walks
    pub fn generate_walks(&mut self, walk: &BarrierWalk, n: usize) -> Result<WalkBatch> {
        if n == 0 {
            return Err(InvalidParameterError::ZeroTrials);
        }
        walk.validate()?;
        let step = Normal::new(walk.step_mean, walk.step_std_dev).map_err(|_| {
            InvalidParameterError::InvalidGaussian {
                mean: walk.step_mean,
                std_dev: walk.step_std_dev,
            }
        })?;

        let rng = self.rng();
        let outcomes: Vec<WalkOutcome> = (0..n).map(|_| run_one(walk, &step, &mut *rng)).collect();

        debug!(trials = n, steps = walk.steps, "Barrier walks generated");
        Ok(WalkBatch {
            walk: walk.clone(),
            outcomes,
        })
    }
}

fn run_one<R: Rng>(walk: &BarrierWalk, step: &Normal<f64>, rng: &mut R) -> WalkOutcome {
    let mut value = walk.start;
    for taken in 1..=walk.steps {
        value *= 1.0 + step.sample(rng);
        let exit = if value >= walk.upper {
            WalkExit::TakeProfit
        } else if value <= walk.lower {
            WalkExit::StopLoss
        } else {
            continue;
        };
        return WalkOutcome {
            exit,
            final_value: value,
            steps_taken: taken,
        };
    }
    WalkOutcome {
        exit: WalkExit::Expired,
        final_value: value,
        steps_taken: walk.steps,
    }
}
