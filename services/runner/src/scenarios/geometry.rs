//! Uniform points in the plane

use std::f64::consts::PI;

use estimator::predicates::{gap_exceeds, inside_circle, on_or_below_diagonal};
use estimator::{reduce, theory, Distribution, SamplingRule};

use super::{Findings, RunContext, Scenario};
use crate::params::TrialPolicy;

/// Points uniform over the square [-1, 1)²
fn square() -> estimator::Result<SamplingRule> {
    SamplingRule::repeat(Distribution::uniform_real(-1.0, 1.0)?, 2)
}

/// pi = 4 * P(point in unit circle)
pub struct Pi;

impl Scenario for Pi {
    fn name(&self) -> &'static str {
        "pi"
    }

    fn question(&self) -> String {
        "Estimate pi from the share of square points inside the unit circle".to_string()
    }

    fn run(&self, ctx: &mut RunContext) -> estimator::Result<Findings> {
        let batch = ctx.estimator.generate(&square()?, ctx.trials)?;
        let result = ctx.finish(reduce(&batch, inside_circle(1.0)), Some(PI / 4.0))?;
        let pi = result.scaled(4.0);
        let mut findings = Findings::with_headline(result)
            .metric("pi estimate", pi.value)
            .metric("pi", PI)
            .metric("absolute error", (pi.value - PI).abs());
        if let Some(margin) = pi.error_margin {
            findings = findings.metric("pi margin", margin);
        }
        Ok(findings)
    }
}

/// Arrow lands in the circular target inscribed in a square board
pub struct Archery;

impl Scenario for Archery {
    fn name(&self) -> &'static str {
        "archery"
    }

    fn question(&self) -> String {
        "Probability that a random arrow on the board hits the circular target".to_string()
    }

    fn trial_policy(&self, _standard_minimum: usize) -> TrialPolicy {
        TrialPolicy::at_least(10_000)
    }

    fn run(&self, ctx: &mut RunContext) -> estimator::Result<Findings> {
        let batch = ctx.estimator.generate(&square()?, ctx.trials)?;
        let hit = ctx.finish(reduce(&batch, inside_circle(1.0)), Some(PI / 4.0))?;
        let hits = hit.successes() as f64;
        Ok(Findings::with_headline(hit)
            .metric("hits", hits)
            .metric("misses", ctx.trials as f64 - hits))
    }
}

/// Point in the unit square falls under the diagonal y = x
pub struct TriangleArea;

impl Scenario for TriangleArea {
    fn name(&self) -> &'static str {
        "triangle-area"
    }

    fn question(&self) -> String {
        "Share of the unit square below its diagonal".to_string()
    }

    fn run(&self, ctx: &mut RunContext) -> estimator::Result<Findings> {
        let rule = SamplingRule::repeat(Distribution::uniform_real(0.0, 1.0)?, 2)?;
        let batch = ctx.estimator.generate(&rule, ctx.trials)?;
        let result = ctx.finish(reduce(&batch, on_or_below_diagonal()), Some(0.5))?;
        let area = result.probability();
        Ok(Findings::with_headline(result).metric("triangle area", area))
    }
}

/// Two people arrive uniformly within a window and wait `patience` minutes
pub struct MetroWaiting {
    pub window: f64,
    pub patience: f64,
}

impl Default for MetroWaiting {
    fn default() -> Self {
        Self {
            window: 10.0,
            patience: 5.0,
        }
    }
}

impl Scenario for MetroWaiting {
    fn name(&self) -> &'static str {
        "metro-waiting"
    }

    fn question(&self) -> String {
        format!(
            "Probability that two arrivals within {} minutes miss each other when each waits {} minutes",
            self.window, self.patience
        )
    }

    fn run(&self, ctx: &mut RunContext) -> estimator::Result<Findings> {
        let rule = SamplingRule::repeat(Distribution::uniform_real(0.0, self.window)?, 2)?;
        let batch = ctx.estimator.generate(&rule, ctx.trials)?;
        let miss = ctx.finish(
            reduce(&batch, gap_exceeds(self.patience)),
            Some(theory::arrivals_miss(self.window, self.patience)),
        )?;
        let meet = 1.0 - miss.probability();
        Ok(Findings::with_headline(miss).metric("meeting probability", meet))
    }
}
