//! Scenario catalogue
//!
//! Every scenario is a sampling rule, a predicate and (where one exists) a
//! closed-form reference. The estimator does the work; scenarios only wire
//! their resolved parameters into it and collect the findings.

use estimator::stats::Frequency;
use estimator::{ConfidenceLevel, EstimationResult, Estimator, Seed};
use serde::Serialize;
use tracing::{info, warn};

use crate::params::TrialPolicy;

pub mod attempts;
pub mod coins;
pub mod diagnostics;
pub mod dice;
pub mod geometry;
pub mod market;
pub mod numbers;
pub mod selection;

pub trait Scenario {
    /// CLI name, e.g. `two-dice-sum`
    fn name(&self) -> &'static str;

    /// One-line description of the probability being estimated
    fn question(&self) -> String;

    fn trial_policy(&self, standard_minimum: usize) -> TrialPolicy {
        TrialPolicy::at_least(standard_minimum)
    }

    fn run(&self, ctx: &mut RunContext) -> estimator::Result<Findings>;
}

/// Everything a scenario needs to draw and reduce one batch
pub struct RunContext {
    pub estimator: Estimator,
    pub trials: usize,
    pub confidence: ConfidenceLevel,
}

impl RunContext {
    pub fn new(seed: Seed, trials: usize, confidence: ConfidenceLevel) -> Self {
        Self {
            estimator: Estimator::new(seed),
            trials,
            confidence,
        }
    }

    /// Attach the reference value (if any) and the confidence margin
    ///
    /// A conditional result with no matching rows has no margin.
    pub fn finish(&self, result: EstimationResult, theoretical: Option<f64>) -> estimator::Result<EstimationResult> {
        let result = match theoretical {
            Some(theoretical) => result.with_theoretical(theoretical)?,
            None => result,
        };
        if result.trials() == 0 {
            warn!("No trials matched the condition; margin omitted");
            return Ok(result);
        }
        result.with_confidence(self.confidence)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub name: String,
    pub value: f64,
}

/// What a scenario hands to the presentation sink
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Findings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<EstimationResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<Metric>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub frequencies: Vec<Frequency>,
}

impl Findings {
    pub fn with_headline(result: EstimationResult) -> Self {
        Self {
            headline: Some(result),
            ..Self::default()
        }
    }

    pub fn metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.push(Metric {
            name: name.into(),
            value,
        });
        self
    }

    pub fn frequencies(mut self, frequencies: Vec<Frequency>) -> Self {
        self.frequencies = frequencies;
        self
    }

    pub fn metric_value(&self, name: &str) -> Option<f64> {
        self.metrics.iter().find(|m| m.name == name).map(|m| m.value)
    }
}

/// Run one scenario end to end
pub fn execute(scenario: &dyn Scenario, ctx: &mut RunContext) -> estimator::Result<Findings> {
    info!(
        scenario = scenario.name(),
        trials = ctx.trials,
        confidence = %ctx.confidence,
        "Scenario started"
    );
    let findings = scenario.run(ctx)?;
    info!(
        scenario = scenario.name(),
        probability = findings.headline.as_ref().map(EstimationResult::probability),
        "Scenario finished"
    );
    Ok(findings)
}
