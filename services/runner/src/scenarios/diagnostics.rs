//! Screening test for a rare disease
//!
//! Each simulated person draws two uniforms: the first decides whether they
//! are ill (below the prevalence), the second whether the test fires (below
//! the true-positive rate when ill, below the false-positive rate otherwise).

use estimator::stats::{tally, Frequency};
use estimator::{reduce_given, theory, Distribution, InvalidParameterError, Sample, SamplingRule};

use super::{Findings, RunContext, Scenario};
use crate::params::TrialPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TestOutcome {
    TruePositive,
    FalsePositive,
    TrueNegative,
    FalseNegative,
}

impl TestOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::TruePositive => "True positive",
            Self::FalsePositive => "False positive",
            Self::TrueNegative => "True negative",
            Self::FalseNegative => "False negative",
        }
    }
}

pub struct DiseaseTest {
    pub prevalence: f64,
    pub true_positive_rate: f64,
    pub false_positive_rate: f64,
}

impl Default for DiseaseTest {
    fn default() -> Self {
        Self {
            prevalence: 0.01,
            true_positive_rate: 0.95,
            false_positive_rate: 0.05,
        }
    }
}

impl DiseaseTest {
    pub const POPULATION: TrialPolicy = TrialPolicy {
        minimum: 1_000,
        fallback: 10_000,
    };

    fn ill(&self, row: &[Sample]) -> bool {
        row.first().map_or(false, |s| s.as_f64() < self.prevalence)
    }

    fn positive(&self, row: &[Sample]) -> bool {
        let rate = if self.ill(row) {
            self.true_positive_rate
        } else {
            self.false_positive_rate
        };
        row.get(1).map_or(false, |s| s.as_f64() < rate)
    }

    fn classify(&self, row: &[Sample]) -> TestOutcome {
        match (self.ill(row), self.positive(row)) {
            (true, true) => TestOutcome::TruePositive,
            (false, true) => TestOutcome::FalsePositive,
            (false, false) => TestOutcome::TrueNegative,
            (true, false) => TestOutcome::FalseNegative,
        }
    }

    fn validate(&self) -> estimator::Result<()> {
        if !(self.prevalence > 0.0 && self.prevalence < 1.0) {
            return Err(InvalidParameterError::out_of_domain("prevalence", "must lie strictly between 0 and 1"));
        }
        for (name, rate) in [
            ("true_positive_rate", self.true_positive_rate),
            ("false_positive_rate", self.false_positive_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(InvalidParameterError::out_of_domain(name, "must lie between 0 and 1"));
            }
        }
        Ok(())
    }
}

impl Scenario for DiseaseTest {
    fn name(&self) -> &'static str {
        "disease-test"
    }

    fn question(&self) -> String {
        format!(
            "Probability of being ill after a positive test (prevalence {}, sensitivity {}, false-positive rate {})",
            self.prevalence, self.true_positive_rate, self.false_positive_rate
        )
    }

    fn trial_policy(&self, _standard_minimum: usize) -> TrialPolicy {
        Self::POPULATION
    }

    fn run(&self, ctx: &mut RunContext) -> estimator::Result<Findings> {
        self.validate()?;
        let rule = SamplingRule::repeat(Distribution::uniform_real(0.0, 1.0)?, 2)?;
        let batch = ctx.estimator.generate(&rule, ctx.trials)?;

        let precision = ctx.finish(
            reduce_given(&batch, |row| self.positive(row), |row| self.ill(row)),
            Some(theory::positive_predictive_value(
                self.prevalence,
                self.true_positive_rate,
                self.false_positive_rate,
            )),
        )?;
        let sensitivity = reduce_given(&batch, |row| self.ill(row), |row| self.positive(row));

        let population = batch.len() as f64;
        let matrix: Vec<Frequency> = tally(&batch, |row| self.classify(row))
            .into_iter()
            .map(|(outcome, count)| Frequency {
                value: outcome as i64,
                label: Some(outcome.label().to_string()),
                count,
                share: count as f64 / population,
            })
            .collect();

        Ok(Findings::with_headline(precision)
            .metric("sensitivity", sensitivity.probability())
            .metric("sensitivity (theory)", self.true_positive_rate)
            .metric("ill people", sensitivity.trials() as f64)
            .frequencies(matrix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use estimator::{ConfidenceLevel, Seed};

    #[test]
    fn test_classify_uses_rate_matching_health() {
        let test = DiseaseTest::default();
        let row = |a: f64, b: f64| [Sample::Real(a), Sample::Real(b)];
        assert_eq!(test.classify(&row(0.001, 0.5)), TestOutcome::TruePositive);
        assert_eq!(test.classify(&row(0.001, 0.99)), TestOutcome::FalseNegative);
        assert_eq!(test.classify(&row(0.5, 0.01)), TestOutcome::FalsePositive);
        assert_eq!(test.classify(&row(0.5, 0.5)), TestOutcome::TrueNegative);
    }

    #[test]
    fn test_confusion_matrix_covers_population() {
        let mut ctx = RunContext::new(Seed::Fixed(9), 50_000, ConfidenceLevel::NinetyFive);
        let findings = DiseaseTest::default().run(&mut ctx).unwrap();
        let total: usize = findings.frequencies.iter().map(|f| f.count).sum();
        assert_eq!(total, 50_000);
        assert!(findings.frequencies.iter().all(|f| f.label.is_some()));
    }

    #[test]
    fn test_no_positives_leaves_precision_without_margin() {
        let test = DiseaseTest {
            true_positive_rate: 0.0,
            false_positive_rate: 0.0,
            ..DiseaseTest::default()
        };
        let mut ctx = RunContext::new(Seed::Fixed(9), 1_000, ConfidenceLevel::NinetyFive);
        let headline = test.run(&mut ctx).unwrap().headline.unwrap();
        assert_eq!(headline.trials(), 0);
        assert_eq!(headline.error_margin(), None);
    }

    #[test]
    fn test_rejects_certain_prevalence() {
        let test = DiseaseTest {
            prevalence: 1.0,
            ..DiseaseTest::default()
        };
        let mut ctx = RunContext::new(Seed::Fixed(9), 1_000, ConfidenceLevel::NinetyFive);
        assert!(test.run(&mut ctx).is_err());
    }
}
