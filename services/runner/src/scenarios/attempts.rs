//! Repeated independent attempts: free throws and multiple-choice guessing

use estimator::predicates::{agreements, category_at_least, count_category};
use estimator::stats::{extremes, summarize, value_counts, RowSummary};
use estimator::{reduce, theory, Distribution, InvalidParameterError, SamplingRule};

use super::{Findings, RunContext, Scenario};

const HIT: usize = 1;

fn with_summary(findings: Findings, prefix: &str, summary: RowSummary) -> Findings {
    findings
        .metric(format!("{} min", prefix), summary.min)
        .metric(format!("{} max", prefix), summary.max)
        .metric(format!("{} mean", prefix), summary.mean)
}

/// Ten free throws at a fixed success rate; P(at least seven go in)
pub struct FreeThrow {
    /// Success rate in percent
    pub rate: u8,
    pub attempts: usize,
    pub needed: usize,
}

impl Default for FreeThrow {
    fn default() -> Self {
        Self {
            rate: 80,
            attempts: 10,
            needed: 7,
        }
    }
}

impl Scenario for FreeThrow {
    fn name(&self) -> &'static str {
        "free-throw"
    }

    fn question(&self) -> String {
        format!(
            "Probability of at least {} hits in {} free throws at {}% accuracy",
            self.needed, self.attempts, self.rate
        )
    }

    fn run(&self, ctx: &mut RunContext) -> estimator::Result<Findings> {
        if self.rate > 100 {
            return Err(InvalidParameterError::out_of_domain("rate", "must be between 0 and 100"));
        }
        let p = f64::from(self.rate) / 100.0;
        let throw = Distribution::weighted(["Miss", "Hit"], vec![1.0 - p, p])?;
        let rule = SamplingRule::repeat(throw, self.attempts)?;
        let batch = ctx.estimator.generate(&rule, ctx.trials)?;

        let theoretical = theory::binomial_at_least(self.attempts as u64, self.needed as u64, p);
        let result = ctx.finish(reduce(&batch, category_at_least(HIT, self.needed)), Some(theoretical))?;

        let hits = value_counts(&batch, |row| count_category(row, HIT) as i64);
        let summary = summarize(&batch, |row| count_category(row, HIT) as f64);
        let mut findings = with_summary(Findings::with_headline(result), "hits", summary);
        if let Some((most, least)) = extremes(&hits) {
            findings = findings
                .metric("most common hits", most.value as f64)
                .metric("least common hits", least.value as f64);
        }
        Ok(findings.frequencies(hits))
    }
}

/// Guessing every answer of a multiple-choice test; P(score reaches the passing grade)
pub struct PassingTest {
    pub questions: usize,
    /// Passing grade in percent
    pub grade: u8,
}

impl Default for PassingTest {
    fn default() -> Self {
        Self {
            questions: 20,
            grade: 50,
        }
    }
}

impl PassingTest {
    pub const CHOICES: [&'static str; 4] = ["A", "B", "C", "D"];

    /// Correct answers needed to reach the grade
    pub fn needed(&self) -> usize {
        let needed = (u128::from(self.grade) * self.questions as u128).div_ceil(100);
        usize::try_from(needed).unwrap_or(usize::MAX)
    }
}

impl Scenario for PassingTest {
    fn name(&self) -> &'static str {
        "passing-test"
    }

    fn question(&self) -> String {
        format!(
            "Probability of scoring at least {}% on {} four-choice questions by guessing",
            self.grade, self.questions
        )
    }

    fn run(&self, ctx: &mut RunContext) -> estimator::Result<Findings> {
        if self.questions == 0 {
            return Err(InvalidParameterError::out_of_domain("questions", "must be at least 1"));
        }
        if self.grade > 100 {
            return Err(InvalidParameterError::out_of_domain("grade", "must be between 0 and 100"));
        }
        let rule = SamplingRule::repeat(Distribution::categorical(Self::CHOICES)?, self.questions)?;
        let key = ctx.estimator.generate(&rule, 1)?;
        let key = key.samples().to_vec();
        let batch = ctx.estimator.generate(&rule, ctx.trials)?;

        let needed = self.needed();
        let theoretical = theory::binomial_at_least(self.questions as u64, needed as u64, 0.25);
        let result = ctx.finish(reduce(&batch, |row| agreements(row, &key) >= needed), Some(theoretical))?;

        let summary = summarize(&batch, |row| agreements(row, &key) as f64);
        let scores = value_counts(&batch, |row| agreements(row, &key) as i64);
        Ok(with_summary(Findings::with_headline(result), "correct answers", summary)
            .metric("needed correct", needed as f64)
            .frequencies(scores))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use estimator::{ConfidenceLevel, Seed};

    fn ctx(trials: usize) -> RunContext {
        RunContext::new(Seed::Fixed(3), trials, ConfidenceLevel::NinetyFive)
    }

    #[test]
    fn test_needed_rounds_up() {
        assert_eq!(PassingTest::default().needed(), 10);
        assert_eq!(PassingTest { questions: 7, grade: 50 }.needed(), 4);
        assert_eq!(PassingTest { questions: 7, grade: 0 }.needed(), 0);
        assert_eq!(PassingTest { questions: 7, grade: 100 }.needed(), 7);
        assert_eq!(
            PassingTest {
                questions: usize::MAX,
                grade: 100
            }
            .needed(),
            usize::MAX
        );
    }

    #[test]
    fn test_too_many_questions_is_rejected_without_allocating() {
        let scenario = PassingTest {
            questions: 100_000_000_000_000_000,
            grade: 50,
        };
        assert_eq!(scenario.run(&mut ctx(10)).unwrap_err().code(), "VALIDATION_RULE_TOO_WIDE");
    }

    #[test]
    fn test_zero_grade_always_passes() {
        let findings = PassingTest { questions: 5, grade: 0 }.run(&mut ctx(1_000)).unwrap();
        assert_eq!(findings.headline.unwrap().probability(), 1.0);
    }

    #[test]
    fn test_perfect_shooter_never_misses() {
        let scenario = FreeThrow {
            rate: 100,
            ..FreeThrow::default()
        };
        let findings = scenario.run(&mut ctx(1_000)).unwrap();
        assert_eq!(findings.headline.as_ref().unwrap().probability(), 1.0);
        assert_eq!(findings.metric_value("hits min"), Some(10.0));
        assert_eq!(findings.frequencies.len(), 1);
    }

    #[test]
    fn test_free_throw_rejects_rate_above_hundred() {
        let scenario = FreeThrow {
            rate: 101,
            ..FreeThrow::default()
        };
        assert!(scenario.run(&mut ctx(10)).is_err());
    }
}
