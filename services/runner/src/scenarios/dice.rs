//! Fair six-sided dice

use estimator::predicates::{all_greater_than, equals, max_at_least, row_max, row_sum, sum_equals};
use estimator::stats::{frequencies, label_frequencies, value_counts};
use estimator::{reduce, theory, Distribution, InvalidParameterError, SamplingRule};

use super::{Findings, RunContext, Scenario};

fn die() -> estimator::Result<Distribution> {
    Distribution::uniform_int(1, 7)
}

fn dice(count: usize) -> estimator::Result<SamplingRule> {
    SamplingRule::repeat(die()?, count)
}

/// P(rolling a 6)
pub struct SixOnDie;

impl Scenario for SixOnDie {
    fn name(&self) -> &'static str {
        "six-on-die"
    }

    fn question(&self) -> String {
        "Probability of rolling a 6 with one fair die".to_string()
    }

    fn run(&self, ctx: &mut RunContext) -> estimator::Result<Findings> {
        let batch = ctx.estimator.generate(&dice(1)?, ctx.trials)?;
        let result = ctx.finish(reduce(&batch, equals(6)), Some(1.0 / 6.0))?;
        Ok(Findings::with_headline(result))
    }
}

/// Per-face frequencies of one die
pub struct DiceDistribution;

impl Scenario for DiceDistribution {
    fn name(&self) -> &'static str {
        "dice-distribution"
    }

    fn question(&self) -> String {
        "Distribution of faces over repeated rolls of one fair die".to_string()
    }

    fn run(&self, ctx: &mut RunContext) -> estimator::Result<Findings> {
        let batch = ctx.estimator.generate(&dice(1)?, ctx.trials)?;
        let faces = label_frequencies(frequencies(&batch, 0)?, |face| Some(format!("Face {}", face)));
        let expected = 1.0 / 6.0;
        let worst = faces
            .iter()
            .map(|f| (f.share - expected).abs())
            .fold(0.0, f64::max);
        Ok(Findings::default()
            .metric("expected share", expected)
            .metric("largest deviation", worst)
            .frequencies(faces))
    }
}

/// P(sum of two dice == target)
pub struct TwoDiceSum {
    pub target: i64,
}

impl Default for TwoDiceSum {
    fn default() -> Self {
        Self { target: 8 }
    }
}

impl Scenario for TwoDiceSum {
    fn name(&self) -> &'static str {
        "two-dice-sum"
    }

    fn question(&self) -> String {
        format!("Probability that two fair dice sum to {}", self.target)
    }

    fn run(&self, ctx: &mut RunContext) -> estimator::Result<Findings> {
        if !(2..=12).contains(&self.target) {
            return Err(InvalidParameterError::out_of_domain("sum", "must be between 2 and 12"));
        }
        let batch = ctx.estimator.generate(&dice(2)?, ctx.trials)?;
        let result = ctx.finish(
            reduce(&batch, sum_equals(self.target)),
            Some(theory::two_dice_sum(self.target)),
        )?;
        Ok(Findings::with_headline(result).frequencies(value_counts(&batch, row_sum)))
    }
}

/// P(max of three dice is 5 or 6)
pub struct ThreeDiceMax;

impl Scenario for ThreeDiceMax {
    fn name(&self) -> &'static str {
        "three-dice-max"
    }

    fn question(&self) -> String {
        "Probability that the highest of three dice is 5 or 6".to_string()
    }

    fn run(&self, ctx: &mut RunContext) -> estimator::Result<Findings> {
        let batch = ctx.estimator.generate(&dice(3)?, ctx.trials)?;
        let result = ctx.finish(
            reduce(&batch, max_at_least(5)),
            Some(theory::dice_max_at_least(3, 5)),
        )?;
        let maxima = value_counts(&batch, |row| row_max(row).unwrap_or_default());
        Ok(Findings::with_headline(result).frequencies(maxima))
    }
}

/// P(all three dice exceed a minimum)
pub struct ThreeDiceMin {
    pub min_value: i64,
}

impl Default for ThreeDiceMin {
    fn default() -> Self {
        Self { min_value: 4 }
    }
}

impl Scenario for ThreeDiceMin {
    fn name(&self) -> &'static str {
        "three-dice-min"
    }

    fn question(&self) -> String {
        format!("Probability that all three dice are greater than {}", self.min_value)
    }

    fn run(&self, ctx: &mut RunContext) -> estimator::Result<Findings> {
        if !(1..=6).contains(&self.min_value) {
            return Err(InvalidParameterError::out_of_domain("min_value", "must be between 1 and 6"));
        }
        let batch = ctx.estimator.generate(&dice(3)?, ctx.trials)?;
        let result = ctx.finish(
            reduce(&batch, all_greater_than(self.min_value)),
            Some(theory::dice_all_greater_than(3, self.min_value)),
        )?;
        Ok(Findings::with_headline(result))
    }
}
