//! Draws from finite populations: balls in a bag, contestants, wheel sections

use estimator::predicates::{category_is, equals};
use estimator::stats::{extremes, frequencies, label_frequencies, Frequency};
use estimator::{reduce, Distribution, InvalidParameterError, Sample, SamplingRule};

use super::{Findings, RunContext, Scenario};

/// Most and least frequent entries as `<noun>` / `<noun> share` metric pairs
fn with_extremes(findings: Findings, most: &str, least: &str, frequencies: &[Frequency], offset: i64) -> Findings {
    match extremes(frequencies) {
        Some((top, bottom)) => findings
            .metric(most, (top.value + offset) as f64)
            .metric(format!("{} share", most), top.share)
            .metric(least, (bottom.value + offset) as f64)
            .metric(format!("{} share", least), bottom.share),
        None => findings,
    }
}

/// P(drawing a ball of the target colour)
#[derive(Debug, Clone, PartialEq)]
pub struct BallSelection {
    pub counts: Vec<(String, u64)>,
    pub target: String,
}

impl BallSelection {
    pub fn default_counts() -> Vec<(String, u64)> {
        vec![("Red".to_string(), 30), ("Blue".to_string(), 50), ("Green".to_string(), 20)]
    }

    pub fn has_target(counts: &[(String, u64)], target: &str) -> bool {
        counts.iter().any(|(label, count)| label == target && *count > 0)
    }
}

impl Default for BallSelection {
    fn default() -> Self {
        Self {
            counts: Self::default_counts(),
            target: "Red".to_string(),
        }
    }
}

impl Scenario for BallSelection {
    fn name(&self) -> &'static str {
        "ball-selection"
    }

    fn question(&self) -> String {
        format!("Probability of drawing a {} ball", self.target)
    }

    fn run(&self, ctx: &mut RunContext) -> estimator::Result<Findings> {
        let bag = Distribution::from_counts(self.counts.clone())?;
        let target = bag.index_of(&self.target).ok_or_else(|| {
            InvalidParameterError::out_of_domain("target", format!("no {} balls in the bag", self.target))
        })?;
        let total: u64 = self.counts.iter().map(|(_, count)| count).sum();
        let theoretical = self.counts[target].1 as f64 / total as f64;

        let rule = SamplingRule::single(bag.clone())?;
        let batch = ctx.estimator.generate(&rule, ctx.trials)?;
        let result = ctx.finish(reduce(&batch, category_is(target)), Some(theoretical))?;
        let colours = label_frequencies(frequencies(&batch, 0)?, |index| {
            usize::try_from(index).ok().and_then(|i| bag.label(i)).map(str::to_string)
        });
        Ok(Findings::with_headline(result).frequencies(colours))
    }
}

/// A contestant is selected at random and must then guess one of `options` answers
pub struct Competition {
    pub contestants: i64,
    pub options: i64,
}

impl Default for Competition {
    fn default() -> Self {
        Self {
            contestants: 20,
            options: 4,
        }
    }
}

impl Scenario for Competition {
    fn name(&self) -> &'static str {
        "competition"
    }

    fn question(&self) -> String {
        format!(
            "Probability that contestant 1 of {} is selected and guesses right among {} options",
            self.contestants, self.options
        )
    }

    fn run(&self, ctx: &mut RunContext) -> estimator::Result<Findings> {
        if self.contestants < 2 || self.options < 2 {
            return Err(InvalidParameterError::out_of_domain(
                "competition",
                "needs at least 2 contestants and 2 options",
            ));
        }
        // [selected contestant, guessed option]; option 0 is the right answer
        let rule = SamplingRule::new(vec![
            Distribution::uniform_int(0, self.contestants)?,
            Distribution::uniform_int(0, self.options)?,
        ])?;
        let batch = ctx.estimator.generate(&rule, ctx.trials)?;
        let selected_and_right = |row: &[Sample]| matches!(row, [Sample::Int(0), Sample::Int(0), ..]);
        let theoretical = 1.0 / (self.contestants as f64 * self.options as f64);
        let result = ctx.finish(reduce(&batch, selected_and_right), Some(theoretical))?;

        let selected = reduce(&batch, equals(0)).probability();
        let contestants = label_frequencies(frequencies(&batch, 0)?, |index| {
            Some(format!("Contestant {}", index + 1))
        });
        let findings = Findings::with_headline(result)
            .metric("selected", selected)
            .metric("selected (theory)", 1.0 / self.contestants as f64)
            .metric("selected and knowing", selected / self.options as f64);
        // Contestants are reported 1-based
        Ok(with_extremes(findings, "most selected", "least selected", &contestants, 1).frequencies(contestants))
    }
}

/// Wheel with equally sized sections numbered from 1
pub struct WheelSpin {
    pub sections: i64,
}

impl Default for WheelSpin {
    fn default() -> Self {
        Self { sections: 8 }
    }
}

impl Scenario for WheelSpin {
    fn name(&self) -> &'static str {
        "wheel-spin"
    }

    fn question(&self) -> String {
        format!("Probability of landing on section 1 of a {}-section wheel", self.sections)
    }

    fn run(&self, ctx: &mut RunContext) -> estimator::Result<Findings> {
        if self.sections < 2 {
            return Err(InvalidParameterError::out_of_domain("sections", "must be at least 2"));
        }
        let high = self
            .sections
            .checked_add(1)
            .ok_or_else(|| InvalidParameterError::out_of_domain("sections", "too many sections"))?;
        let rule = SamplingRule::single(Distribution::uniform_int(1, high)?)?;
        let batch = ctx.estimator.generate(&rule, ctx.trials)?;
        let result = ctx.finish(reduce(&batch, equals(1)), Some(1.0 / self.sections as f64))?;
        let sections = label_frequencies(frequencies(&batch, 0)?, |section| Some(format!("Section {}", section)));
        let findings = Findings::with_headline(result);
        Ok(with_extremes(findings, "most frequent section", "least frequent section", &sections, 0).frequencies(sections))
    }
}
