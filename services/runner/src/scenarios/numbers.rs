//! Uniform integers and 10-digit phone numbers

use estimator::predicates::{count_equals, count_matches, in_range, is_even, last_int};
use estimator::stats::value_counts;
use estimator::{reduce, theory, Distribution, InvalidParameterError, SamplingRule};

use super::{Findings, RunContext, Scenario};

/// Leading digit of a phone number is never 0 or 1
pub const PHONE_FIRST_DIGITS: std::ops::Range<i64> = 2..10;
pub const PHONE_LENGTH: usize = 10;

/// First digit in [2, 10), nine more digits in [0, 10)
pub fn phone_number_rule() -> estimator::Result<SamplingRule> {
    let mut columns = vec![Distribution::uniform_int(PHONE_FIRST_DIGITS.start, PHONE_FIRST_DIGITS.end)?];
    columns.extend(std::iter::repeat(Distribution::uniform_int(0, 10)?).take(PHONE_LENGTH - 1));
    SamplingRule::new(columns)
}

/// P(even) for an integer uniform over [low, high)
pub struct EvenNumbers {
    pub low: i64,
    pub high: i64,
}

impl Default for EvenNumbers {
    fn default() -> Self {
        Self { low: 0, high: 100 }
    }
}

impl Scenario for EvenNumbers {
    fn name(&self) -> &'static str {
        "even-numbers"
    }

    fn question(&self) -> String {
        format!("Probability that a number drawn from [{}, {}) is even", self.low, self.high)
    }

    fn run(&self, ctx: &mut RunContext) -> estimator::Result<Findings> {
        let rule = SamplingRule::single(Distribution::uniform_int(self.low, self.high)?)?;
        let batch = ctx.estimator.generate(&rule, ctx.trials)?;
        let result = ctx.finish(reduce(&batch, is_even()), Some(theory::even_share(self.low, self.high)))?;
        Ok(Findings::with_headline(result))
    }
}

/// P(number from the space lands in the search interval)
pub struct NumbersInRange {
    pub space: (i64, i64),
    pub search: (i64, i64),
}

impl Default for NumbersInRange {
    fn default() -> Self {
        Self {
            space: (0, 100),
            search: (1, 10),
        }
    }
}

impl NumbersInRange {
    /// Search interval lies inside the sampling space
    pub fn nested(space: (i64, i64), search: (i64, i64)) -> bool {
        space.0 <= search.0 && search.1 <= space.1
    }
}

impl Scenario for NumbersInRange {
    fn name(&self) -> &'static str {
        "numbers-in-range"
    }

    fn question(&self) -> String {
        format!(
            "Probability that a number drawn from [{}, {}) lies in [{}, {})",
            self.space.0, self.space.1, self.search.0, self.search.1
        )
    }

    fn run(&self, ctx: &mut RunContext) -> estimator::Result<Findings> {
        let (low, high) = self.search;
        if low >= high || !Self::nested(self.space, self.search) {
            return Err(InvalidParameterError::out_of_domain(
                "search",
                format!("[{}, {}) must be a non-empty part of the sampling space", low, high),
            ));
        }
        let rule = SamplingRule::single(Distribution::uniform_int(self.space.0, self.space.1)?)?;
        let batch = ctx.estimator.generate(&rule, ctx.trials)?;
        let result = ctx.finish(
            reduce(&batch, in_range(low, high)),
            Some(theory::uniform_range_share(self.space.0, self.space.1, low, high)),
        )?;
        Ok(Findings::with_headline(result))
    }
}

/// P(a digit occurs exactly `repeats` times in a phone number)
pub struct PhoneNumber {
    pub digit: i64,
    pub repeats: usize,
}

impl Default for PhoneNumber {
    fn default() -> Self {
        Self { digit: 2, repeats: 2 }
    }
}

impl Scenario for PhoneNumber {
    fn name(&self) -> &'static str {
        "phone-number"
    }

    fn question(&self) -> String {
        format!(
            "Probability that digit {} appears exactly {} times in a 10-digit phone number",
            self.digit, self.repeats
        )
    }

    fn run(&self, ctx: &mut RunContext) -> estimator::Result<Findings> {
        if !(0..=9).contains(&self.digit) {
            return Err(InvalidParameterError::out_of_domain("digit", "must be between 0 and 9"));
        }
        if self.repeats == 0 || self.repeats > PHONE_LENGTH {
            return Err(InvalidParameterError::out_of_domain("repeats", "must be between 1 and 10"));
        }
        let batch = ctx.estimator.generate(&phone_number_rule()?, ctx.trials)?;
        let theoretical = theory::digit_repeats(
            self.digit,
            self.repeats as u64,
            PHONE_FIRST_DIGITS,
            (PHONE_LENGTH - 1) as u64,
        );
        let result = ctx.finish(reduce(&batch, count_equals(self.digit, self.repeats)), Some(theoretical))?;
        let digit = self.digit;
        let occurrences = value_counts(&batch, |row| count_matches(row, digit) as i64);
        Ok(Findings::with_headline(result).frequencies(occurrences))
    }
}

/// P(last digit of a phone number is even)
pub struct LastDigitEven;

impl Scenario for LastDigitEven {
    fn name(&self) -> &'static str {
        "last-digit-even"
    }

    fn question(&self) -> String {
        "Probability that a 10-digit phone number ends in an even digit".to_string()
    }

    fn run(&self, ctx: &mut RunContext) -> estimator::Result<Findings> {
        let batch = ctx.estimator.generate(&phone_number_rule()?, ctx.trials)?;
        let result = ctx.finish(reduce(&batch, last_int(|d| d % 2 == 0)), Some(0.5))?;
        Ok(Findings::with_headline(result))
    }
}
