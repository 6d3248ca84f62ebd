//! Fair coin tosses

use estimator::predicates::{any_category, category_is, count_category};
use estimator::stats::{frequencies, label_frequencies, value_counts};
use estimator::{reduce, theory, Distribution, SamplingRule};

use super::{Findings, RunContext, Scenario};

const HEADS: usize = 0;
const TAILS: usize = 1;

fn coin() -> estimator::Result<Distribution> {
    Distribution::categorical(["Heads", "Tails"])
}

/// Heads / tails split of a single coin
pub struct CoinToss;

impl Scenario for CoinToss {
    fn name(&self) -> &'static str {
        "coin-toss"
    }

    fn question(&self) -> String {
        "Probability of heads for a fair coin".to_string()
    }

    fn run(&self, ctx: &mut RunContext) -> estimator::Result<Findings> {
        let coin = coin()?;
        let rule = SamplingRule::single(coin.clone())?;
        let batch = ctx.estimator.generate(&rule, ctx.trials)?;
        let result = ctx.finish(reduce(&batch, category_is(HEADS)), Some(0.5))?;
        let faces = label_frequencies(frequencies(&batch, 0)?, |index| {
            usize::try_from(index).ok().and_then(|i| coin.label(i)).map(str::to_string)
        });
        Ok(Findings::with_headline(result).frequencies(faces))
    }
}

/// P(at least one tails in three tosses)
pub struct ThreeCoins;

impl Scenario for ThreeCoins {
    fn name(&self) -> &'static str {
        "three-coins"
    }

    fn question(&self) -> String {
        "Probability of at least one tails in three tosses".to_string()
    }

    fn run(&self, ctx: &mut RunContext) -> estimator::Result<Findings> {
        let rule = SamplingRule::repeat(coin()?, 3)?;
        let batch = ctx.estimator.generate(&rule, ctx.trials)?;
        let result = ctx.finish(reduce(&batch, any_category(TAILS)), Some(theory::at_least_one_of(3)))?;
        let tails = value_counts(&batch, |row| count_category(row, TAILS) as i64);
        Ok(Findings::with_headline(result).frequencies(tails))
    }
}
