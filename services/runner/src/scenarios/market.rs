//! A month of daily returns with stop-loss and take-profit orders

use estimator::{BarrierWalk, WalkExit};

use super::{Findings, RunContext, Scenario};

pub struct TradeMarket {
    pub walk: BarrierWalk,
}

impl Default for TradeMarket {
    fn default() -> Self {
        Self {
            walk: BarrierWalk {
                start: 100.0,
                steps: 30,
                lower: 95.0,
                upper: 110.0,
                step_mean: 0.0005,
                step_std_dev: 0.01,
            },
        }
    }
}

impl Scenario for TradeMarket {
    fn name(&self) -> &'static str {
        "trade-market"
    }

    fn question(&self) -> String {
        format!(
            "Probability that a position opened at {} ends above it within {} days (stop-loss {}, take-profit {})",
            self.walk.start, self.walk.steps, self.walk.lower, self.walk.upper
        )
    }

    fn run(&self, ctx: &mut RunContext) -> estimator::Result<Findings> {
        let walks = ctx.estimator.generate_walks(&self.walk, ctx.trials)?;
        let result = ctx.finish(walks.ended_above_start(), None)?;

        let total = walks.len() as f64;
        let share = |exit| walks.count_exits(exit) as f64 / total;
        let mean_final = walks.outcomes().iter().map(|o| o.final_value).sum::<f64>() / total;
        let mean_days = walks.outcomes().iter().map(|o| o.steps_taken as f64).sum::<f64>() / total;
        Ok(Findings::with_headline(result)
            .metric("take-profit share", share(WalkExit::TakeProfit))
            .metric("stop-loss share", share(WalkExit::StopLoss))
            .metric("expired share", share(WalkExit::Expired))
            .metric("mean final price", mean_final)
            .metric("mean holding days", mean_days))
    }
}
