//! Command line surface
//!
//! Scenario parameters are taken as raw strings so that malformed or
//! out-of-range input falls back to the documented default with a warning
//! instead of aborting the run.

use clap::{Parser, Subcommand};

use crate::config::OutputFormat;
use crate::params::{
    capitalize, parse_counts, resolve_in_range, resolve_open_probability, resolve_span, DefaultReason, Resolved,
};
use crate::scenarios::attempts::{FreeThrow, PassingTest};
use crate::scenarios::coins::{CoinToss, ThreeCoins};
use crate::scenarios::diagnostics::DiseaseTest;
use crate::scenarios::dice::{DiceDistribution, SixOnDie, ThreeDiceMax, ThreeDiceMin, TwoDiceSum};
use crate::scenarios::geometry::{Archery, MetroWaiting, Pi, TriangleArea};
use crate::scenarios::market::TradeMarket;
use crate::scenarios::numbers::{EvenNumbers, LastDigitEven, NumbersInRange, PhoneNumber};
use crate::scenarios::selection::{BallSelection, Competition, WheelSpin};
use crate::scenarios::Scenario;

/// Upper bound for contestants, options and wheel sections
pub const MAX_POPULATION: i64 = 1_000_000;
/// Upper bound for questions on a multiple-choice test
pub const MAX_QUESTIONS: usize = 10_000;

#[derive(Parser, Debug)]
#[command(name = "runner")]
#[command(about = "Monte Carlo probability estimates for classic puzzles")]
#[command(version)]
pub struct Cli {
    /// Number of trials (invalid or too small values fall back to the scenario minimum)
    #[arg(short, long, global = true)]
    pub trials: Option<String>,

    /// Fixed seed for a reproducible run; overrides MC_SEED
    #[arg(short, long, global = true)]
    pub seed: Option<u64>,

    /// Confidence level for the error margin (0.90 or 0.95); overrides MC_CONFIDENCE
    #[arg(short, long, global = true)]
    pub confidence: Option<f64>,

    /// Report format; overrides MC_OUTPUT
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Draw one ball from a bag of coloured balls
    BallSelection {
        /// Balls per colour, e.g. "Red=30,Blue=50,Green=20"
        #[arg(long)]
        counts: Option<String>,
        /// Colour to draw
        #[arg(long)]
        target: Option<String>,
    },
    /// Roll a 6 with one die
    SixOnDie,
    /// Hit a circular target inscribed in a square board
    Archery,
    /// Land below the diagonal of the unit square
    TriangleArea,
    /// Heads or tails
    CoinToss,
    /// Pick a contestant, who then guesses an answer
    Competition {
        #[arg(long)]
        contestants: Option<String>,
        #[arg(long)]
        options: Option<String>,
    },
    /// Face frequencies of one die
    DiceDistribution,
    /// Precision of a screening test
    DiseaseTest {
        #[arg(long)]
        prevalence: Option<String>,
        #[arg(long)]
        true_positive_rate: Option<String>,
        #[arg(long)]
        false_positive_rate: Option<String>,
    },
    /// Draw an even number from [min, max)
    EvenNumbers {
        #[arg(long)]
        min: Option<String>,
        #[arg(long)]
        max: Option<String>,
    },
    /// At least 7 of 10 free throws go in
    FreeThrow {
        /// Success rate in percent
        #[arg(long)]
        rate: Option<String>,
    },
    /// A phone number ends in an even digit
    LastDigitEven,
    /// Two arrivals within 10 minutes miss each other
    MetroWaiting,
    /// Land inside a search interval
    NumbersInRange {
        #[arg(long)]
        min: Option<String>,
        #[arg(long)]
        max: Option<String>,
        #[arg(long)]
        search_min: Option<String>,
        #[arg(long)]
        search_max: Option<String>,
    },
    /// Pass a multiple-choice test by guessing
    PassingTest {
        #[arg(long)]
        questions: Option<String>,
        /// Passing grade in percent
        #[arg(long)]
        grade: Option<String>,
    },
    /// A digit repeats an exact number of times in a phone number
    PhoneNumber {
        #[arg(long)]
        digit: Option<String>,
        #[arg(long)]
        repeats: Option<String>,
    },
    /// Estimate pi
    Pi,
    /// Two dice add up to a target
    TwoDiceSum {
        #[arg(long)]
        sum: Option<String>,
    },
    /// At least one tails in three tosses
    ThreeCoins,
    /// Highest of three dice is 5 or 6
    ThreeDiceMax,
    /// All three dice exceed a minimum
    ThreeDiceMin {
        #[arg(long)]
        min_value: Option<String>,
    },
    /// Price ends above its start with stop-loss and take-profit orders
    TradeMarket,
    /// Land on section 1 of a wheel
    WheelSpin {
        #[arg(long)]
        sections: Option<String>,
    },
}

impl Command {
    /// Resolve raw parameters and build the scenario
    pub fn into_scenario(self) -> Box<dyn Scenario> {
        match self {
            Command::BallSelection { counts, target } => Box::new(ball_selection(counts, target)),
            Command::SixOnDie => Box::new(SixOnDie),
            Command::Archery => Box::new(Archery),
            Command::TriangleArea => Box::new(TriangleArea),
            Command::CoinToss => Box::new(CoinToss),
            Command::Competition { contestants, options } => {
                let defaults = Competition::default();
                Box::new(Competition {
                    contestants: resolve_in_range(contestants.as_deref(), 2..=MAX_POPULATION, defaults.contestants)
                        .settle("contestants"),
                    options: resolve_in_range(options.as_deref(), 2..=MAX_POPULATION, defaults.options)
                        .settle("options"),
                })
            }
            Command::DiceDistribution => Box::new(DiceDistribution),
            Command::DiseaseTest {
                prevalence,
                true_positive_rate,
                false_positive_rate,
            } => {
                let defaults = DiseaseTest::default();
                Box::new(DiseaseTest {
                    prevalence: resolve_open_probability(prevalence.as_deref(), defaults.prevalence)
                        .settle("prevalence"),
                    true_positive_rate: resolve_in_range(
                        true_positive_rate.as_deref(),
                        0.0..=1.0,
                        defaults.true_positive_rate,
                    )
                    .settle("true_positive_rate"),
                    false_positive_rate: resolve_in_range(
                        false_positive_rate.as_deref(),
                        0.0..=1.0,
                        defaults.false_positive_rate,
                    )
                    .settle("false_positive_rate"),
                })
            }
            Command::EvenNumbers { min, max } => {
                let defaults = EvenNumbers::default();
                let (low, high) =
                    resolve_span(min.as_deref(), max.as_deref(), (defaults.low, defaults.high)).settle("range");
                Box::new(EvenNumbers { low, high })
            }
            Command::FreeThrow { rate } => Box::new(FreeThrow {
                rate: resolve_in_range(rate.as_deref(), 0..=100, FreeThrow::default().rate).settle("rate"),
                ..FreeThrow::default()
            }),
            Command::LastDigitEven => Box::new(LastDigitEven),
            Command::MetroWaiting => Box::new(MetroWaiting::default()),
            Command::NumbersInRange {
                min,
                max,
                search_min,
                search_max,
            } => Box::new(numbers_in_range(min, max, search_min, search_max)),
            Command::PassingTest { questions, grade } => {
                let defaults = PassingTest::default();
                Box::new(PassingTest {
                    questions: resolve_in_range(questions.as_deref(), 1..=MAX_QUESTIONS, defaults.questions)
                        .settle("questions"),
                    grade: resolve_in_range(grade.as_deref(), 0..=100, defaults.grade).settle("grade"),
                })
            }
            Command::PhoneNumber { digit, repeats } => {
                let defaults = PhoneNumber::default();
                Box::new(PhoneNumber {
                    digit: resolve_in_range(digit.as_deref(), 0..=9, defaults.digit).settle("digit"),
                    repeats: resolve_in_range(repeats.as_deref(), 1..=10, defaults.repeats).settle("repeats"),
                })
            }
            Command::Pi => Box::new(Pi),
            Command::TwoDiceSum { sum } => Box::new(TwoDiceSum {
                target: resolve_in_range(sum.as_deref(), 2..=12, TwoDiceSum::default().target).settle("sum"),
            }),
            Command::ThreeCoins => Box::new(ThreeCoins),
            Command::ThreeDiceMax => Box::new(ThreeDiceMax),
            Command::ThreeDiceMin { min_value } => Box::new(ThreeDiceMin {
                min_value: resolve_in_range(min_value.as_deref(), 1..=6, ThreeDiceMin::default().min_value)
                    .settle("min_value"),
            }),
            Command::TradeMarket => Box::new(TradeMarket::default()),
            Command::WheelSpin { sections } => Box::new(WheelSpin {
                sections: resolve_in_range(sections.as_deref(), 2..=MAX_POPULATION, WheelSpin::default().sections)
                    .settle("sections"),
            }),
        }
    }
}

/// Counts and target fall back together when the target is not in the bag
fn ball_selection(counts: Option<String>, target: Option<String>) -> BallSelection {
    let defaults = BallSelection::default();
    let counts = match counts.as_deref() {
        None => Resolved::Defaulted {
            value: defaults.counts.clone(),
            reason: DefaultReason::Missing,
        },
        Some(raw) => match parse_counts(raw) {
            Some(parsed) => Resolved::Provided(parsed),
            None => Resolved::Defaulted {
                value: defaults.counts.clone(),
                reason: DefaultReason::Unparseable(raw.to_string()),
            },
        },
    }
    .settle("counts");
    let target = target.map(|raw| capitalize(raw.trim())).unwrap_or_else(|| defaults.target.clone());

    if BallSelection::has_target(&counts, &target) {
        BallSelection { counts, target }
    } else {
        Resolved::Defaulted {
            value: defaults,
            reason: DefaultReason::OutOfRange(target),
        }
        .settle("target")
    }
}

/// The search interval must sit inside the sampling space; otherwise it falls back
fn numbers_in_range(
    min: Option<String>,
    max: Option<String>,
    search_min: Option<String>,
    search_max: Option<String>,
) -> NumbersInRange {
    let defaults = NumbersInRange::default();
    let space = resolve_span(min.as_deref(), max.as_deref(), defaults.space).settle("range");
    let search = match resolve_span(search_min.as_deref(), search_max.as_deref(), defaults.search) {
        Resolved::Provided(search) if !NumbersInRange::nested(space, search) => Resolved::Defaulted {
            value: defaults.search,
            reason: DefaultReason::OutOfRange(format!("[{}, {})", search.0, search.1)),
        },
        resolved => resolved,
    }
    .settle("search");
    // The default search can itself fall outside a custom space
    let search = if NumbersInRange::nested(space, search) {
        search
    } else {
        Resolved::Defaulted {
            value: space,
            reason: DefaultReason::OutOfRange(format!("[{}, {})", search.0, search.1)),
        }
        .settle("search")
    };
    NumbersInRange { space, search }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("runner").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["two-dice-sum", "--sum", "7", "--seed", "42", "--trials", "1_000_000"]);
        assert_eq!(cli.seed, Some(42));
        assert_eq!(cli.trials.as_deref(), Some("1_000_000"));
        assert_eq!(cli.command, Command::TwoDiceSum { sum: Some("7".into()) });
    }

    #[test]
    fn test_output_format_values() {
        assert_eq!(parse(&["pi", "--output", "json"]).output, Some(OutputFormat::Json));
        assert_eq!(parse(&["--output", "text", "pi"]).output, Some(OutputFormat::Text));
        assert_eq!(parse(&["pi"]).output, None);
        assert!(Cli::try_parse_from(["runner", "pi", "--output", "yaml"]).is_err());
    }

    #[test]
    fn test_out_of_range_sum_falls_back() {
        let scenario = Command::TwoDiceSum { sum: Some("14".into()) }.into_scenario();
        assert_eq!(scenario.question(), "Probability that two fair dice sum to 8");
    }

    #[test]
    fn test_ball_selection_target_must_be_in_bag() {
        let chosen = ball_selection(Some("yellow=4,black=6".into()), Some("black".into()));
        assert_eq!(chosen.target, "Black");
        assert_eq!(chosen.counts.len(), 2);

        let fallback = ball_selection(Some("yellow=4,black=6".into()), Some("red".into()));
        assert_eq!(fallback.counts, BallSelection::default_counts());
        assert_eq!(fallback.target, "Red");
    }

    #[test]
    fn test_search_outside_space_falls_back() {
        let scenario = numbers_in_range(None, None, Some("90".into()), Some("120".into()));
        assert_eq!(scenario.search, (1, 10));

        let narrow = numbers_in_range(Some("50".into()), Some("60".into()), None, None);
        assert_eq!(narrow.space, (50, 60));
        assert_eq!(narrow.search, (50, 60));
    }

    #[test]
    fn test_oversized_counts_fall_back_to_defaults() {
        let wheel = Command::WheelSpin {
            sections: Some(i64::MAX.to_string()),
        }
        .into_scenario();
        assert_eq!(wheel.question(), "Probability of landing on section 1 of a 8-section wheel");

        let test = Command::PassingTest {
            questions: Some("100000000000000000".into()),
            grade: None,
        }
        .into_scenario();
        assert!(test.question().contains(" 20 four-choice questions"));

        let competition = Command::Competition {
            contestants: Some("5000000".into()),
            options: None,
        }
        .into_scenario();
        assert!(competition.question().contains("of 20 is selected"));
    }

    #[test]
    fn test_every_subcommand_has_a_scenario_name() {
        let names: Vec<&str> = [
            Command::SixOnDie,
            Command::Archery,
            Command::CoinToss,
            Command::Pi,
            Command::TradeMarket,
            Command::WheelSpin { sections: None },
        ]
        .into_iter()
        .map(|command| command.into_scenario().name())
        .collect();
        assert_eq!(names, vec!["six-on-die", "archery", "coin-toss", "pi", "trade-market", "wheel-spin"]);
    }
}
