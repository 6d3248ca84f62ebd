//! Monte Carlo estimation core
//!
//! Draw a batch of i.i.d. trials from a declared sampling rule, reduce it
//! with a predicate to an empirical probability, and attach a closed-form
//! reference and a normal-approximation confidence margin.

pub mod constants;
pub mod errors;
pub mod estimator;
pub mod predicates;
pub mod stats;
pub mod theory;
pub mod types;
pub mod walk;

pub use constants::*;
pub use errors::{InvalidParameterError, Result};
pub use estimator::{reduce, reduce_given, Estimator, Seed};
pub use types::*;
pub use walk::{BarrierWalk, WalkBatch, WalkExit, WalkOutcome};
