//! Parameter resolution with explicit fallback defaults
//!
//! Raw user input is either accepted as-is or replaced by a documented
//! default, and the replacement always says why. Nothing here touches the
//! estimator; callers hand it resolved values only.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultReason {
    /// No value was supplied
    Missing,
    /// The value did not parse
    Unparseable(String),
    /// The value parsed but is outside the accepted domain
    OutOfRange(String),
}

impl fmt::Display for DefaultReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultReason::Missing => write!(f, "not provided"),
            DefaultReason::Unparseable(raw) => write!(f, "`{}` is not a valid value", raw),
            DefaultReason::OutOfRange(raw) => write!(f, "`{}` is out of range", raw),
        }
    }
}

/// A parameter value together with where it came from
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<T> {
    Provided(T),
    Defaulted { value: T, reason: DefaultReason },
}

impl<T> Resolved<T> {
    pub fn value(&self) -> &T {
        match self {
            Resolved::Provided(value) => value,
            Resolved::Defaulted { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Resolved::Provided(value) => value,
            Resolved::Defaulted { value, .. } => value,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Resolved::Defaulted { .. })
    }

    /// Unwrap the value, logging a warning when a default was substituted
    pub fn settle(self, name: &str) -> T
    where
        T: fmt::Debug,
    {
        if let Resolved::Defaulted { value, reason } = &self {
            // Silent for parameters the user never touched
            if *reason != DefaultReason::Missing {
                warn!(parameter = name, reason = %reason, default = ?value, "Using default value");
            }
        }
        self.into_value()
    }
}

/// Parse `raw`; fall back to `default` if it is missing, malformed or rejected by `accept`
pub fn resolve<T, F>(raw: Option<&str>, default: T, accept: F) -> Resolved<T>
where
    T: FromStr,
    F: Fn(&T) -> bool,
{
    let Some(raw) = raw.map(str::trim) else {
        return Resolved::Defaulted {
            value: default,
            reason: DefaultReason::Missing,
        };
    };
    match raw.parse::<T>() {
        Ok(value) if accept(&value) => Resolved::Provided(value),
        Ok(_) => Resolved::Defaulted {
            value: default,
            reason: DefaultReason::OutOfRange(raw.to_string()),
        },
        Err(_) => Resolved::Defaulted {
            value: default,
            reason: DefaultReason::Unparseable(raw.to_string()),
        },
    }
}

pub fn resolve_in_range<T>(raw: Option<&str>, range: RangeInclusive<T>, default: T) -> Resolved<T>
where
    T: FromStr + PartialOrd,
{
    resolve(raw, default, |value| range.contains(value))
}

/// Probability strictly inside (0, 1)
pub fn resolve_open_probability(raw: Option<&str>, default: f64) -> Resolved<f64> {
    resolve(raw, default, |p: &f64| *p > 0.0 && *p < 1.0)
}

/// Trial-count policy for one scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialPolicy {
    /// Smallest accepted trial count
    pub minimum: usize,
    /// Substituted when the input is missing, malformed or below `minimum`
    pub fallback: usize,
}

impl TrialPolicy {
    /// A zero minimum is raised to one trial
    pub const fn at_least(minimum: usize) -> Self {
        let minimum = if minimum == 0 { 1 } else { minimum };
        Self {
            minimum,
            fallback: minimum,
        }
    }
}

pub fn resolve_trials(raw: Option<&str>, policy: TrialPolicy) -> Resolved<usize> {
    // Accept "1_000_000" and "1,000,000" the way people type large counts
    let cleaned = raw.map(|r| r.trim().replace(['_', ','], ""));
    resolve(cleaned.as_deref(), policy.fallback, |n| *n > 0 && *n >= policy.minimum)
}

/// Half-open integer span [low, high); both ends fall back together
pub fn resolve_span(raw_low: Option<&str>, raw_high: Option<&str>, default: (i64, i64)) -> Resolved<(i64, i64)> {
    let (low, high) = match (raw_low, raw_high) {
        (None, None) => {
            return Resolved::Defaulted {
                value: default,
                reason: DefaultReason::Missing,
            }
        }
        (low, high) => (low.unwrap_or(""), high.unwrap_or("")),
    };
    let raw = format!("[{}, {})", low.trim(), high.trim());
    match (low.trim().parse::<i64>(), high.trim().parse::<i64>()) {
        (Ok(l), Ok(h)) if l < h => Resolved::Provided((l, h)),
        (Ok(_), Ok(_)) => Resolved::Defaulted {
            value: default,
            reason: DefaultReason::OutOfRange(raw),
        },
        _ => Resolved::Defaulted {
            value: default,
            reason: DefaultReason::Unparseable(raw),
        },
    }
}

/// `Red=30,Blue=50` style label counts; names are capitalized
pub fn parse_counts(raw: &str) -> Option<Vec<(String, u64)>> {
    let mut counts: Vec<(String, u64)> = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (name, count) = entry.split_once('=')?;
        let name = capitalize(name.trim());
        let count = count.trim().parse().ok()?;
        if name.is_empty() || counts.iter().any(|(existing, _)| *existing == name) {
            return None;
        }
        counts.push((name, count));
    }
    if counts.is_empty() || counts.iter().all(|(_, count)| *count == 0) {
        return None;
    }
    Some(counts)
}

/// "rED" -> "Red"
pub fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_accepts_valid_input() {
        assert_eq!(resolve_in_range(Some("4"), 0..=9, 2), Resolved::Provided(4));
        assert_eq!(resolve_in_range(Some(" 12 "), 2..=100, 20), Resolved::Provided(12));
    }

    #[test]
    fn test_resolve_reports_reason_for_default() {
        assert_eq!(
            resolve_in_range(None, 0..=9, 2),
            Resolved::Defaulted {
                value: 2,
                reason: DefaultReason::Missing
            }
        );
        assert_eq!(
            resolve_in_range(Some("eleven"), 0..=9, 2),
            Resolved::Defaulted {
                value: 2,
                reason: DefaultReason::Unparseable("eleven".to_string())
            }
        );
        assert_eq!(
            resolve_in_range(Some("11"), 0..=9, 2),
            Resolved::Defaulted {
                value: 2,
                reason: DefaultReason::OutOfRange("11".to_string())
            }
        );
    }

    #[test]
    fn test_resolve_trials_policy() {
        let policy = TrialPolicy::at_least(100_000);
        assert_eq!(resolve_trials(Some("250000"), policy), Resolved::Provided(250_000));
        assert_eq!(resolve_trials(Some("1_000_000"), policy), Resolved::Provided(1_000_000));
        assert_eq!(resolve_trials(Some("2,000,000"), policy), Resolved::Provided(2_000_000));
        assert_eq!(*resolve_trials(Some("500"), policy).value(), 100_000);
        assert_eq!(*resolve_trials(Some("-3"), policy).value(), 100_000);
        assert!(resolve_trials(Some("lots"), policy).is_default());

        // Population-style policy: too small falls back to a larger default
        let population = TrialPolicy {
            minimum: 1_000,
            fallback: 10_000,
        };
        assert_eq!(*resolve_trials(Some("999"), population).value(), 10_000);
        assert_eq!(*resolve_trials(Some("1000"), population).value(), 1_000);
    }

    #[test]
    fn test_zero_trials_are_never_accepted() {
        let policy = TrialPolicy::at_least(0);
        assert_eq!(policy.minimum, 1);
        assert_eq!(policy.fallback, 1);
        assert_eq!(*resolve_trials(Some("0"), policy).value(), 1);
        assert!(resolve_trials(Some("0"), policy).is_default());
        assert_eq!(resolve_trials(Some("5"), policy), Resolved::Provided(5));

        let loose = TrialPolicy {
            minimum: 0,
            fallback: 10,
        };
        assert_eq!(*resolve_trials(Some("0"), loose).value(), 10);
    }

    #[test]
    fn test_open_probability() {
        assert_eq!(resolve_open_probability(Some("0.2"), 0.01), Resolved::Provided(0.2));
        assert!(resolve_open_probability(Some("0"), 0.01).is_default());
        assert!(resolve_open_probability(Some("1"), 0.01).is_default());
    }

    #[test]
    fn test_resolve_span() {
        assert_eq!(resolve_span(Some("5"), Some("50"), (0, 100)), Resolved::Provided((5, 50)));
        assert!(matches!(
            resolve_span(Some("50"), Some("5"), (0, 100)),
            Resolved::Defaulted {
                value: (0, 100),
                reason: DefaultReason::OutOfRange(_)
            }
        ));
        assert!(matches!(
            resolve_span(Some("5"), None, (0, 100)),
            Resolved::Defaulted {
                reason: DefaultReason::Unparseable(_),
                ..
            }
        ));
        assert_eq!(
            resolve_span(None, None, (0, 100)),
            Resolved::Defaulted {
                value: (0, 100),
                reason: DefaultReason::Missing
            }
        );
    }

    #[test]
    fn test_parse_counts() {
        assert_eq!(
            parse_counts("red=3, BLUE=5"),
            Some(vec![("Red".to_string(), 3), ("Blue".to_string(), 5)])
        );
        assert_eq!(parse_counts("red"), None);
        assert_eq!(parse_counts("red=x"), None);
        assert_eq!(parse_counts("red=1,Red=2"), None);
        assert_eq!(parse_counts("red=0"), None);
        assert_eq!(parse_counts(""), None);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("rED"), "Red");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_settle_returns_value() {
        assert_eq!(Resolved::Provided(3).settle("x"), 3);
        assert_eq!(
            Resolved::Defaulted {
                value: 8,
                reason: DefaultReason::OutOfRange("14".into())
            }
            .settle("sum"),
            8
        );
    }
}
