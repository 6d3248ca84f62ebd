//! Derived statistics over a trial batch
//!
//! Beyond a single success count, several scenarios report a whole
//! distribution (faces of a die, wheel sections), a per-class tally
//! (confusion matrix) or a min/max/mean of a per-row scalar.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::{InvalidParameterError, Result};
use crate::types::{Sample, TrialBatch};

/// Observed count and share of one discrete value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frequency {
    pub value: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub count: usize,
    pub share: f64,
}

/// Min / max / mean of a per-row scalar
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RowSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Counts of `map(row)` over the batch, ordered by value
pub fn value_counts<F>(batch: &TrialBatch, map: F) -> Vec<Frequency>
where
    F: Fn(&[Sample]) -> i64,
{
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for row in batch.rows() {
        *counts.entry(map(row)).or_default() += 1;
    }
    let total = batch.len() as f64;
    counts
        .into_iter()
        .map(|(value, count)| Frequency {
            value,
            label: None,
            count,
            share: count as f64 / total,
        })
        .collect()
}

/// Distribution of one discrete column
pub fn frequencies(batch: &TrialBatch, column: usize) -> Result<Vec<Frequency>> {
    if batch.column(column)?.any(|sample| sample.as_i64().is_none()) {
        return Err(InvalidParameterError::NonDiscreteColumn { column });
    }
    Ok(value_counts(batch, |row| row[column].as_i64().unwrap_or_default()))
}

/// Attach display labels, e.g. categorical names or "Contestant 3"
pub fn label_frequencies<F>(frequencies: Vec<Frequency>, label: F) -> Vec<Frequency>
where
    F: Fn(i64) -> Option<String>,
{
    frequencies
        .into_iter()
        .map(|f| Frequency {
            label: label(f.value),
            ..f
        })
        .collect()
}

/// Count rows per class assigned by `classify`
pub fn tally<K, F>(batch: &TrialBatch, classify: F) -> BTreeMap<K, usize>
where
    K: Ord,
    F: Fn(&[Sample]) -> K,
{
    let mut counts = BTreeMap::new();
    for row in batch.rows() {
        *counts.entry(classify(row)).or_default() += 1;
    }
    counts
}

/// Min / max / mean of `map(row)` over the batch
pub fn summarize<F>(batch: &TrialBatch, map: F) -> RowSummary
where
    F: Fn(&[Sample]) -> f64,
{
    let (min, max, sum) = batch.rows().map(map).fold(
        (f64::INFINITY, f64::NEG_INFINITY, 0.0),
        |(min, max, sum), value| (min.min(value), max.max(value), sum + value),
    );
    RowSummary {
        min,
        max,
        mean: sum / batch.len() as f64,
    }
}

/// Most and least frequent entries (ties resolve to the smallest value)
pub fn extremes(frequencies: &[Frequency]) -> Option<(&Frequency, &Frequency)> {
    let most = frequencies
        .iter()
        .reduce(|best, f| if f.count > best.count { f } else { best })?;
    let least = frequencies
        .iter()
        .reduce(|best, f| if f.count < best.count { f } else { best })?;
    Some((most, least))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::Estimator;
    use crate::predicates::{count_category, row_sum};
    use crate::types::{Distribution, SamplingRule};

    fn dice_batch(width: usize, n: usize) -> TrialBatch {
        let rule = SamplingRule::repeat(Distribution::uniform_int(1, 7).unwrap(), width).unwrap();
        Estimator::seeded(42).generate(&rule, n).unwrap()
    }

    #[test]
    fn test_frequencies_cover_all_faces() {
        let batch = dice_batch(1, 60_000);
        let freqs = frequencies(&batch, 0).unwrap();

        assert_eq!(freqs.len(), 6);
        assert_eq!(freqs.iter().map(|f| f.count).sum::<usize>(), 60_000);
        for (face, freq) in (1..=6).zip(&freqs) {
            assert_eq!(freq.value, face);
            assert!((freq.share - 1.0 / 6.0).abs() < 0.01);
        }
    }

    #[test]
    fn test_frequencies_reject_bad_columns() {
        let batch = dice_batch(1, 10);
        assert_eq!(
            frequencies(&batch, 1).unwrap_err().code(),
            "VALIDATION_COLUMN_OUT_OF_BOUNDS"
        );

        let rule = SamplingRule::single(Distribution::uniform_real(0.0, 1.0).unwrap()).unwrap();
        let reals = Estimator::seeded(1).generate(&rule, 10).unwrap();
        assert_eq!(
            frequencies(&reals, 0),
            Err(InvalidParameterError::NonDiscreteColumn { column: 0 })
        );
    }

    #[test]
    fn test_value_counts_of_row_sums() {
        let batch = dice_batch(2, 36_000);
        let sums = value_counts(&batch, row_sum);
        assert_eq!(sums.first().map(|f| f.value), Some(2));
        assert_eq!(sums.last().map(|f| f.value), Some(12));
        let seven = sums.iter().find(|f| f.value == 7).unwrap();
        assert!((seven.share - 6.0 / 36.0).abs() < 0.01);
    }

    #[test]
    fn test_label_frequencies() {
        let labelled = label_frequencies(frequencies(&dice_batch(1, 100), 0).unwrap(), |v| {
            Some(format!("Face {}", v))
        });
        assert!(labelled
            .iter()
            .all(|f| f.label.as_deref() == Some(&*format!("Face {}", f.value))));
    }

    #[test]
    fn test_tally_and_summary() {
        let coin = Distribution::categorical(["Miss", "Hit"]).unwrap();
        let rule = SamplingRule::repeat(coin, 10).unwrap();
        let batch = Estimator::seeded(8).generate(&rule, 5_000).unwrap();

        let by_parity = tally(&batch, |row| count_category(row, 1) % 2 == 0);
        assert_eq!(by_parity.values().sum::<usize>(), 5_000);

        let summary = summarize(&batch, |row| count_category(row, 1) as f64);
        assert!(summary.min >= 0.0 && summary.max <= 10.0);
        assert!((summary.mean - 5.0).abs() < 0.2);
    }

    #[test]
    fn test_extremes() {
        let freqs = vec![
            Frequency { value: 1, label: None, count: 4, share: 0.4 },
            Frequency { value: 2, label: None, count: 5, share: 0.5 },
            Frequency { value: 3, label: None, count: 1, share: 0.1 },
        ];
        let (most, least) = extremes(&freqs).unwrap();
        assert_eq!(most.value, 2);
        assert_eq!(least.value, 3);
        assert!(extremes(&[]).is_none());
    }
}
