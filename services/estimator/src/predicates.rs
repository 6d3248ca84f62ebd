//! Row predicates and row-wise reductions
//!
//! A multi-draw trial ("three dice", "ten free throws", "a 10-digit number")
//! is reduced by mapping the row to a scalar (sum, max, count of matches)
//! and then testing that scalar. The builders here return closures that can
//! be passed straight to `reduce`.

use crate::types::Sample;

/// Integer values of a row; real samples are skipped
pub fn ints(row: &[Sample]) -> impl Iterator<Item = i64> + '_ {
    row.iter().filter_map(Sample::as_i64)
}

pub fn row_sum(row: &[Sample]) -> i64 {
    ints(row).sum()
}

pub fn row_max(row: &[Sample]) -> Option<i64> {
    ints(row).max()
}

pub fn row_min(row: &[Sample]) -> Option<i64> {
    ints(row).min()
}

/// Number of samples in the row equal to `value`
pub fn count_matches(row: &[Sample], value: i64) -> usize {
    ints(row).filter(|v| *v == value).count()
}

/// Number of categorical samples equal to `category`
pub fn count_category(row: &[Sample], category: usize) -> usize {
    row.iter().filter(|s| s.category() == Some(category)).count()
}

/// Positions where `row` agrees with `key`
pub fn agreements(row: &[Sample], key: &[Sample]) -> usize {
    row.iter().zip(key).filter(|(a, b)| a == b).count()
}

/// First column satisfies `test` (single-draw trials)
pub fn first_int(test: impl Fn(i64) -> bool) -> impl Fn(&[Sample]) -> bool {
    move |row| row.first().and_then(Sample::as_i64).map_or(false, &test)
}

/// Last column satisfies `test` (e.g. last digit of a number)
pub fn last_int(test: impl Fn(i64) -> bool) -> impl Fn(&[Sample]) -> bool {
    move |row| row.last().and_then(Sample::as_i64).map_or(false, &test)
}

pub fn equals(value: i64) -> impl Fn(&[Sample]) -> bool {
    first_int(move |v| v == value)
}

pub fn is_even() -> impl Fn(&[Sample]) -> bool {
    first_int(|v| v.rem_euclid(2) == 0)
}

/// First column lies in [low, high)
pub fn in_range(low: i64, high: i64) -> impl Fn(&[Sample]) -> bool {
    first_int(move |v| low <= v && v < high)
}

pub fn category_is(category: usize) -> impl Fn(&[Sample]) -> bool {
    move |row| row.first().and_then(Sample::category) == Some(category)
}

/// Any sample in the row is `category`
pub fn any_category(category: usize) -> impl Fn(&[Sample]) -> bool {
    move |row| count_category(row, category) > 0
}

/// At least `k` samples in the row are `category`
pub fn category_at_least(category: usize, k: usize) -> impl Fn(&[Sample]) -> bool {
    move |row| count_category(row, category) >= k
}

pub fn sum_equals(target: i64) -> impl Fn(&[Sample]) -> bool {
    move |row| row_sum(row) == target
}

/// Row maximum is at least `threshold`
pub fn max_at_least(threshold: i64) -> impl Fn(&[Sample]) -> bool {
    move |row| row_max(row).map_or(false, |max| max >= threshold)
}

/// Every sample in the row is strictly greater than `threshold`
pub fn all_greater_than(threshold: i64) -> impl Fn(&[Sample]) -> bool {
    move |row| row_min(row).map_or(false, |min| min > threshold)
}

/// `value` appears exactly `times` times in the row
pub fn count_equals(value: i64, times: usize) -> impl Fn(&[Sample]) -> bool {
    move |row| count_matches(row, value) == times
}

/// Point (row[0], row[1]) lies inside the circle of `radius` at the origin
pub fn inside_circle(radius: f64) -> impl Fn(&[Sample]) -> bool {
    let radius_sq = radius * radius;
    move |row| match row {
        [x, y, ..] => {
            let (x, y) = (x.as_f64(), y.as_f64());
            x * x + y * y <= radius_sq
        }
        _ => false,
    }
}

/// row[0] >= row[1]: the point lies on or below the diagonal of the unit square
pub fn on_or_below_diagonal() -> impl Fn(&[Sample]) -> bool {
    |row| match row {
        [x, y, ..] => x.as_f64() >= y.as_f64(),
        _ => false,
    }
}

/// |row[0] - row[1]| > gap
pub fn gap_exceeds(gap: f64) -> impl Fn(&[Sample]) -> bool {
    move |row| match row {
        [a, b, ..] => (a.as_f64() - b.as_f64()).abs() > gap,
        _ => false,
    }
}
