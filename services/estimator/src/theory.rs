//! Closed-form reference probabilities
//!
//! Used as convergence targets for the empirical estimates.

/// n choose k as a float (exact for the small n used here)
pub fn binomial_coefficient(n: u64, k: u64) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

/// P(X = k) for X ~ Binomial(n, p)
pub fn binomial_pmf(n: u64, k: u64, p: f64) -> f64 {
    if k > n {
        return 0.0;
    }
    binomial_coefficient(n, k) * p.powi(k as i32) * (1.0 - p).powi((n - k) as i32)
}

/// P(X >= k) for X ~ Binomial(n, p)
pub fn binomial_at_least(n: u64, k: u64, p: f64) -> f64 {
    (k..=n).map(|i| binomial_pmf(n, i, p)).sum::<f64>().min(1.0)
}

/// P(sum of two fair dice == target)
pub fn two_dice_sum(target: i64) -> f64 {
    if !(2..=12).contains(&target) {
        return 0.0;
    }
    (6 - (target - 7).abs()) as f64 / 36.0
}

/// P(max of `dice` fair dice >= threshold)
pub fn dice_max_at_least(dice: u32, threshold: i64) -> f64 {
    let below = ((threshold - 1).clamp(0, 6)) as f64 / 6.0;
    1.0 - below.powi(dice as i32)
}

/// P(every one of `dice` fair dice > threshold)
pub fn dice_all_greater_than(dice: u32, threshold: i64) -> f64 {
    let above = ((6 - threshold).clamp(0, 6)) as f64 / 6.0;
    above.powi(dice as i32)
}

/// P(at least one of `tosses` fair coin tosses shows a given face)
pub fn at_least_one_of(tosses: u32) -> f64 {
    1.0 - 0.5f64.powi(tosses as i32)
}

/// Share of [space_low, space_high) that falls inside [search_low, search_high)
///
/// Widths are taken in i128; a span over the whole of i64 does not fit in i64.
pub fn uniform_range_share(space_low: i64, space_high: i64, search_low: i64, search_high: i64) -> f64 {
    let width = i128::from(space_high) - i128::from(space_low);
    if width <= 0 {
        return 0.0;
    }
    let overlap = (i128::from(search_high.min(space_high)) - i128::from(search_low.max(space_low))).max(0);
    overlap as f64 / width as f64
}

/// Share of even integers in [low, high)
pub fn even_share(low: i64, high: i64) -> f64 {
    let (low, high) = (i128::from(low), i128::from(high));
    let width = high - low;
    if width <= 0 {
        return 0.0;
    }
    let evens = high.div_euclid(2) - low.div_euclid(2)
        + i128::from(high.rem_euclid(2) != 0)
        - i128::from(low.rem_euclid(2) != 0);
    evens as f64 / width as f64
}

/// P(|A - B| > gap) for A, B ~ U[0, window)
pub fn arrivals_miss(window: f64, gap: f64) -> f64 {
    if gap >= window {
        return 0.0;
    }
    let free = (window - gap.max(0.0)) / window;
    free * free
}

/// P(digit appears exactly `repeats` times) in a number whose first digit is
/// uniform over `first_digits` and whose `tail_len` other digits are uniform 0-9
pub fn digit_repeats(digit: i64, repeats: u64, first_digits: std::ops::Range<i64>, tail_len: u64) -> f64 {
    let choices = (first_digits.end - first_digits.start).max(1) as f64;
    let p_first = if first_digits.contains(&digit) {
        1.0 / choices
    } else {
        0.0
    };
    let with_first = if repeats >= 1 {
        binomial_pmf(tail_len, repeats - 1, 0.1)
    } else {
        0.0
    };
    p_first * with_first + (1.0 - p_first) * binomial_pmf(tail_len, repeats, 0.1)
}

/// Bayes: P(diseased | positive test)
pub fn positive_predictive_value(prevalence: f64, true_positive_rate: f64, false_positive_rate: f64) -> f64 {
    let true_positive = prevalence * true_positive_rate;
    let false_positive = (1.0 - prevalence) * false_positive_rate;
    let positive = true_positive + false_positive;
    if positive == 0.0 {
        0.0
    } else {
        true_positive / positive
    }
}
