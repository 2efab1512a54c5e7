use crate::error::SeirError;

/// CDC reopening guideline: 10 reported infections per 100k population every 14 days.
const REOPEN_CASES_PER_100K: f64 = 10.0;
const REOPEN_PERIOD_DAYS: f64 = 14.0;

/// Daily increments of a cumulative series. The first day has no predecessor and is set to 0.
pub fn daily_increments(cumulative: &[f64]) -> Vec<f64> {
    let mut daily = Vec::with_capacity(cumulative.len());
    if !cumulative.is_empty() {
        daily.push(0.0);
    }
    daily.extend(cumulative.windows(2).map(|w| w[1] - w[0]));
    daily
}

/// Centered moving average over `window` points.
///
/// The window at position `i` spans `window / 2` points before and `window - 1 - window / 2`
/// points after `i`. Positions without a complete window are `NaN`, and any `NaN` inside a window
/// propagates to the result.
pub fn rolling_mean_centered(values: &[f64], window: usize) -> Result<Vec<f64>, SeirError> {
    if window == 0 {
        return Err(SeirError::domain("window", window));
    }
    let before = window / 2;
    let after = window - 1 - before;
    let n = values.len();
    let out = (0..n)
        .map(|i| {
            if i < before || i + after >= n {
                return f64::NAN;
            }
            let sum: f64 = values[i - before..=i + after].iter().sum();
            sum / window as f64
        })
        .collect();
    Ok(out)
}

/// Daily case count below which a region meets the reopening guideline.
pub fn reopen_threshold(population: u64) -> u64 {
    (population as f64 * REOPEN_CASES_PER_100K / 100_000.0 / REOPEN_PERIOD_DAYS).ceil() as u64
}
