use serde::{Deserialize, Serialize};

use super::smoothing::{daily_increments, rolling_mean_centered};
use crate::error::SeirError;

/// Ordered daily case counts for one region, day 0 being the first recorded day.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObservedSeries {
    values: Vec<f64>,
}

impl ObservedSeries {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Daily series from cumulative totals.
    pub fn from_cumulative(cumulative: &[f64]) -> Self {
        Self::new(daily_increments(cumulative))
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Centered rolling mean; edges without a full window become missing values.
    pub fn rolling_mean(&self, window: usize) -> Result<Self, SeirError> {
        Ok(Self::new(rolling_mean_centered(&self.values, window)?))
    }

    /// Replace every non-finite value with 0 and return how many were replaced.
    ///
    /// This is lossy: the edges of a centered rolling mean become zero cases, which biases the
    /// first and last few days of a fit downwards.
    pub fn fill_missing_zero(&mut self) -> usize {
        let mut filled = 0;
        for value in self.values.iter_mut().filter(|v| !v.is_finite()) {
            *value = 0.0;
            filled += 1;
        }
        if filled > 0 {
            tracing::warn!(filled, "replaced missing observed values with zero");
        }
        filled
    }

    /// The first `len` days (or the whole series if shorter).
    pub fn window(&self, len: usize) -> Self {
        Self::new(self.values[..len.min(self.values.len())].to_vec())
    }

    /// Align the series with the model's day index.
    ///
    /// A non-negative `outbreak_shift` prepends that many zero days (the epidemic started before
    /// the first record). A negative shift drops the first `|outbreak_shift|` observations. In both
    /// cases the aligned length is `outbreak_shift + len()`.
    pub fn align(&self, outbreak_shift: i64) -> Result<AlignedSeries, SeirError> {
        if self.is_empty() {
            return Err(SeirError::domain("observed.len()", 0));
        }
        let skipped = if outbreak_shift < 0 {
            usize::try_from(outbreak_shift.unsigned_abs()).unwrap_or(usize::MAX)
        } else {
            0
        };
        if skipped >= self.len() {
            return Err(SeirError::domain("outbreak_shift", outbreak_shift));
        }
        if let Some((index, &value)) = self
            .values
            .iter()
            .enumerate()
            .skip(skipped)
            .find(|(_, v)| !v.is_finite())
        {
            return Err(SeirError::InvalidObservedData { index, value });
        }

        let padding = usize::try_from(outbreak_shift.max(0))
            .map_err(|_| SeirError::domain("outbreak_shift", outbreak_shift))?;
        let days = padding
            .checked_add(self.len() - skipped)
            .ok_or_else(|| SeirError::domain("outbreak_shift", outbreak_shift))?;
        let mut values: Vec<f64> = Vec::new();
        values
            .try_reserve_exact(days)
            .map_err(|_| SeirError::domain("outbreak_shift", outbreak_shift))?;
        values.resize(padding, 0.0);
        values.extend_from_slice(&self.values[skipped..]);
        Ok(AlignedSeries {
            values,
            outbreak_shift,
        })
    }
}

impl From<Vec<f64>> for ObservedSeries {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

/// Observed values on the model's day index, ready to be compared with a simulation of
/// [`AlignedSeries::days`] days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedSeries {
    values: Vec<f64>,
    outbreak_shift: i64,
}

impl AlignedSeries {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn outbreak_shift(&self) -> i64 {
        self.outbreak_shift
    }

    /// Number of simulated days needed to cover the series.
    pub fn days(&self) -> usize {
        self.values.len()
    }
}
