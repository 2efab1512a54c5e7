//! Time-varying transmission
//!
//! The reproduction number moves from `r0_start` to `r0_end` along a logistic curve centred on
//! `x0`. The transmission rate used by the ODE system is `beta(t) = R0(t) * gamma`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SeirError;

/// Logistic transition of the reproduction number.
///
/// Tends to `r0_start` as `t -> -inf` and to `r0_end` as `t -> +inf`. At `t = x0` the value is the
/// midpoint of the two levels. `k` sets the steepness; `k = 0` evaluates to the midpoint everywhere.
#[inline(always)]
pub fn logistic_r0(t: f64, r0_start: f64, k: f64, x0: f64, r0_end: f64) -> f64 {
    (r0_start - r0_end) / (1.0 + (-k * (-t + x0)).exp()) + r0_end
}

/// The four fitted parameters of the transmission schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    pub r0_start: f64,
    pub k: f64,
    pub x0: f64,
    pub r0_end: f64,
}

impl ModelParams {
    pub const NAMES: [&'static str; 4] = ["r0_start", "k", "x0", "r0_end"];

    pub fn new(r0_start: f64, k: f64, x0: f64, r0_end: f64) -> Self {
        Self {
            r0_start,
            k,
            x0,
            r0_end,
        }
    }

    /// Build from a slice in [`ModelParams::NAMES`] order.
    pub fn from_slice(values: &[f64]) -> Result<Self, SeirError> {
        match values {
            [r0_start, k, x0, r0_end] => Ok(Self::new(*r0_start, *k, *x0, *r0_end)),
            _ => Err(SeirError::domain("params.len()", values.len())),
        }
    }

    pub fn to_vec(&self) -> Vec<f64> {
        vec![self.r0_start, self.k, self.x0, self.r0_end]
    }

    /// Reject non-finite values, negative reproduction numbers and a negative steepness.
    ///
    /// `k < 0` would mirror the schedule in time (R0 moving from `r0_end` to `r0_start`), so the
    /// fitted labels would no longer mean what they say.
    pub fn validate(&self) -> Result<(), SeirError> {
        for (name, value) in Self::NAMES.iter().zip(self.to_vec()) {
            if !value.is_finite() {
                return Err(SeirError::domain(name, value));
            }
        }
        if self.r0_start < 0.0 {
            return Err(SeirError::domain("r0_start", self.r0_start));
        }
        if self.r0_end < 0.0 {
            return Err(SeirError::domain("r0_end", self.r0_end));
        }
        if self.k < 0.0 {
            return Err(SeirError::domain("k", self.k));
        }
        Ok(())
    }

    #[inline(always)]
    pub fn r0(&self, t: f64) -> f64 {
        logistic_r0(t, self.r0_start, self.k, self.x0, self.r0_end)
    }
}

impl fmt::Display for ModelParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{r0_start: {}, k: {}, x0: {}, r0_end: {}}}",
            self.r0_start, self.k, self.x0, self.r0_end
        )
    }
}

/// Source of the transmission rate `beta(t)` seen by the ODE system.
pub trait TransmissionRate {
    fn beta(&self, t: f64) -> f64;
}

impl<F> TransmissionRate for F
where
    F: Fn(f64) -> f64,
{
    #[inline(always)]
    fn beta(&self, t: f64) -> f64 {
        self(t)
    }
}

/// Logistic schedule together with the recovery rate needed to turn `R0(t)` into `beta(t)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transmission {
    params: ModelParams,
    gamma: f64,
}

impl Transmission {
    pub fn new(params: ModelParams, gamma: f64) -> Self {
        Self { params, gamma }
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Prescribed reproduction number at `t`.
    #[inline(always)]
    pub fn r0(&self, t: f64) -> f64 {
        self.params.r0(t)
    }
}

impl TransmissionRate for Transmission {
    #[inline(always)]
    fn beta(&self, t: f64) -> f64 {
        self.params.r0(t) * self.gamma
    }
}
