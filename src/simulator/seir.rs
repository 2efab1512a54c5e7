//! SEIR right-hand side
//!
//! ```text
//! dS/dt = -beta(t) S I / N
//! dE/dt =  beta(t) S I / N - delta E
//! dI/dt =  delta E - gamma I
//! dR/dt =  gamma I
//! ```
//!
//! The four derivatives always sum to zero, so `S + E + I + R = N` is conserved. Negative
//! compartment values are passed through untouched; the solver can produce tiny negative values
//! near zero crossings and they are not corrected here.

use serde::{Deserialize, Serialize};

use super::transmission::TransmissionRate;
use crate::error::SeirError;

/// Number of compartments
pub const NSTATES: usize = 4;

/// One `(S, E, I, R)` state, or a derivative of one.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Compartments {
    pub s: f64,
    pub e: f64,
    pub i: f64,
    pub r: f64,
}

impl Compartments {
    pub fn new(s: f64, e: f64, i: f64, r: f64) -> Self {
        Self { s, e, i, r }
    }

    /// A fully susceptible population with a single exposed individual.
    pub fn initial(population: f64) -> Self {
        Self::new(population - 1.0, 1.0, 0.0, 0.0)
    }

    pub fn total(&self) -> f64 {
        self.s + self.e + self.i + self.r
    }

    pub fn is_finite(&self) -> bool {
        self.s.is_finite() && self.e.is_finite() && self.i.is_finite() && self.r.is_finite()
    }

    pub fn to_array(&self) -> [f64; NSTATES] {
        [self.s, self.e, self.i, self.r]
    }
}

/// Instantaneous SEIR derivatives at `(state, t)`.
///
/// Fails with [`SeirError::Domain`] when `population <= 0` or a rate is negative or non-finite.
pub fn derivatives<B: TransmissionRate + ?Sized>(
    state: &Compartments,
    t: f64,
    population: f64,
    beta: &B,
    gamma: f64,
    delta: f64,
) -> Result<Compartments, SeirError> {
    if !(population.is_finite() && population > 0.0) {
        return Err(SeirError::domain("population", population));
    }
    if !(gamma.is_finite() && gamma >= 0.0) {
        return Err(SeirError::domain("gamma", gamma));
    }
    if !(delta.is_finite() && delta >= 0.0) {
        return Err(SeirError::domain("delta", delta));
    }
    Ok(rhs(state, beta.beta(t), population, gamma, delta))
}

/// Unchecked right-hand side, `beta` already evaluated at `t`.
#[inline(always)]
pub(crate) fn rhs(
    state: &Compartments,
    beta: f64,
    population: f64,
    gamma: f64,
    delta: f64,
) -> Compartments {
    let infection = beta * state.s * state.i / population;
    let incubation = delta * state.e;
    let recovery = gamma * state.i;
    Compartments {
        s: -infection,
        e: infection - incubation,
        i: incubation - recovery,
        r: recovery,
    }
}

/// Jacobian of [`rhs`] at `state` applied to the direction `v`.
#[inline(always)]
pub(crate) fn jac_mul(
    state: &Compartments,
    v: &Compartments,
    beta: f64,
    population: f64,
    gamma: f64,
    delta: f64,
) -> Compartments {
    let infection = beta * (v.s * state.i + state.s * v.i) / population;
    let incubation = delta * v.e;
    let recovery = gamma * v.i;
    Compartments {
        s: -infection,
        e: infection - incubation,
        i: incubation - recovery,
        r: recovery,
    }
}
