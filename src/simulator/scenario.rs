use serde::{Deserialize, Serialize};

use crate::error::SeirError;

/// Fixed epidemiological constants of a run. These are inputs, never fitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Total population `N`
    pub population: u64,
    /// Mean infectious period `D` in days, `gamma = 1 / D`
    pub infectious_period: f64,
    /// Mean incubation period `L` in days, `delta = 1 / L`
    pub incubation_period: f64,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            population: 1000,
            infectious_period: 4.0,
            incubation_period: 3.0,
        }
    }
}

impl Scenario {
    pub fn new(population: u64, infectious_period: f64, incubation_period: f64) -> Self {
        Self {
            population,
            infectious_period,
            incubation_period,
        }
    }

    /// Recovery rate `gamma`
    pub fn gamma(&self) -> f64 {
        1.0 / self.infectious_period
    }

    /// Incubation rate `delta`
    pub fn delta(&self) -> f64 {
        1.0 / self.incubation_period
    }

    pub fn population(&self) -> f64 {
        self.population as f64
    }

    pub fn validate(&self) -> Result<(), SeirError> {
        if self.population == 0 {
            return Err(SeirError::domain("population", self.population));
        }
        if !(self.infectious_period.is_finite() && self.infectious_period > 0.0) {
            return Err(SeirError::domain("infectious_period", self.infectious_period));
        }
        if !(self.incubation_period.is_finite() && self.incubation_period > 0.0) {
            return Err(SeirError::domain("incubation_period", self.incubation_period));
        }
        Ok(())
    }
}

/// Smallest accepted `rtol`/`atol`. Tighter tolerances sit below f64 round-off on the state and
/// the step-size controller stalls.
pub const MIN_TOLERANCE: f64 = 1e-12;

/// Step-size control handed to the ODE solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverTolerances {
    pub rtol: f64,
    pub atol: f64,
    /// Initial step size
    pub h0: f64,
}

impl Default for SolverTolerances {
    fn default() -> Self {
        Self {
            rtol: 1e-6,
            atol: 1e-6,
            h0: 1e-3,
        }
    }
}

impl SolverTolerances {
    pub fn validate(&self) -> Result<(), SeirError> {
        for (name, value) in [("rtol", self.rtol), ("atol", self.atol)] {
            if !(value.is_finite() && value >= MIN_TOLERANCE) {
                return Err(SeirError::domain(name, value));
            }
        }
        if !(self.h0.is_finite() && self.h0 > 0.0) {
            return Err(SeirError::domain("h0", self.h0));
        }
        Ok(())
    }
}
