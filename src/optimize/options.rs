use serde::{Deserialize, Serialize};

use crate::{error::SeirError, simulator::SolverTolerances};

/// Budget and tolerances of a fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    /// Nelder-Mead iterations allowed per run
    pub max_iters: u64,
    /// Standard deviation of the simplex costs below which a run has converged.
    ///
    /// Costs are the sum of squared residuals divided by the sum of squared observations.
    pub sd_tolerance: f64,
    /// Extra runs restarted from the best vertex of the previous one
    pub restarts: usize,
    /// Number of leading observed days used for the fit (`None` uses all of them)
    pub window: Option<usize>,
    /// ODE solver tolerances used while fitting
    pub tolerances: SolverTolerances,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iters: 2000,
            sd_tolerance: 1e-10,
            restarts: 3,
            window: Some(40),
            tolerances: SolverTolerances::default(),
        }
    }
}

impl FitOptions {
    pub fn validate(&self) -> Result<(), SeirError> {
        if self.max_iters == 0 {
            return Err(SeirError::domain("max_iters", self.max_iters));
        }
        if !(self.sd_tolerance.is_finite() && self.sd_tolerance > 0.0) {
            return Err(SeirError::domain("sd_tolerance", self.sd_tolerance));
        }
        if self.window == Some(0) {
            return Err(SeirError::domain("window", 0));
        }
        self.tolerances.validate()
    }
}
