mod ode;
pub mod scenario;
pub mod seir;
pub mod trajectory;
pub mod transmission;

pub use scenario::{Scenario, SolverTolerances};
pub use seir::{derivatives, Compartments, NSTATES};
pub use trajectory::Trajectory;
pub use transmission::{logistic_r0, ModelParams, Transmission, TransmissionRate};

use crate::error::SeirError;

pub(crate) type T = f64;
pub(crate) type V = nalgebra::DVector<T>;
pub(crate) type M = nalgebra::DMatrix<T>;

/// Stateless SEIR simulator for one [`Scenario`].
///
/// Every call to [`Simulator::simulate`] starts from `S = N - 1, E = 1, I = 0, R = 0` and returns a
/// new [`Trajectory`]; nothing is shared between calls, so a `Simulator` can be used from several
/// threads at once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Simulator {
    scenario: Scenario,
    tolerances: SolverTolerances,
}

impl Simulator {
    pub fn new(scenario: Scenario) -> Result<Self, SeirError> {
        Self::with_tolerances(scenario, SolverTolerances::default())
    }

    pub fn with_tolerances(
        scenario: Scenario,
        tolerances: SolverTolerances,
    ) -> Result<Self, SeirError> {
        scenario.validate()?;
        tolerances.validate()?;
        Ok(Self {
            scenario,
            tolerances,
        })
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn tolerances(&self) -> &SolverTolerances {
        &self.tolerances
    }

    /// Simulate `days` daily steps, `t = 0..days - 1`.
    pub fn simulate(&self, days: usize, params: &ModelParams) -> Result<Trajectory, SeirError> {
        if days == 0 {
            return Err(SeirError::domain("days", days));
        }
        params.validate()?;
        tracing::debug!(days, %params, "simulating SEIR trajectory");
        ode::integrate(days, &self.scenario, params, &self.tolerances)
    }
}

/// Simulate with default solver tolerances.
pub fn simulate(
    days: usize,
    scenario: &Scenario,
    params: &ModelParams,
) -> Result<Trajectory, SeirError> {
    Simulator::new(*scenario)?.simulate(days, params)
}
