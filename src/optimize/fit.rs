use argmin::{
    core::{CostFunction, Error, Executor, TerminationReason, TerminationStatus},
    solver::neldermead::NelderMead,
};
use serde::{Deserialize, Serialize};

use super::{bounds::ParamBounds, options::FitOptions};
use crate::{
    data::{AlignedSeries, ObservedSeries},
    error::SeirError,
    simulator::{ModelParams, Scenario, Simulator, Trajectory},
};

/// Weight of the out-of-bounds penalty added to the normalized cost.
const OUT_OF_BOUNDS_WEIGHT: f64 = 1e3;
/// Initial simplex edge as a fraction of each parameter's box width.
const SIMPLEX_STEP: f64 = 0.1;

/// Best-fit transmission parameters for one observed series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub params: ModelParams,
    /// Sum of squared residuals between the Infected trajectory and the aligned data
    pub cost: f64,
    /// Nelder-Mead iterations over all restarts
    pub iterations: u64,
    pub outbreak_shift: i64,
    /// Observed values on the model's day index, as they were fitted
    pub observed: Vec<f64>,
}

impl FitResult {
    /// Number of simulated days the fit covered.
    pub fn days(&self) -> usize {
        self.observed.len()
    }

    pub fn rmse(&self) -> f64 {
        (self.cost / self.days() as f64).sqrt()
    }

    /// Re-run the fitted model over the fitted horizon, e.g. to plot it against the data.
    pub fn trajectory(&self, simulator: &Simulator) -> Result<Trajectory, SeirError> {
        simulator.simulate(self.days(), &self.params)
    }
}

#[derive(Clone, Copy)]
struct LeastSquares<'a> {
    simulator: &'a Simulator,
    bounds: &'a ParamBounds,
    observed: &'a [f64],
    scale: f64,
}

impl<'a> LeastSquares<'a> {
    fn new(simulator: &'a Simulator, bounds: &'a ParamBounds, observed: &'a [f64]) -> Self {
        let scale = observed.iter().map(|y| y * y).sum::<f64>().max(1.0);
        Self {
            simulator,
            bounds,
            observed,
            scale,
        }
    }

    fn sse(&self, params: &ModelParams) -> Result<f64, SeirError> {
        let trajectory = self.simulator.simulate(self.observed.len(), params)?;
        Ok(trajectory
            .infected()
            .iter()
            .zip(self.observed)
            .map(|(model, data)| (model - data).powi(2))
            .sum())
    }
}

impl CostFunction for LeastSquares<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, point: &Self::Param) -> Result<Self::Output, Error> {
        let (params, excess) = self.bounds.project(point)?;
        let normalized = self.sse(&params)? / self.scale;
        let penalty = OUT_OF_BOUNDS_WEIGHT * excess;
        Ok(normalized * (1.0 + penalty) + penalty)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Run {
    point: Vec<f64>,
    cost: f64,
    iterations: u64,
    converged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunOutcome {
    /// Converged and improved on the best run: restart from it.
    Restart,
    /// Converged without a meaningful improvement: it becomes the result.
    Finished,
    /// Did not converge, or converged to a worse point: stop and keep the best run.
    KeepBest,
    /// The first run did not converge.
    Failed,
}

/// Decide what a finished Nelder-Mead run means for the fit, given the best converged run so far.
fn run_outcome(best: Option<&Run>, run: &Run, sd_tolerance: f64) -> RunOutcome {
    match (best, run.converged) {
        (None, false) => RunOutcome::Failed,
        (Some(_), false) => RunOutcome::KeepBest,
        (None, true) => RunOutcome::Restart,
        (Some(best), true) => {
            let improvement = best.cost - run.cost;
            if improvement < 0.0 {
                RunOutcome::KeepBest
            } else if improvement <= sd_tolerance {
                RunOutcome::Finished
            } else {
                RunOutcome::Restart
            }
        }
    }
}

fn optimizer_error(err: Error) -> SeirError {
    match err.downcast::<SeirError>() {
        Ok(err) => err,
        Err(err) => SeirError::Optimizer(err.to_string()),
    }
}

/// Simplex around `start` with one edge per parameter, stepping inwards at the upper bound.
fn create_initial_simplex(start: &[f64], bounds: &ParamBounds) -> Vec<Vec<f64>> {
    let mut vertices = Vec::with_capacity(start.len() + 1);
    vertices.push(start.to_vec());

    for (i, spec) in bounds.specs().iter().enumerate() {
        let step = if spec.width() > 0.0 {
            SIMPLEX_STEP * spec.width()
        } else {
            0.00025
        };
        let mut vertex = start.to_vec();
        vertex[i] = if start[i] + step <= spec.max {
            start[i] + step
        } else {
            start[i] - step
        };
        vertices.push(vertex);
    }

    vertices
}

/// Bounded least-squares fit of the transmission schedule to an observed Infected curve.
#[derive(Debug, Clone)]
pub struct Fitter {
    simulator: Simulator,
    bounds: ParamBounds,
    options: FitOptions,
}

impl Fitter {
    pub fn new(
        scenario: Scenario,
        bounds: ParamBounds,
        options: FitOptions,
    ) -> Result<Self, SeirError> {
        bounds.validate()?;
        options.validate()?;
        let simulator = Simulator::with_tolerances(scenario, options.tolerances)?;
        Ok(Self {
            simulator,
            bounds,
            options,
        })
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    pub fn bounds(&self) -> &ParamBounds {
        &self.bounds
    }

    pub fn options(&self) -> &FitOptions {
        &self.options
    }

    /// Window the observed series and align it with the model's day index.
    ///
    /// Missing values are not filled here; call [`ObservedSeries::fill_missing_zero`] first.
    pub fn prepare(
        &self,
        observed: &ObservedSeries,
        outbreak_shift: i64,
    ) -> Result<AlignedSeries, SeirError> {
        match self.options.window {
            Some(len) => observed.window(len).align(outbreak_shift),
            None => observed.align(outbreak_shift),
        }
    }

    /// Fit starting from the initial guesses of the bounds.
    pub fn fit(
        &self,
        observed: &ObservedSeries,
        outbreak_shift: i64,
    ) -> Result<FitResult, SeirError> {
        let aligned = self.prepare(observed, outbreak_shift)?;
        self.fit_aligned(&aligned, &self.bounds.initial())
    }

    /// Fit an already aligned series from `start`.
    pub fn fit_aligned(
        &self,
        aligned: &AlignedSeries,
        start: &ModelParams,
    ) -> Result<FitResult, SeirError> {
        let problem = LeastSquares::new(&self.simulator, &self.bounds, aligned.values());
        tracing::info!(
            days = aligned.days(),
            outbreak_shift = aligned.outbreak_shift(),
            %start,
            "fitting SEIR transmission schedule"
        );

        let initial = start.to_vec();
        let mut iterations = 0;
        let mut best: Option<Run> = None;
        for restart in 0..=self.options.restarts {
            let from = best.as_ref().map_or(initial.as_slice(), |run| run.point.as_slice());
            let run = self.minimize(problem, from)?;
            iterations += run.iterations;
            match run_outcome(best.as_ref(), &run, self.options.sd_tolerance) {
                RunOutcome::Failed => {
                    let (params, _) = self.bounds.project(&run.point)?;
                    return Err(SeirError::FitDidNotConverge {
                        params,
                        iterations,
                        cost: problem.sse(&params)?,
                    });
                }
                RunOutcome::KeepBest => {
                    tracing::warn!(
                        restart,
                        cost = run.cost,
                        converged = run.converged,
                        "restart did not improve the fit, keeping the best converged run"
                    );
                    break;
                }
                RunOutcome::Finished => {
                    tracing::debug!(restart, cost = run.cost, "Nelder-Mead run converged");
                    best = Some(run);
                    break;
                }
                RunOutcome::Restart => {
                    tracing::debug!(restart, cost = run.cost, "Nelder-Mead run converged");
                    best = Some(run);
                }
            }
        }

        let best =
            best.ok_or_else(|| SeirError::Optimizer("no Nelder-Mead run was accepted".into()))?;
        let (params, _) = self.bounds.project(&best.point)?;
        let cost = problem.sse(&params)?;
        tracing::info!(%params, cost, iterations, "fit converged");
        Ok(FitResult {
            params,
            cost,
            iterations,
            outbreak_shift: aligned.outbreak_shift(),
            observed: aligned.values().to_vec(),
        })
    }

    fn minimize(&self, problem: LeastSquares<'_>, start: &[f64]) -> Result<Run, SeirError> {
        let simplex = create_initial_simplex(start, &self.bounds);
        let solver: NelderMead<Vec<f64>, f64> = NelderMead::new(simplex)
            .with_sd_tolerance(self.options.sd_tolerance)
            .map_err(optimizer_error)?;
        let res = Executor::new(problem, solver)
            .configure(|state| state.max_iters(self.options.max_iters))
            .run()
            .map_err(optimizer_error)?;

        let state = res.state;
        let converged = matches!(
            state.termination_status,
            TerminationStatus::Terminated(
                TerminationReason::SolverConverged | TerminationReason::TargetCostReached
            )
        );
        let point = state
            .best_param
            .ok_or_else(|| SeirError::Optimizer("Nelder-Mead returned no parameters".into()))?;
        Ok(Run {
            point,
            cost: state.best_cost,
            iterations: state.iter,
            converged,
        })
    }
}
