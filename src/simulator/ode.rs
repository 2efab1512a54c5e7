use diffsol::{NalgebraLU, OdeBuilder, OdeSolverMethod, OdeSolverStopReason};

use super::{
    scenario::{Scenario, SolverTolerances},
    seir::{self, Compartments, NSTATES},
    trajectory::Trajectory,
    transmission::{ModelParams, Transmission, TransmissionRate},
    M, T, V,
};
use crate::error::SeirError;

/// Internal solver steps allowed between two consecutive grid points.
const MAX_STEPS_PER_DAY: usize = 100_000;

#[inline(always)]
fn to_compartments(x: &V) -> Compartments {
    Compartments::new(x[0], x[1], x[2], x[3])
}

#[inline(always)]
fn write_compartments(c: &Compartments, y: &mut V) {
    y[0] = c.s;
    y[1] = c.e;
    y[2] = c.i;
    y[3] = c.r;
}

fn integration_error(params: &ModelParams, time: f64, reason: impl ToString) -> SeirError {
    SeirError::Integration {
        params: *params,
        time,
        reason: reason.to_string(),
    }
}

/// Integrate the SEIR system with BDF and sample it at `t = 0, 1, ..., days - 1`.
pub(crate) fn integrate(
    days: usize,
    scenario: &Scenario,
    params: &ModelParams,
    tolerances: &SolverTolerances,
) -> Result<Trajectory, SeirError> {
    integrate_with_budget(days, scenario, params, tolerances, MAX_STEPS_PER_DAY)
}

fn integrate_with_budget(
    days: usize,
    scenario: &Scenario,
    params: &ModelParams,
    tolerances: &SolverTolerances,
    max_steps_per_day: usize,
) -> Result<Trajectory, SeirError> {
    let population = scenario.population();
    let gamma = scenario.gamma();
    let delta = scenario.delta();
    let transmission = Transmission::new(*params, gamma);
    let y0 = Compartments::initial(population);

    let mut trajectory = Trajectory::with_capacity(days);
    trajectory.push(0.0, y0, transmission.r0(0.0));
    if days == 1 {
        return Ok(trajectory);
    }

    let problem = OdeBuilder::<M>::new()
        .t0(0.0)
        .h0(tolerances.h0)
        .rtol(tolerances.rtol)
        .atol(vec![tolerances.atol; NSTATES])
        .rhs_implicit(
            move |x: &V, _p: &V, t: T, y: &mut V| {
                let dx = seir::rhs(
                    &to_compartments(x),
                    transmission.beta(t),
                    population,
                    gamma,
                    delta,
                );
                write_compartments(&dx, y);
            },
            move |x: &V, _p: &V, t: T, v: &V, y: &mut V| {
                let jv = seir::jac_mul(
                    &to_compartments(x),
                    &to_compartments(v),
                    transmission.beta(t),
                    population,
                    gamma,
                    delta,
                );
                write_compartments(&jv, y);
            },
        )
        .init(move |_p: &V, _t: T| V::from_vec(y0.to_array().to_vec()))
        .build()
        .map_err(|e| integration_error(params, 0.0, e))?;

    let mut solver = problem
        .bdf::<NalgebraLU<T>>()
        .map_err(|e| integration_error(params, 0.0, e))?;

    for day in 1..days {
        let t = day as f64;
        let reached = t - 1.0;
        solver
            .set_stop_time(t)
            .map_err(|e| integration_error(params, reached, e))?;
        let mut steps = 0;
        loop {
            match solver.step() {
                Ok(OdeSolverStopReason::InternalTimestep) => {}
                Ok(OdeSolverStopReason::TstopReached) => break,
                Ok(reason) => {
                    return Err(integration_error(
                        params,
                        reached,
                        format!("unexpected solver return value: {:?}", reason),
                    ))
                }
                Err(err) => return Err(integration_error(params, reached, err)),
            }
            steps += 1;
            if steps >= max_steps_per_day {
                return Err(integration_error(
                    params,
                    reached,
                    format!("more than {} internal steps", max_steps_per_day),
                ));
            }
        }
        let state = to_compartments(solver.state().y);
        if !state.is_finite() {
            return Err(integration_error(params, t, "non-finite state"));
        }
        trajectory.push(t, state, transmission.r0(t));
    }

    Ok(trajectory)
}
