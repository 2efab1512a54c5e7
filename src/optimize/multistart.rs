use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;

use super::fit::{FitResult, Fitter};
use crate::{data::ObservedSeries, error::SeirError};

impl Fitter {
    /// Fit from the bounds' initial guess plus `starts` random points inside the box, in parallel.
    ///
    /// The random points come from a generator seeded with `seed`, so the outcome is reproducible.
    /// The converged fit with the lowest cost wins. When no attempt converges, the non-converged
    /// attempt with the lowest cost is returned as [`SeirError::FitDidNotConverge`].
    pub fn fit_multistart(
        &self,
        observed: &ObservedSeries,
        outbreak_shift: i64,
        starts: usize,
        seed: u64,
    ) -> Result<FitResult, SeirError> {
        let aligned = self.prepare(observed, outbreak_shift)?;

        let mut rng = StdRng::seed_from_u64(seed);
        let mut points = Vec::with_capacity(starts + 1);
        points.push(self.bounds().initial());
        points.extend((0..starts).map(|_| self.bounds().sample(&mut rng)));

        let results: Vec<Result<FitResult, SeirError>> = points
            .par_iter()
            .map(|start| self.fit_aligned(&aligned, start))
            .collect();
        select_best(results)
    }
}

fn failure_cost(err: &SeirError) -> f64 {
    match err {
        SeirError::FitDidNotConverge { cost, .. } => *cost,
        _ => f64::INFINITY,
    }
}

fn select_best(results: Vec<Result<FitResult, SeirError>>) -> Result<FitResult, SeirError> {
    let mut best: Option<FitResult> = None;
    let mut failure: Option<SeirError> = None;
    for result in results {
        match result {
            Ok(fit) => {
                if best.as_ref().map_or(true, |b| fit.cost < b.cost) {
                    best = Some(fit);
                }
            }
            Err(err) => {
                tracing::warn!(%err, "multi-start attempt failed");
                failure = match failure {
                    Some(prev) if failure_cost(&prev) <= failure_cost(&err) => Some(prev),
                    _ => Some(err),
                };
            }
        }
    }
    match (best, failure) {
        (Some(fit), _) => Ok(fit),
        (None, Some(err)) => Err(err),
        (None, None) => Err(SeirError::Optimizer("no multi-start attempts".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::ModelParams;

    fn fit(cost: f64) -> FitResult {
        FitResult {
            params: ModelParams::new(3.0, 0.5, 20.0, 1.0),
            cost,
            iterations: 10,
            outbreak_shift: 0,
            observed: vec![0.0; 3],
        }
    }

    fn not_converged(cost: f64) -> SeirError {
        SeirError::FitDidNotConverge {
            params: ModelParams::new(3.0, 0.5, 20.0, 1.0),
            iterations: 5,
            cost,
        }
    }

    #[test]
    fn test_lowest_converged_cost_wins() {
        let best = select_best(vec![Ok(fit(4.0)), Err(not_converged(0.1)), Ok(fit(2.0))]).unwrap();
        assert_eq!(best.cost, 2.0);
    }

    #[test]
    fn test_best_failure_is_surfaced() {
        let err = select_best(vec![
            Err(SeirError::Optimizer("boom".into())),
            Err(not_converged(7.0)),
            Err(not_converged(3.0)),
        ])
        .unwrap_err();
        assert!(matches!(err, SeirError::FitDidNotConverge { cost, .. } if cost == 3.0));
    }
}
