use serde::{Deserialize, Serialize};

use super::seir::Compartments;

/// Daily compartment values produced by one simulation.
///
/// `r0` is the prescribed schedule evaluated on the grid, not a quantity re-derived from the
/// simulated compartments.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Trajectory {
    pub t: Vec<f64>,
    pub s: Vec<f64>,
    pub e: Vec<f64>,
    pub i: Vec<f64>,
    pub r: Vec<f64>,
    pub r0: Vec<f64>,
}

impl Trajectory {
    pub(crate) fn with_capacity(days: usize) -> Self {
        Self {
            t: Vec::with_capacity(days),
            s: Vec::with_capacity(days),
            e: Vec::with_capacity(days),
            i: Vec::with_capacity(days),
            r: Vec::with_capacity(days),
            r0: Vec::with_capacity(days),
        }
    }

    pub(crate) fn push(&mut self, t: f64, state: Compartments, r0: f64) {
        self.t.push(t);
        self.s.push(state.s);
        self.e.push(state.e);
        self.i.push(state.i);
        self.r.push(state.r);
        self.r0.push(r0);
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn state(&self, day: usize) -> Option<Compartments> {
        if day >= self.len() {
            return None;
        }
        Some(Compartments::new(
            self.s[day],
            self.e[day],
            self.i[day],
            self.r[day],
        ))
    }

    pub fn infected(&self) -> &[f64] {
        &self.i
    }

    /// Day and value of the largest Infected count.
    pub fn peak_infected(&self) -> Option<(usize, f64)> {
        self.i
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (day, value)| match best {
                Some((_, peak)) if peak >= value => best,
                _ => Some((day, value)),
            })
    }
}
