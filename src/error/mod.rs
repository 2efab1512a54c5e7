use thiserror::Error;

use crate::simulator::ModelParams;

/// Errors produced while simulating or fitting an SEIR model.
#[derive(Error, Debug, Clone)]
pub enum SeirError {
    /// A physical input is outside its domain (non-positive population, negative rate, ...)
    #[error("Invalid input: {param} = {value}")]
    Domain { param: String, value: String },

    /// The ODE solver could not reach the requested grid point
    #[error("Integration failed at t = {time} for {params}: {reason}")]
    Integration {
        params: ModelParams,
        time: f64,
        reason: String,
    },

    /// The observed series has a non-finite value at a position used by the fit
    #[error("Observed data has a non-finite value at index {index}: {value}")]
    InvalidObservedData { index: usize, value: f64 },

    /// The optimizer ran out of iterations before meeting its tolerance
    #[error("Fit did not converge after {iterations} iterations (cost = {cost}), last iterate {params}")]
    FitDidNotConverge {
        params: ModelParams,
        iterations: u64,
        cost: f64,
    },

    /// Setup or runtime failure inside the optimizer
    #[error("Optimizer error: {0}")]
    Optimizer(String),

    /// A configuration document could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SeirError {
    pub(crate) fn domain(param: &str, value: impl ToString) -> Self {
        SeirError::Domain {
            param: param.to_string(),
            value: value.to_string(),
        }
    }
}

impl From<serde_json::Error> for SeirError {
    fn from(err: serde_json::Error) -> Self {
        SeirError::Config(err.to_string())
    }
}
