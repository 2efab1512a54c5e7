//! SEIR epidemic model with a logistic, time-varying reproduction number, and a bounded
//! least-squares fitter that estimates the reproduction-number schedule from observed daily cases.
//!
//! ```no_run
//! use seirfit::prelude::*;
//!
//! # fn main() -> Result<(), SeirError> {
//! let scenario = Scenario::new(1000, 4.0, 3.0);
//! let trajectory = simulate(100, &scenario, &ModelParams::new(4.0, 0.5, 60.0, 0.8))?;
//!
//! let mut observed = ObservedSeries::from_cumulative(&[0.0, 1.0, 3.0, 7.0, 12.0, 20.0, 31.0])
//!     .rolling_mean(3)?;
//! observed.fill_missing_zero();
//! let fitter = Fitter::new(scenario, ParamBounds::default(), FitOptions::default())?;
//! let fit = fitter.fit(&observed, 5)?;
//! println!("{} peak at {:?}", fit.params, trajectory.peak_infected());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod optimize;
pub mod simulator;

pub use config::FitConfig;
pub use data::{AlignedSeries, ObservedSeries};
pub use error::SeirError;
pub use optimize::{FitOptions, FitResult, Fitter, ParamBounds, ParamSpec};
pub use simulator::{
    logistic_r0, simulate, Compartments, ModelParams, Scenario, Simulator, SolverTolerances,
    Trajectory, Transmission, TransmissionRate,
};

pub mod prelude {
    pub use crate::config::FitConfig;
    pub use crate::data::{
        daily_increments, reopen_threshold, rolling_mean_centered, AlignedSeries, ObservedSeries,
    };
    pub use crate::error::SeirError;
    pub use crate::optimize::{FitOptions, FitResult, Fitter, ParamBounds, ParamSpec};
    pub use crate::simulator::{
        derivatives, logistic_r0, simulate, Compartments, ModelParams, Scenario, Simulator,
        SolverTolerances, Trajectory, Transmission, TransmissionRate,
    };
}
