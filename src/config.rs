//! JSON configuration of a fitting run
//!
//! ```json
//! {
//!   "scenario": { "population": 5758736, "infectious_period": 4.0, "incubation_period": 3.0 },
//!   "bounds": {
//!     "r0_start": { "init": 3.0, "min": 2.0, "max": 20.0 },
//!     "k": { "init": 2.5, "min": 0.01, "max": 5.0 },
//!     "x0": { "init": 20.0, "min": 0.0, "max": 120.0 },
//!     "r0_end": { "init": 0.9, "min": 0.3, "max": 8.0 }
//!   },
//!   "options": { "window": 40, "restarts": 3 }
//! }
//! ```
//!
//! Every section is optional and falls back to its default.

use serde::{Deserialize, Serialize};

use crate::{
    error::SeirError,
    optimize::{FitOptions, Fitter, ParamBounds},
    simulator::Scenario,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FitConfig {
    pub scenario: Scenario,
    pub bounds: ParamBounds,
    pub options: FitOptions,
}

impl FitConfig {
    pub fn from_json(json: &str) -> Result<Self, SeirError> {
        let config: FitConfig = serde_json::from_str(json)?;
        config.scenario.validate()?;
        config.bounds.validate()?;
        config.options.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, SeirError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn fitter(&self) -> Result<Fitter, SeirError> {
        Fitter::new(self.scenario, self.bounds, self.options)
    }
}
