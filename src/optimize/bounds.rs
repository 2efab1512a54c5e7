use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{error::SeirError, simulator::ModelParams};

/// Initial guess and box constraint of one fitted parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub init: f64,
    pub min: f64,
    pub max: f64,
}

impl ParamSpec {
    pub fn new(init: f64, min: f64, max: f64) -> Self {
        Self { init, min, max }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    fn validate(&self, name: &str) -> Result<(), SeirError> {
        if !(self.init.is_finite() && self.min.is_finite() && self.max.is_finite()) {
            return Err(SeirError::domain(name, format!("{:?}", self)));
        }
        if self.min > self.max || self.init < self.min || self.init > self.max {
            return Err(SeirError::domain(name, format!("{:?}", self)));
        }
        Ok(())
    }

    /// Clamp `value` into the box; also returns the squared excess relative to the box width.
    #[inline(always)]
    fn project(&self, value: f64) -> (f64, f64) {
        let clamped = value.clamp(self.min, self.max);
        let excess = (value - clamped) / self.width().max(1.0);
        (clamped, excess * excess)
    }
}

/// Bounds of the four transmission parameters, in [`ModelParams::NAMES`] order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamBounds {
    pub r0_start: ParamSpec,
    pub k: ParamSpec,
    pub x0: ParamSpec,
    pub r0_end: ParamSpec,
}

impl Default for ParamBounds {
    fn default() -> Self {
        Self {
            r0_start: ParamSpec::new(3.0, 2.0, 20.0),
            k: ParamSpec::new(2.5, 0.01, 5.0),
            x0: ParamSpec::new(20.0, 0.0, 120.0),
            r0_end: ParamSpec::new(0.9, 0.3, 8.0),
        }
    }
}

impl ParamBounds {
    pub fn specs(&self) -> [ParamSpec; 4] {
        [self.r0_start, self.k, self.x0, self.r0_end]
    }

    pub fn validate(&self) -> Result<(), SeirError> {
        for (name, spec) in ModelParams::NAMES.iter().zip(self.specs()) {
            spec.validate(name)?;
        }
        if self.r0_start.min < 0.0 {
            return Err(SeirError::domain("r0_start.min", self.r0_start.min));
        }
        if self.r0_end.min < 0.0 {
            return Err(SeirError::domain("r0_end.min", self.r0_end.min));
        }
        if self.k.min < 0.0 {
            return Err(SeirError::domain("k.min", self.k.min));
        }
        Ok(())
    }

    pub fn initial(&self) -> ModelParams {
        ModelParams::new(
            self.r0_start.init,
            self.k.init,
            self.x0.init,
            self.r0_end.init,
        )
    }

    pub fn contains(&self, params: &ModelParams) -> bool {
        self.specs()
            .iter()
            .zip(params.to_vec())
            .all(|(spec, value)| value >= spec.min && value <= spec.max)
    }

    /// Clamp an optimizer point into the box.
    ///
    /// Returns the projected parameters and the summed squared distance the point was outside,
    /// which the cost function turns into a penalty.
    pub fn project(&self, point: &[f64]) -> Result<(ModelParams, f64), SeirError> {
        if point.len() != 4 {
            return Err(SeirError::domain("point.len()", point.len()));
        }
        let mut values = [0.0; 4];
        let mut excess = 0.0;
        for (i, spec) in self.specs().iter().enumerate() {
            let (value, e) = spec.project(point[i]);
            values[i] = value;
            excess += e;
        }
        Ok((ModelParams::from_slice(&values)?, excess))
    }

    /// Uniform draw inside the box.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> ModelParams {
        let [r0_start, k, x0, r0_end] = self
            .specs()
            .map(|spec| rng.random_range(spec.min..=spec.max));
        ModelParams::new(r0_start, k, x0, r0_end)
    }
}
