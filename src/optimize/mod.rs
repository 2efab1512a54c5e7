pub mod bounds;
pub mod fit;
mod multistart;
pub mod options;

pub use bounds::{ParamBounds, ParamSpec};
pub use fit::{FitResult, Fitter};
pub use options::FitOptions;
