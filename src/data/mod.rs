//! Observed case series and their preparation for fitting.
//!
//! The series arrive as plain daily numbers from an upstream provider. This module turns
//! cumulative counts into daily increments, smooths them, applies the explicit zero-fill policy
//! for missing values and aligns them with the model's day index.

pub mod observed;
pub mod smoothing;

pub use observed::{AlignedSeries, ObservedSeries};
pub use smoothing::{daily_increments, reopen_threshold, rolling_mean_centered};
