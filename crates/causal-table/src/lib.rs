//! Tidy tabular output for treatment-effect interval tensors
//!
//! The tabular interval result is the sole outward interface of an
//! estimation run: one row per (query point, outcome, treatment) cell with
//! the point estimate and percentile bounds. Plotting and reporting layers
//! consume this table; nothing here draws anything.

mod reshape;

pub use reshape::{EffectLabels, IntervalRow, IntervalTable};
