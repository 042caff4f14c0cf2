//! Bootstrap confidence intervals for treatment-effect estimators
//!
//! This crate wraps any black-box [`EffectEstimator`](causal_core::EffectEstimator)
//! in a percentile bootstrap:
//!
//! 1. Fit on the full data for the point-estimate tensor.
//! 2. Draw B resamples (size N, with replacement) and fit an independent
//!    estimator instance on each; degenerate fits are excluded and counted.
//! 3. For every (query point, outcome, treatment) cell, take the empirical
//!    percentiles of the successful resample effects as interval bounds. An
//!    ensemble that lost members must keep at least two survivors; a clean
//!    single-resample run collapses both bounds onto its one draw.
//!
//! # Example
//!
//! ```rust,ignore
//! use causal_bootstrap::{BootstrapConfig, EffectBootstrap};
//!
//! let bootstrap = EffectBootstrap::new(
//!     BootstrapConfig::new()
//!         .with_resamples(1000)
//!         .with_percentiles(1.0, 99.0)?
//!         .with_seed(42),
//! );
//!
//! let run = bootstrap.run(&estimator, &observations, &query_points)?;
//! println!(
//!     "{} of {} resamples usable",
//!     run.n_success, run.n_resamples
//! );
//! ```

mod aggregator;
mod config;
mod engine;
mod percentile;
mod resampler;

pub use aggregator::{aggregate, EffectIntervals};
pub use config::{
    BootstrapConfig, MultiplicityCorrection, PercentilePair, DEFAULT_RESAMPLES,
    MIN_SUCCESSFUL_RESAMPLES,
};
pub use engine::{BootstrapRun, EffectBootstrap};
pub use percentile::percentile;
pub use resampler::Resampler;
