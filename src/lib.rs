//! Bootstrap confidence intervals for heterogeneous treatment effects
//!
//! This crate re-exports the causal-stats workspace:
//!
//! - [`causal_core`]: observation sets, effect tensors, the estimator
//!   capability, execution strategy
//! - [`causal_bootstrap`]: resampling, ensemble fitting, percentile
//!   interval aggregation
//! - [`causal_table`]: tidy per-cell interval tables and CSV export
//! - [`causal_data`]: retail demand dataset loading and design preparation
//!
//! The workflow: load a dataset, build an observation design, hand any
//! `fit`/`effect_at` estimator to [`causal_bootstrap::EffectBootstrap`], and
//! reshape the resulting interval tensors into a table for reporting.

pub use causal_bootstrap;
pub use causal_core;
pub use causal_data;
pub use causal_table;

pub mod prelude {
    pub use causal_bootstrap::{
        BootstrapConfig, BootstrapRun, EffectBootstrap, MultiplicityCorrection, PercentilePair,
    };
    pub use causal_core::prelude::*;
    pub use causal_data::{cross_brand_design, single_product_design, RetailDataset};
    pub use causal_table::{EffectLabels, IntervalTable};
}
