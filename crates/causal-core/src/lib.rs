//! Core types for heterogeneous treatment effect estimation
//!
//! This crate provides the shared vocabulary for the causal-stats workspace:
//!
//! - [`ObservationSet`] / [`QueryPoints`]: immutable inputs to estimation
//! - [`EffectTensor`]: dense `[queries, outcomes, treatments]` effects
//! - [`EffectEstimator`] / [`FittedEffect`]: the black-box model capability
//! - [`execution`]: batch execution strategy and cooperative cancellation
//! - [`Error`] / [`Result`]: the unified error surface
//!
//! # Example
//!
//! ```rust
//! use causal_core::{Matrix, ObservationSet, QuerySpec};
//!
//! let data = ObservationSet::new(
//!     Matrix::column(vec![1.2, 0.9, 1.1]),   // outcomes
//!     Matrix::column(vec![0.5, 0.7, 0.4]),   // treatments
//!     Matrix::column(vec![10.0, 11.0, 9.0]), // effect modifiers
//!     Matrix::column(vec![1.0, 1.0, 1.0]),   // controls
//! ).unwrap();
//!
//! let queries = QuerySpec::Range { min: 9.0, max: 11.0, step: 1.0 }
//!     .resolve()
//!     .unwrap();
//!
//! assert_eq!(data.n_records(), 3);
//! assert_eq!(queries.len(), 3);
//! ```

pub mod dataset;
pub mod error;
pub mod estimator;
pub mod execution;
pub mod tensor;

pub use dataset::{Matrix, ObservationSet, QueryPoints, QuerySpec};
pub use error::{Error, Result};
pub use estimator::{
    closure_estimator, ClosureEstimator, ClosureFitted, EffectEstimator, FittedEffect,
};
pub use execution::{execute_batch, CancelToken, ExecutionStrategy};
pub use tensor::{EffectTensor, TensorShape};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CancelToken, EffectEstimator, EffectTensor, Error, ExecutionStrategy, FittedEffect,
        Matrix, ObservationSet, QueryPoints, QuerySpec, Result, TensorShape,
    };
}
