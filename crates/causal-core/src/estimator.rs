//! The effect-estimator capability
//!
//! Estimators are black boxes behind two small traits: [`EffectEstimator`]
//! trains on an observation set and yields a fitted instance, and
//! [`FittedEffect`] evaluates treatment effects at query points. Any concrete
//! regression model only has to satisfy this contract; a failed fit surfaces
//! as an error and is never papered over.

use crate::dataset::{ObservationSet, QueryPoints};
use crate::error::Result;
use crate::tensor::EffectTensor;

/// Trains a treatment-effect model on an observation set
///
/// A fresh fitted instance is produced per call, so a bootstrap ensemble
/// holds independently fitted members with no shared mutable state.
pub trait EffectEstimator: Send + Sync {
    /// The fitted model produced by `fit`
    type Fitted: FittedEffect;

    /// Fit on the given records
    ///
    /// May fail if the data is degenerate for the underlying model
    /// (e.g. rank-deficient after resampling).
    fn fit(&self, data: &ObservationSet) -> Result<Self::Fitted>;
}

/// A fitted model that evaluates effects at query points
pub trait FittedEffect: Send {
    /// Effect tensor of shape `[n_queries, n_outcomes, n_treatments]`
    fn effect_at(&self, queries: &QueryPoints) -> Result<EffectTensor>;
}

/// Adapter turning a pair of closures into an [`EffectEstimator`]
///
/// Useful for tests and for wrapping models that live outside this
/// workspace without writing a dedicated adapter type.
#[derive(Clone)]
pub struct ClosureEstimator<F> {
    fit_fn: F,
}

impl<F> ClosureEstimator<F> {
    pub fn new(fit_fn: F) -> Self {
        Self { fit_fn }
    }
}

impl<F, Fitted> EffectEstimator for ClosureEstimator<F>
where
    F: Fn(&ObservationSet) -> Result<Fitted> + Send + Sync,
    Fitted: FittedEffect,
{
    type Fitted = Fitted;

    fn fit(&self, data: &ObservationSet) -> Result<Self::Fitted> {
        (self.fit_fn)(data)
    }
}

/// A fitted model backed by a closure
pub struct ClosureFitted<G> {
    effect_fn: G,
}

impl<G> ClosureFitted<G>
where
    G: Fn(&QueryPoints) -> Result<EffectTensor> + Send,
{
    pub fn new(effect_fn: G) -> Self {
        Self { effect_fn }
    }
}

impl<G> FittedEffect for ClosureFitted<G>
where
    G: Fn(&QueryPoints) -> Result<EffectTensor> + Send,
{
    fn effect_at(&self, queries: &QueryPoints) -> Result<EffectTensor> {
        (self.effect_fn)(queries)
    }
}

/// Convenience constructor for closure-backed estimators
pub fn closure_estimator<F, Fitted>(fit_fn: F) -> ClosureEstimator<F>
where
    F: Fn(&ObservationSet) -> Result<Fitted> + Send + Sync,
    Fitted: FittedEffect,
{
    ClosureEstimator::new(fit_fn)
}
