//! The bootstrap engine
//!
//! Fits the estimator on the full data for the point estimate, then fits one
//! independent estimator instance per resample and aggregates the resulting
//! effect tensors into percentile intervals. Resample fits are independent
//! and run under the configured execution strategy; a failed fit is recorded
//! and excluded rather than silently replaced, and the run reports exactly
//! how many resamples succeeded.

use crate::aggregator::{aggregate, EffectIntervals};
use crate::config::BootstrapConfig;
use crate::resampler::Resampler;
use causal_core::{
    execute_batch, EffectEstimator, EffectTensor, Error, FittedEffect, ObservationSet,
    QueryPoints, Result,
};
use tracing::{debug, instrument, warn};

/// Outcome of one resample fit
enum ResampleOutcome {
    Success(EffectTensor),
    Failed(Error),
    Skipped,
}

/// Result of a bootstrap confidence-interval run
#[derive(Debug, Clone)]
pub struct BootstrapRun {
    /// Per-cell point estimates and percentile bounds
    pub intervals: EffectIntervals,
    /// Number of resamples requested
    pub n_resamples: usize,
    /// Resamples whose fit and evaluation succeeded
    pub n_success: usize,
    /// Resamples excluded because the fit or evaluation failed
    pub n_failed: usize,
    /// Resamples skipped due to cancellation
    pub n_skipped: usize,
    /// Wall-clock time for the whole run, the full-data fit included
    pub elapsed_ms: u64,
}

impl BootstrapRun {
    /// True if any resample was dropped from the ensemble
    pub fn is_partial(&self) -> bool {
        self.n_success < self.n_resamples
    }
}

/// Bootstrap confidence intervals for a black-box effect estimator
#[derive(Debug, Clone, Default)]
pub struct EffectBootstrap {
    config: BootstrapConfig,
}

impl EffectBootstrap {
    pub fn new(config: BootstrapConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Run the full bootstrap: point fit, ensemble fits, aggregation
    ///
    /// The observation set and query points are shared read-only across the
    /// batch; each resample fit owns its fitted state. Fatal errors are the
    /// full-data fit failing, or an ensemble that lost resamples keeping
    /// fewer than two survivors.
    #[instrument(skip_all, fields(
        n_records = data.n_records(),
        n_queries = queries.len(),
        n_resamples = self.config.n_resamples,
    ))]
    pub fn run<Est>(
        &self,
        estimator: &Est,
        data: &ObservationSet,
        queries: &QueryPoints,
    ) -> Result<BootstrapRun>
    where
        Est: EffectEstimator,
    {
        let start = std::time::Instant::now();

        // Full-data fit anchors the point estimates and the tensor shape.
        let point = estimator.fit(data)?.effect_at(queries)?;
        if !point.is_finite() {
            return Err(Error::non_finite("point-estimate effect tensor"));
        }

        let resampler = match self.config.seed {
            Some(seed) => Resampler::new(self.config.n_resamples).with_seed(seed),
            None => Resampler::new(self.config.n_resamples),
        };
        let indices = resampler.generate_indices(data.n_records())?;

        debug!("Fitting bootstrap ensemble of {} resamples", indices.len());

        let cancel = self.config.cancel.clone();
        let outcomes = execute_batch(self.config.strategy, indices.len(), |i| {
            if cancel.is_cancelled() {
                return ResampleOutcome::Skipped;
            }
            let resample = data.select(&indices[i]);
            match estimator
                .fit(&resample)
                .and_then(|fitted| fitted.effect_at(queries))
            {
                Ok(tensor) => ResampleOutcome::Success(tensor),
                Err(err) => ResampleOutcome::Failed(Error::degenerate_resample(
                    i,
                    err.to_string(),
                )),
            }
        });

        let mut draws = Vec::with_capacity(outcomes.len());
        let mut n_failed = 0usize;
        let mut n_skipped = 0usize;
        for outcome in outcomes {
            match outcome {
                ResampleOutcome::Success(tensor) => draws.push(tensor),
                ResampleOutcome::Failed(err) => {
                    n_failed += 1;
                    debug!("excluding resample: {err}");
                }
                ResampleOutcome::Skipped => n_skipped += 1,
            }
        }

        if n_failed > 0 || n_skipped > 0 {
            warn!(
                n_failed,
                n_skipped,
                n_success = draws.len(),
                "bootstrap ensemble is partial"
            );
        }

        let intervals = aggregate(
            &point,
            &draws,
            n_failed + n_skipped,
            self.config.percentiles,
            self.config.correction,
        )?;

        Ok(BootstrapRun {
            intervals,
            n_resamples: self.config.n_resamples,
            n_success: draws.len(),
            n_failed,
            n_skipped,
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use causal_core::{closure_estimator, CancelToken, ClosureFitted, ExecutionStrategy, Matrix};
    use rand::prelude::*;
    use rand_distr::Normal;

    /// Estimator whose effect is the sample mean of the outcome column,
    /// constant across query points.
    fn mean_effect_estimator() -> impl EffectEstimator {
        closure_estimator(|data: &ObservationSet| {
            let mean = data.outcomes().values().iter().sum::<f64>() / data.n_records() as f64;
            Ok(ClosureFitted::new(move |queries: &QueryPoints| {
                Ok(EffectTensor::from_scalar_effects(vec![mean; queries.len()]))
            }))
        })
    }

    fn noisy_set(n: usize, seed: u64) -> ObservationSet {
        let mut rng = StdRng::seed_from_u64(seed);
        let noise = Normal::new(0.0, 1.0).unwrap();
        let outcomes: Vec<f64> = (0..n).map(|_| 3.0 + noise.sample(&mut rng)).collect();
        ObservationSet::new(
            Matrix::column(outcomes),
            Matrix::column(vec![1.0; n]),
            Matrix::column(vec![0.0; n]),
            Matrix::column(vec![1.0; n]),
        )
        .unwrap()
    }

    #[test]
    fn test_run_reports_full_success() {
        let data = noisy_set(50, 1);
        let queries = QueryPoints::from_values(vec![0.0, 1.0]).unwrap();
        let bootstrap = EffectBootstrap::new(
            BootstrapConfig::new()
                .with_resamples(100)
                .with_seed(42)
                .with_strategy(ExecutionStrategy::Sequential),
        );

        let run = bootstrap
            .run(&mean_effect_estimator(), &data, &queries)
            .unwrap();

        assert_eq!(run.n_resamples, 100);
        assert_eq!(run.n_success, 100);
        assert_eq!(run.n_failed, 0);
        assert_eq!(run.n_skipped, 0);
        assert!(!run.is_partial());
        assert_eq!(run.intervals.shape().n_queries, 2);
    }

    #[test]
    fn test_single_resample_run_yields_degenerate_interval() {
        let data = noisy_set(30, 8);
        let queries = QueryPoints::from_values(vec![0.0]).unwrap();
        let bootstrap = EffectBootstrap::new(
            BootstrapConfig::new()
                .with_resamples(1)
                .with_percentiles(1.0, 99.0)
                .unwrap()
                .with_seed(3),
        );

        let run = bootstrap
            .run(&mean_effect_estimator(), &data, &queries)
            .unwrap();

        assert_eq!(run.n_success, 1);
        assert!(!run.is_partial());
        // Both bounds collapse onto the single resample's effect.
        assert_eq!(run.intervals.lower, run.intervals.upper);
    }

    #[test]
    fn test_run_is_reproducible_with_seed() {
        let data = noisy_set(40, 2);
        let queries = QueryPoints::from_values(vec![0.0]).unwrap();
        let config = BootstrapConfig::new().with_resamples(50).with_seed(7);

        let a = EffectBootstrap::new(config.clone())
            .run(&mean_effect_estimator(), &data, &queries)
            .unwrap();
        let b = EffectBootstrap::new(config)
            .run(&mean_effect_estimator(), &data, &queries)
            .unwrap();

        assert_eq!(a.intervals, b.intervals);
    }

    #[test]
    fn test_bounds_bracket_point_estimate_for_noisy_draws() {
        // Percentiles 1/99 with B=20 on well-behaved noise: the point
        // estimate should sit inside the interval in at least 18/20 trials.
        let queries = QueryPoints::from_values(vec![0.0]).unwrap();
        let mut bracketed = 0;
        for trial in 0..20 {
            let data = noisy_set(60, 100 + trial);
            let bootstrap = EffectBootstrap::new(
                BootstrapConfig::new()
                    .with_resamples(20)
                    .with_percentiles(1.0, 99.0)
                    .unwrap()
                    .with_seed(trial),
            );
            let run = bootstrap
                .run(&mean_effect_estimator(), &data, &queries)
                .unwrap();
            let point = run.intervals.point.get(0, 0, 0);
            if run.intervals.lower.get(0, 0, 0) <= point
                && point <= run.intervals.upper.get(0, 0, 0)
            {
                bracketed += 1;
            }
        }
        assert!(bracketed >= 18, "only {bracketed}/20 intervals bracketed");
    }

    #[test]
    fn test_failed_resamples_excluded_and_counted() {
        let data = noisy_set(30, 3);
        let queries = QueryPoints::from_values(vec![0.0]).unwrap();

        // Fails whenever the resample mean drifts above the full-data mean;
        // the full-data fit itself always succeeds (mean equals itself).
        let full_mean =
            data.outcomes().values().iter().sum::<f64>() / data.n_records() as f64;
        let flaky = closure_estimator(move |data: &ObservationSet| {
            let mean = data.outcomes().values().iter().sum::<f64>() / data.n_records() as f64;
            if mean > full_mean {
                return Err(Error::Computation("singular design matrix".to_string()));
            }
            Ok(ClosureFitted::new(move |queries: &QueryPoints| {
                Ok(EffectTensor::from_scalar_effects(vec![mean; queries.len()]))
            }))
        });

        let bootstrap = EffectBootstrap::new(
            BootstrapConfig::new()
                .with_resamples(200)
                .with_seed(11)
                .with_strategy(ExecutionStrategy::Sequential),
        );

        let run = bootstrap.run(&flaky, &data, &queries).unwrap();
        assert_eq!(run.n_success + run.n_failed, 200);
        assert!(run.n_failed > 0);
        assert!(run.n_success >= 2);
        assert!(run.is_partial());
    }

    #[test]
    fn test_all_failed_resamples_is_fatal() {
        let data = noisy_set(10, 4);
        let queries = QueryPoints::from_values(vec![0.0]).unwrap();

        // Rejects any input with a repeated outcome value. The full data is
        // ten distinct gaussian draws, while a with-replacement resample of
        // ten rows repeats at least one, so every ensemble member fails.
        let picky = closure_estimator(|data: &ObservationSet| {
            let mut sorted = data.outcomes().values().to_vec();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
            if sorted.windows(2).any(|w| w[0] == w[1]) {
                return Err(Error::Computation("rank-deficient design".to_string()));
            }
            Ok(ClosureFitted::new(|queries: &QueryPoints| {
                Ok(EffectTensor::from_scalar_effects(vec![0.0; queries.len()]))
            }))
        });

        let bootstrap = EffectBootstrap::new(
            BootstrapConfig::new()
                .with_resamples(20)
                .with_seed(5)
                .with_strategy(ExecutionStrategy::Sequential),
        );

        let err = bootstrap.run(&picky, &data, &queries).unwrap_err();
        match err {
            Error::InsufficientSuccessfulResamples { required, .. } => assert_eq!(required, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_pre_cancelled_run_skips_everything() {
        let data = noisy_set(20, 6);
        let queries = QueryPoints::from_values(vec![0.0]).unwrap();
        let token = CancelToken::new();
        token.cancel();

        let bootstrap = EffectBootstrap::new(
            BootstrapConfig::new()
                .with_resamples(10)
                .with_seed(1)
                .with_cancel_token(token),
        );

        let err = bootstrap
            .run(&mean_effect_estimator(), &data, &queries)
            .unwrap_err();
        match err {
            Error::InsufficientSuccessfulResamples { succeeded, .. } => assert_eq!(succeeded, 0),
            other => panic!("unexpected error: {other}"),
        }
    }
}
