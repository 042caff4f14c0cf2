//! Percentile aggregation across a bootstrap ensemble
//!
//! Collects the per-resample effect tensors and computes, independently for
//! each (query, outcome, treatment) cell, the empirical percentile bounds
//! across the ensemble.

use crate::config::{MultiplicityCorrection, PercentilePair, MIN_SUCCESSFUL_RESAMPLES};
use crate::percentile::percentile_of_sorted;
use causal_core::{EffectTensor, Error, Result, TensorShape};

/// Point estimates with per-cell lower and upper percentile bounds
///
/// All three tensors share the `[Q, O, T]` shape of the full-data fit.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectIntervals {
    pub point: EffectTensor,
    pub lower: EffectTensor,
    pub upper: EffectTensor,
}

impl EffectIntervals {
    pub fn shape(&self) -> TensorShape {
        self.point.shape()
    }
}

/// Aggregate successful resample tensors into per-cell percentile bounds
///
/// `draws` holds only the successful resamples; `n_excluded` counts the
/// resamples dropped upstream (failed fits or cancellation skips). A clean
/// single-draw ensemble is degenerate but valid: both bounds collapse onto
/// that draw's values for any percentiles. An ensemble that lost members
/// must keep at least two survivors. Fails if any draw's shape disagrees
/// with the point-estimate tensor.
pub fn aggregate(
    point: &EffectTensor,
    draws: &[EffectTensor],
    n_excluded: usize,
    percentiles: PercentilePair,
    correction: MultiplicityCorrection,
) -> Result<EffectIntervals> {
    if draws.is_empty() || (n_excluded > 0 && draws.len() < MIN_SUCCESSFUL_RESAMPLES) {
        return Err(Error::InsufficientSuccessfulResamples {
            succeeded: draws.len(),
            required: MIN_SUCCESSFUL_RESAMPLES,
        });
    }
    for draw in draws {
        point.check_same_shape(draw, "resample effect tensor")?;
    }

    let shape = point.shape();
    let effective = match correction {
        MultiplicityCorrection::None => percentiles,
        MultiplicityCorrection::Bonferroni => percentiles.bonferroni(shape.cells_per_query())?,
    };

    let mut lower = EffectTensor::zeros(shape);
    let mut upper = EffectTensor::zeros(shape);
    let mut cell_draws = Vec::with_capacity(draws.len());

    for q in 0..shape.n_queries {
        for o in 0..shape.n_outcomes {
            for t in 0..shape.n_treatments {
                cell_draws.clear();
                cell_draws.extend(draws.iter().map(|draw| draw.get(q, o, t)));
                cell_draws
                    .sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

                lower.set(q, o, t, percentile_of_sorted(&cell_draws, effective.lower()));
                upper.set(q, o, t, percentile_of_sorted(&cell_draws, effective.upper()));
            }
        }
    }

    Ok(EffectIntervals {
        point: point.clone(),
        lower,
        upper,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scalar_draws(values: &[f64]) -> Vec<EffectTensor> {
        values
            .iter()
            .map(|&v| EffectTensor::from_scalar_effects(vec![v]))
            .collect()
    }

    #[test]
    fn test_partial_ensemble_below_two_survivors_fails() {
        let point = EffectTensor::from_scalar_effects(vec![1.0]);
        let pair = PercentilePair::new(1.0, 99.0).unwrap();

        for draws in [vec![], scalar_draws(&[1.0])] {
            let err = aggregate(&point, &draws, 3, pair, MultiplicityCorrection::None)
                .unwrap_err();
            match err {
                Error::InsufficientSuccessfulResamples {
                    succeeded,
                    required,
                } => {
                    assert_eq!(succeeded, draws.len());
                    assert_eq!(required, 2);
                }
                _ => panic!("Wrong error type"),
            }
        }
    }

    #[test]
    fn test_single_clean_draw_collapses_interval() {
        // One requested resample that fit cleanly: both bounds are that
        // draw's value, whatever the percentile ranks.
        let point = EffectTensor::from_scalar_effects(vec![3.4]);
        let draws = scalar_draws(&[3.5]);
        let pair = PercentilePair::new(1.0, 99.0).unwrap();

        let intervals = aggregate(&point, &draws, 0, pair, MultiplicityCorrection::None).unwrap();
        assert_eq!(intervals.lower.get(0, 0, 0), 3.5);
        assert_eq!(intervals.upper.get(0, 0, 0), 3.5);
        assert_eq!(intervals.point.get(0, 0, 0), 3.4);
    }

    #[test]
    fn test_empty_draws_always_fail() {
        let point = EffectTensor::from_scalar_effects(vec![1.0]);
        let pair = PercentilePair::new(1.0, 99.0).unwrap();
        let err = aggregate(&point, &[], 0, pair, MultiplicityCorrection::None).unwrap_err();
        match err {
            Error::InsufficientSuccessfulResamples { succeeded, .. } => assert_eq!(succeeded, 0),
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_constant_draws_collapse_interval() {
        let point = EffectTensor::from_scalar_effects(vec![3.5]);
        let draws = scalar_draws(&[3.5; 20]);
        let pair = PercentilePair::new(1.0, 99.0).unwrap();

        let intervals = aggregate(&point, &draws, 0, pair, MultiplicityCorrection::None).unwrap();
        assert_eq!(intervals.lower.get(0, 0, 0), 3.5);
        assert_eq!(intervals.upper.get(0, 0, 0), 3.5);
    }

    #[test]
    fn test_two_identical_draws_any_percentiles() {
        let point = EffectTensor::from_scalar_effects(vec![2.0]);
        let draws = scalar_draws(&[2.0, 2.0]);
        let pair = PercentilePair::new(10.0, 90.0).unwrap();

        let intervals = aggregate(&point, &draws, 0, pair, MultiplicityCorrection::None).unwrap();
        assert_eq!(intervals.lower.get(0, 0, 0), 2.0);
        assert_eq!(intervals.upper.get(0, 0, 0), 2.0);
    }

    #[test]
    fn test_percentile_bounds_ordered() {
        let point = EffectTensor::from_scalar_effects(vec![5.5]);
        let draws = scalar_draws(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        let pair = PercentilePair::new(10.0, 90.0).unwrap();

        let intervals = aggregate(&point, &draws, 0, pair, MultiplicityCorrection::None).unwrap();
        let lower = intervals.lower.get(0, 0, 0);
        let upper = intervals.upper.get(0, 0, 0);

        // rank = 9 * 0.1 = 0.9 -> between 1.0 and 2.0
        assert_relative_eq!(lower, 1.9);
        assert_relative_eq!(upper, 9.1);
        assert!(lower < upper);
    }

    #[test]
    fn test_cells_aggregated_independently() {
        let shape = TensorShape::new(1, 1, 2);
        let point = EffectTensor::from_vec(shape, vec![0.0, 10.0]).unwrap();
        let draws: Vec<EffectTensor> = (0..5)
            .map(|i| {
                EffectTensor::from_vec(shape, vec![i as f64, 10.0 + i as f64]).unwrap()
            })
            .collect();
        let pair = PercentilePair::new(0.0, 100.0).unwrap();

        let intervals = aggregate(&point, &draws, 0, pair, MultiplicityCorrection::None).unwrap();
        assert_eq!(intervals.lower.get(0, 0, 0), 0.0);
        assert_eq!(intervals.upper.get(0, 0, 0), 4.0);
        assert_eq!(intervals.lower.get(0, 0, 1), 10.0);
        assert_eq!(intervals.upper.get(0, 0, 1), 14.0);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let point = EffectTensor::from_scalar_effects(vec![1.0]);
        let draws = vec![
            EffectTensor::from_scalar_effects(vec![1.0]),
            EffectTensor::from_scalar_effects(vec![1.0, 2.0]),
        ];
        let pair = PercentilePair::new(1.0, 99.0).unwrap();

        let err = aggregate(&point, &draws, 0, pair, MultiplicityCorrection::None).unwrap_err();
        match err {
            Error::SchemaMismatch { .. } => {}
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_bonferroni_widens_intervals() {
        let point = EffectTensor::from_vec(TensorShape::new(1, 2, 2), vec![0.0; 4]).unwrap();
        let draws: Vec<EffectTensor> = (0..100)
            .map(|i| {
                let v = (i as f64 - 49.5) / 10.0;
                EffectTensor::from_vec(TensorShape::new(1, 2, 2), vec![v; 4]).unwrap()
            })
            .collect();
        let pair = PercentilePair::new(2.5, 97.5).unwrap();

        let marginal =
            aggregate(&point, &draws, 0, pair, MultiplicityCorrection::None).unwrap();
        let corrected =
            aggregate(&point, &draws, 0, pair, MultiplicityCorrection::Bonferroni).unwrap();

        // Four simultaneous cells -> tighter tails -> wider interval.
        assert!(corrected.lower.get(0, 0, 0) < marginal.lower.get(0, 0, 0));
        assert!(corrected.upper.get(0, 0, 0) > marginal.upper.get(0, 0, 0));
    }
}
