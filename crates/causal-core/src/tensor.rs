//! Dense effect tensors
//!
//! An [`EffectTensor`] holds per-query-point treatment effects with shape
//! `[n_queries, n_outcomes, n_treatments]`. The single-outcome,
//! single-treatment case is simply the `[Q, 1, 1]` shape; nothing collapses
//! structurally, accessors just ignore the degenerate dimensions.

use crate::error::{Error, Result};

/// Shape of an effect tensor: (queries, outcomes, treatments)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TensorShape {
    pub n_queries: usize,
    pub n_outcomes: usize,
    pub n_treatments: usize,
}

impl TensorShape {
    pub fn new(n_queries: usize, n_outcomes: usize, n_treatments: usize) -> Self {
        Self {
            n_queries,
            n_outcomes,
            n_treatments,
        }
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.n_queries * self.n_outcomes * self.n_treatments
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cells per query point (the simultaneous-interval count)
    pub fn cells_per_query(&self) -> usize {
        self.n_outcomes * self.n_treatments
    }
}

/// A dense `[Q, O, T]` tensor of treatment effects
#[derive(Debug, Clone, PartialEq)]
pub struct EffectTensor {
    shape: TensorShape,
    data: Vec<f64>,
}

impl EffectTensor {
    /// Create a tensor from row-major data, validating the length
    pub fn from_vec(shape: TensorShape, data: Vec<f64>) -> Result<Self> {
        if data.len() != shape.len() {
            return Err(Error::size_mismatch(
                shape.len(),
                data.len(),
                "effect tensor data",
            ));
        }
        Ok(Self { shape, data })
    }

    /// Create a zero-filled tensor
    pub fn zeros(shape: TensorShape) -> Self {
        Self {
            data: vec![0.0; shape.len()],
            shape,
        }
    }

    /// Scalar effects, one per query point (`[Q, 1, 1]`)
    pub fn from_scalar_effects(effects: Vec<f64>) -> Self {
        let shape = TensorShape::new(effects.len(), 1, 1);
        Self {
            shape,
            data: effects,
        }
    }

    pub fn shape(&self) -> TensorShape {
        self.shape
    }

    fn offset(&self, query: usize, outcome: usize, treatment: usize) -> usize {
        debug_assert!(query < self.shape.n_queries);
        debug_assert!(outcome < self.shape.n_outcomes);
        debug_assert!(treatment < self.shape.n_treatments);
        (query * self.shape.n_outcomes + outcome) * self.shape.n_treatments + treatment
    }

    /// Value at a (query, outcome, treatment) cell
    pub fn get(&self, query: usize, outcome: usize, treatment: usize) -> f64 {
        self.data[self.offset(query, outcome, treatment)]
    }

    pub fn set(&mut self, query: usize, outcome: usize, treatment: usize, value: f64) {
        let idx = self.offset(query, outcome, treatment);
        self.data[idx] = value;
    }

    /// Row-major view of all cells
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// Check that another tensor has the same shape, naming the context on failure
    pub fn check_same_shape(&self, other: &EffectTensor, context: &str) -> Result<()> {
        if self.shape != other.shape {
            return Err(Error::size_mismatch(
                self.shape.len(),
                other.shape.len(),
                context,
            ));
        }
        Ok(())
    }

    /// True if every cell is finite
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Element-wise comparison within an absolute tolerance
    pub fn approx_eq(&self, other: &EffectTensor, tolerance: f64) -> bool {
        self.shape == other.shape
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_len() {
        let shape = TensorShape::new(3, 2, 2);
        assert_eq!(shape.len(), 12);
        assert_eq!(shape.cells_per_query(), 4);
        assert!(!shape.is_empty());
    }

    #[test]
    fn test_from_vec_validates_length() {
        let shape = TensorShape::new(2, 1, 1);
        assert!(EffectTensor::from_vec(shape, vec![1.0, 2.0]).is_ok());

        let err = EffectTensor::from_vec(shape, vec![1.0, 2.0, 3.0]).unwrap_err();
        match err {
            crate::Error::SchemaMismatch {
                expected, actual, ..
            } => {
                assert_eq!(expected, 2);
                assert_eq!(actual, 3);
            }
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_indexing_row_major() {
        let shape = TensorShape::new(2, 2, 3);
        let data: Vec<f64> = (0..12).map(|i| i as f64).collect();
        let tensor = EffectTensor::from_vec(shape, data).unwrap();

        assert_eq!(tensor.get(0, 0, 0), 0.0);
        assert_eq!(tensor.get(0, 0, 2), 2.0);
        assert_eq!(tensor.get(0, 1, 0), 3.0);
        assert_eq!(tensor.get(1, 0, 0), 6.0);
        assert_eq!(tensor.get(1, 1, 2), 11.0);
    }

    #[test]
    fn test_set_and_scalar_constructor() {
        let mut tensor = EffectTensor::zeros(TensorShape::new(2, 1, 1));
        tensor.set(1, 0, 0, -2.5);
        assert_eq!(tensor.get(1, 0, 0), -2.5);

        let scalar = EffectTensor::from_scalar_effects(vec![1.0, 2.0, 3.0]);
        assert_eq!(scalar.shape(), TensorShape::new(3, 1, 1));
        assert_eq!(scalar.get(2, 0, 0), 3.0);
    }

    #[test]
    fn test_approx_eq() {
        let a = EffectTensor::from_scalar_effects(vec![1.0, 2.0]);
        let b = EffectTensor::from_scalar_effects(vec![1.0 + 1e-12, 2.0 - 1e-12]);
        let c = EffectTensor::from_scalar_effects(vec![1.0, 2.1]);

        assert!(a.approx_eq(&b, 1e-9));
        assert!(!a.approx_eq(&c, 1e-9));
    }

    #[test]
    fn test_check_same_shape() {
        let a = EffectTensor::zeros(TensorShape::new(2, 1, 1));
        let b = EffectTensor::zeros(TensorShape::new(3, 1, 1));
        assert!(a.check_same_shape(&a.clone(), "x").is_ok());
        assert!(a.check_same_shape(&b, "resample tensor").is_err());
    }

    #[test]
    fn test_is_finite() {
        let good = EffectTensor::from_scalar_effects(vec![1.0, 2.0]);
        let bad = EffectTensor::from_scalar_effects(vec![1.0, f64::NAN]);
        assert!(good.is_finite());
        assert!(!bad.is_finite());
    }
}
