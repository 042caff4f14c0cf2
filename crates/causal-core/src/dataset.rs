//! Observation sets and query points
//!
//! An [`ObservationSet`] holds the four per-record vector families used by an
//! effect estimator: outcomes, treatments, effect modifiers, and controls.
//! All four share the same record count; a bootstrap resample is produced by
//! [`ObservationSet::select`] with a shared row-index draw, which preserves
//! within-record correspondence and never mutates the original.

use crate::error::{Error, Result};

/// Row-major numeric matrix with a fixed column count
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    n_cols: usize,
}

impl Matrix {
    /// Create a matrix from row-major data
    pub fn from_vec(data: Vec<f64>, n_cols: usize) -> Result<Self> {
        if n_cols == 0 {
            return Err(Error::InvalidParameter(
                "matrix must have at least one column".to_string(),
            ));
        }
        if data.len() % n_cols != 0 {
            return Err(Error::InvalidInput(format!(
                "data length {} is not a multiple of column count {}",
                data.len(),
                n_cols
            )));
        }
        Ok(Self { data, n_cols })
    }

    /// Build from per-record rows, checking that all rows have equal length
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let n_cols = rows.first().map(|r| r.len()).ok_or_else(Error::empty_input)?;
        let mut data = Vec::with_capacity(rows.len() * n_cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(Error::size_mismatch(n_cols, row.len(), &format!("row {i}")));
            }
            data.extend_from_slice(row);
        }
        Matrix::from_vec(data, n_cols)
    }

    /// Single-column matrix
    pub fn column(values: Vec<f64>) -> Self {
        Self {
            data: values,
            n_cols: 1,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.data.len() / self.n_cols
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn row(&self, i: usize) -> &[f64] {
        let start = i * self.n_cols;
        &self.data[start..start + self.n_cols]
    }

    /// Gather rows by index (indices may repeat; out-of-range panics)
    pub fn select(&self, indices: &[usize]) -> Matrix {
        let mut data = Vec::with_capacity(indices.len() * self.n_cols);
        for &i in indices {
            data.extend_from_slice(self.row(i));
        }
        Matrix {
            data,
            n_cols: self.n_cols,
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.data
    }
}

/// Immutable collection of records for effect estimation
#[derive(Debug, Clone)]
pub struct ObservationSet {
    outcomes: Matrix,
    treatments: Matrix,
    modifiers: Matrix,
    controls: Matrix,
}

impl ObservationSet {
    /// Create an observation set, validating consistent record counts
    pub fn new(
        outcomes: Matrix,
        treatments: Matrix,
        modifiers: Matrix,
        controls: Matrix,
    ) -> Result<Self> {
        let n = outcomes.n_rows();
        if n == 0 {
            return Err(Error::empty_input());
        }
        for (matrix, name) in [
            (&treatments, "treatments"),
            (&modifiers, "effect modifiers"),
            (&controls, "controls"),
        ] {
            if matrix.n_rows() != n {
                return Err(Error::size_mismatch(n, matrix.n_rows(), name));
            }
        }
        Ok(Self {
            outcomes,
            treatments,
            modifiers,
            controls,
        })
    }

    pub fn n_records(&self) -> usize {
        self.outcomes.n_rows()
    }

    pub fn n_outcomes(&self) -> usize {
        self.outcomes.n_cols()
    }

    pub fn n_treatments(&self) -> usize {
        self.treatments.n_cols()
    }

    pub fn n_modifiers(&self) -> usize {
        self.modifiers.n_cols()
    }

    pub fn outcomes(&self) -> &Matrix {
        &self.outcomes
    }

    pub fn treatments(&self) -> &Matrix {
        &self.treatments
    }

    pub fn modifiers(&self) -> &Matrix {
        &self.modifiers
    }

    pub fn controls(&self) -> &Matrix {
        &self.controls
    }

    /// Build a resample using the same row-index draw for every vector family
    pub fn select(&self, indices: &[usize]) -> ObservationSet {
        ObservationSet {
            outcomes: self.outcomes.select(indices),
            treatments: self.treatments.select(indices),
            modifiers: self.modifiers.select(indices),
            controls: self.controls.select(indices),
        }
    }
}

/// Points in effect-modifier space at which effects are evaluated
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPoints {
    points: Matrix,
}

impl QueryPoints {
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        Ok(Self {
            points: Matrix::from_rows(rows)?,
        })
    }

    /// One-dimensional query points (the common single-modifier case)
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::empty_input());
        }
        Ok(Self {
            points: Matrix::column(values),
        })
    }

    pub fn len(&self) -> usize {
        self.points.n_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn n_features(&self) -> usize {
        self.points.n_cols()
    }

    pub fn point(&self, i: usize) -> &[f64] {
        self.points.row(i)
    }
}

/// Query-point configuration: an explicit list or a min/max/step grid
#[derive(Debug, Clone, PartialEq)]
pub enum QuerySpec {
    /// Evaluate at exactly these one-dimensional points
    Explicit(Vec<f64>),
    /// Evaluate on an inclusive grid from `min` to `max` in increments of `step`
    Range { min: f64, max: f64, step: f64 },
}

impl QuerySpec {
    /// Resolve the spec into concrete query points
    pub fn resolve(&self) -> Result<QueryPoints> {
        match self {
            QuerySpec::Explicit(values) => QueryPoints::from_values(values.clone()),
            QuerySpec::Range { min, max, step } => {
                if !step.is_finite() || *step <= 0.0 {
                    return Err(Error::InvalidParameter(format!(
                        "query step {step} must be positive and finite"
                    )));
                }
                if !min.is_finite() || !max.is_finite() || min > max {
                    return Err(Error::InvalidParameter(format!(
                        "query range [{min}, {max}] is not a valid interval"
                    )));
                }
                let mut values = Vec::new();
                let mut i = 0usize;
                loop {
                    let v = min + step * i as f64;
                    // Half-step slack so `max` itself survives rounding.
                    if v > max + step * 0.5 {
                        break;
                    }
                    values.push(v.min(*max));
                    i += 1;
                }
                QueryPoints::from_values(values)
            }
        }
    }
}
