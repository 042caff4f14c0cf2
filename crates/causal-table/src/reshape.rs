//! Tensor-to-table reshaping
//!
//! Converts the `[Q, O, T]` interval tensors into a tidy table with one row
//! per (query point, outcome, treatment) cell, and pivots such a table back
//! into tensors. This is a single batch transform with no incremental
//! accumulator state, and it is lossless: `from_tensors` followed by
//! `to_tensors` reproduces the input exactly.

use causal_bootstrap::EffectIntervals;
use causal_core::{EffectTensor, Error, QueryPoints, Result, TensorShape};
use serde::Serialize;
use std::io::Write;

/// Names for the outcome and treatment axes of an effect tensor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectLabels {
    outcomes: Vec<String>,
    treatments: Vec<String>,
}

impl EffectLabels {
    pub fn new<S: Into<String>>(
        outcomes: impl IntoIterator<Item = S>,
        treatments: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            outcomes: outcomes.into_iter().map(Into::into).collect(),
            treatments: treatments.into_iter().map(Into::into).collect(),
        }
    }

    /// Labels for the single-outcome, single-treatment case
    pub fn scalar(outcome: impl Into<String>, treatment: impl Into<String>) -> Self {
        Self {
            outcomes: vec![outcome.into()],
            treatments: vec![treatment.into()],
        }
    }

    pub fn outcomes(&self) -> &[String] {
        &self.outcomes
    }

    pub fn treatments(&self) -> &[String] {
        &self.treatments
    }

    /// Check both label counts against a tensor shape
    pub fn validate_against(&self, shape: TensorShape) -> Result<()> {
        if self.outcomes.len() != shape.n_outcomes {
            return Err(Error::size_mismatch(
                shape.n_outcomes,
                self.outcomes.len(),
                "outcome labels",
            ));
        }
        if self.treatments.len() != shape.n_treatments {
            return Err(Error::size_mismatch(
                shape.n_treatments,
                self.treatments.len(),
                "treatment labels",
            ));
        }
        Ok(())
    }
}

/// One (query point, outcome, treatment) cell of an interval result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalRow {
    pub query_index: usize,
    /// Effect-modifier values of the query point
    pub query: Vec<f64>,
    pub outcome_index: usize,
    pub outcome: String,
    pub treatment_index: usize,
    pub treatment: String,
    pub estimate: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Tidy per-cell view of an interval tensor
///
/// Rows are ordered query-major, then outcome, then treatment, matching the
/// tensor layout.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalTable {
    rows: Vec<IntervalRow>,
    shape: TensorShape,
    n_query_features: usize,
    labels: EffectLabels,
    n_successful_resamples: usize,
}

impl IntervalTable {
    /// Reshape interval tensors into tidy rows
    ///
    /// Fails if the label counts or the query-point count disagree with the
    /// tensor shape.
    pub fn from_tensors(
        queries: &QueryPoints,
        intervals: &EffectIntervals,
        labels: EffectLabels,
        n_successful_resamples: usize,
    ) -> Result<Self> {
        let shape = intervals.shape();
        labels.validate_against(shape)?;
        if queries.len() != shape.n_queries {
            return Err(Error::size_mismatch(
                shape.n_queries,
                queries.len(),
                "query points",
            ));
        }
        intervals
            .point
            .check_same_shape(&intervals.lower, "lower-bound tensor")?;
        intervals
            .point
            .check_same_shape(&intervals.upper, "upper-bound tensor")?;

        let mut rows = Vec::with_capacity(shape.len());
        for q in 0..shape.n_queries {
            for o in 0..shape.n_outcomes {
                for t in 0..shape.n_treatments {
                    rows.push(IntervalRow {
                        query_index: q,
                        query: queries.point(q).to_vec(),
                        outcome_index: o,
                        outcome: labels.outcomes[o].clone(),
                        treatment_index: t,
                        treatment: labels.treatments[t].clone(),
                        estimate: intervals.point.get(q, o, t),
                        lower: intervals.lower.get(q, o, t),
                        upper: intervals.upper.get(q, o, t),
                    });
                }
            }
        }

        Ok(Self {
            rows,
            shape,
            n_query_features: queries.n_features(),
            labels,
            n_successful_resamples,
        })
    }

    pub fn rows(&self) -> &[IntervalRow] {
        &self.rows
    }

    pub fn shape(&self) -> TensorShape {
        self.shape
    }

    pub fn labels(&self) -> &EffectLabels {
        &self.labels
    }

    /// How many bootstrap resamples backed these intervals
    pub fn n_successful_resamples(&self) -> usize {
        self.n_successful_resamples
    }

    /// Pivot the table back into point/lower/upper tensors
    ///
    /// Fails if any cell is missing or duplicated.
    pub fn to_tensors(&self) -> Result<EffectIntervals> {
        let mut point = EffectTensor::zeros(self.shape);
        let mut lower = EffectTensor::zeros(self.shape);
        let mut upper = EffectTensor::zeros(self.shape);
        let mut seen = vec![false; self.shape.len()];

        for row in &self.rows {
            if row.query_index >= self.shape.n_queries
                || row.outcome_index >= self.shape.n_outcomes
                || row.treatment_index >= self.shape.n_treatments
            {
                return Err(Error::InvalidInput(format!(
                    "row ({}, {}, {}) is outside the tensor shape",
                    row.query_index, row.outcome_index, row.treatment_index
                )));
            }
            let flat = (row.query_index * self.shape.n_outcomes + row.outcome_index)
                * self.shape.n_treatments
                + row.treatment_index;
            if seen[flat] {
                return Err(Error::InvalidInput(format!(
                    "duplicate row for cell ({}, {}, {})",
                    row.query_index, row.outcome_index, row.treatment_index
                )));
            }
            seen[flat] = true;
            point.set(row.query_index, row.outcome_index, row.treatment_index, row.estimate);
            lower.set(row.query_index, row.outcome_index, row.treatment_index, row.lower);
            upper.set(row.query_index, row.outcome_index, row.treatment_index, row.upper);
        }

        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(Error::InvalidInput(format!(
                "missing row for flat cell index {missing}"
            )));
        }

        Ok(EffectIntervals {
            point,
            lower,
            upper,
        })
    }

    /// Write the table as CSV
    ///
    /// Query-point features become one column each (`x0`, `x1`, ...).
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);

        let mut header = vec!["query_index".to_string()];
        header.extend((0..self.n_query_features).map(|i| format!("x{i}")));
        header.extend(
            ["outcome", "treatment", "estimate", "lower", "upper"]
                .iter()
                .map(|s| s.to_string()),
        );
        csv.write_record(&header).map_err(csv_error)?;

        for row in &self.rows {
            let mut record = vec![row.query_index.to_string()];
            record.extend(row.query.iter().map(|v| v.to_string()));
            record.push(row.outcome.clone());
            record.push(row.treatment.clone());
            record.push(row.estimate.to_string());
            record.push(row.lower.to_string());
            record.push(row.upper.to_string());
            csv.write_record(&record).map_err(csv_error)?;
        }

        csv.flush()?;
        Ok(())
    }
}

fn csv_error(err: csv::Error) -> Error {
    Error::InvalidInput(format!("CSV write failed: {err}"))
}
