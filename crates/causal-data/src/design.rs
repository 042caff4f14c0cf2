//! Observation designs for demand estimation
//!
//! Turns the flat store-week-brand table into an [`ObservationSet`] the
//! effect estimator can consume. Treatments are log prices (so the effect is
//! an elasticity), numeric covariates are z-scored, and brand membership is
//! one-hot encoded into the controls.
//!
//! Two designs are supported:
//!
//! - **single product**: one outcome (log units) and one treatment
//!   (log price), with brand dummies among the controls; effects are own-price
//!   elasticities by effect-modifier level.
//! - **cross brand**: store-week cells pivoted so outcomes and treatments
//!   both have one column per brand; effects are the full matrix of own- and
//!   cross-price elasticities.

use crate::loader::{RetailDataset, DEMOGRAPHIC_COLUMNS};
use causal_core::{Error, Matrix, ObservationSet, Result};
use std::collections::BTreeMap;
use tracing::debug;

/// An observation set plus the labels describing its effect axes
#[derive(Debug, Clone)]
pub struct DemandDesign {
    pub observations: ObservationSet,
    pub outcome_labels: Vec<String>,
    pub treatment_labels: Vec<String>,
    /// Name of the effect-modifier column
    pub modifier_label: String,
}

/// Center and scale to unit variance, in place
///
/// A constant column scales to all zeros rather than dividing by zero.
pub fn zscore(values: &mut [f64]) {
    let n = values.len() as f64;
    if values.is_empty() {
        return;
    }
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let sd = variance.sqrt();
    for v in values.iter_mut() {
        *v = if sd > 0.0 { (*v - mean) / sd } else { 0.0 };
    }
}

fn log_price(price: f64, line_hint: usize) -> Result<f64> {
    if price <= 0.0 || !price.is_finite() {
        return Err(Error::InvalidInput(format!(
            "price {price} of record {line_hint} must be positive for a log-price treatment"
        )));
    }
    Ok(price.ln())
}

/// Z-score each demographic column across the given rows (row-major)
fn normalized_demographics(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n_cols = DEMOGRAPHIC_COLUMNS.len();
    let mut columns: Vec<Vec<f64>> = (0..n_cols)
        .map(|c| rows.iter().map(|r| r[c]).collect())
        .collect();
    for column in &mut columns {
        zscore(column);
    }
    (0..rows.len())
        .map(|r| columns.iter().map(|c| c[r]).collect())
        .collect()
}

/// Single-outcome, single-treatment elasticity design
///
/// Outcome: log units sold. Treatment: log price. Effect modifier: the named
/// demographic column, kept in natural units so query points read naturally.
/// Controls: the z-scored demographics plus one-hot brand dummies.
pub fn single_product_design(dataset: &RetailDataset, modifier: &str) -> Result<DemandDesign> {
    let modifier_idx = dataset.demographic_index(modifier)?;
    let brands = dataset.brands();

    let mut outcomes = Vec::with_capacity(dataset.len());
    let mut treatments = Vec::with_capacity(dataset.len());
    let mut modifiers = Vec::with_capacity(dataset.len());
    let demo_rows: Vec<Vec<f64>> = dataset
        .records()
        .iter()
        .map(|r| r.demographics.clone())
        .collect();
    let normalized = normalized_demographics(&demo_rows);

    let mut controls = Vec::with_capacity(dataset.len());
    for (i, record) in dataset.records().iter().enumerate() {
        outcomes.push(record.log_move);
        treatments.push(log_price(record.price, i)?);
        modifiers.push(record.demographics[modifier_idx]);

        let mut row = normalized[i].clone();
        // One-hot brand dummies appended after the demographics.
        for brand in &brands {
            row.push(if record.brand == *brand { 1.0 } else { 0.0 });
        }
        controls.push(row);
    }

    let observations = ObservationSet::new(
        Matrix::column(outcomes),
        Matrix::column(treatments),
        Matrix::column(modifiers),
        Matrix::from_rows(&controls)?,
    )?;

    Ok(DemandDesign {
        observations,
        outcome_labels: vec!["log_units".to_string()],
        treatment_labels: vec!["log_price".to_string()],
        modifier_label: modifier.to_string(),
    })
}

/// Cross-brand elasticity design
///
/// Pivots each (store, week) cell into one record whose outcome vector holds
/// every brand's log units and whose treatment vector holds every brand's
/// log price. Cells missing a brand are dropped; their count is logged.
/// Demographics are store-level, so every row of a kept cell must carry the
/// same demographic values; a disagreement is an input error.
pub fn cross_brand_design(dataset: &RetailDataset, modifier: &str) -> Result<DemandDesign> {
    let modifier_idx = dataset.demographic_index(modifier)?;
    let brands = dataset.brands();
    let brand_position = |name: &str| brands.iter().position(|b| b == name);

    // BTreeMap keeps store-week cells in a stable order.
    let mut cells: BTreeMap<(u32, u32), Vec<usize>> = BTreeMap::new();
    for (i, record) in dataset.records().iter().enumerate() {
        cells.entry((record.store, record.week)).or_default().push(i);
    }

    let mut outcomes = Vec::new();
    let mut treatments = Vec::new();
    let mut modifiers = Vec::new();
    let mut demo_rows = Vec::new();
    let mut dropped = 0usize;

    'cells: for ((store, week), members) in &cells {
        let mut cell_outcomes = vec![f64::NAN; brands.len()];
        let mut cell_treatments = vec![f64::NAN; brands.len()];
        for &i in members {
            let record = &dataset.records()[i];
            // Brand came from the dataset, so the position always resolves.
            let b = brand_position(&record.brand).unwrap();
            cell_outcomes[b] = record.log_move;
            cell_treatments[b] = log_price(record.price, i)?;
        }
        if cell_outcomes.iter().any(|v| v.is_nan()) {
            dropped += 1;
            continue 'cells;
        }

        let first = &dataset.records()[members[0]];
        for &i in &members[1..] {
            if dataset.records()[i].demographics != first.demographics {
                return Err(Error::InvalidInput(format!(
                    "store {store} week {week} has rows with differing demographics"
                )));
            }
        }
        outcomes.push(cell_outcomes);
        treatments.push(cell_treatments);
        modifiers.push(first.demographics[modifier_idx]);
        demo_rows.push(first.demographics.clone());
    }

    if dropped > 0 {
        debug!("dropped {dropped} store-week cells missing a brand");
    }
    if outcomes.is_empty() {
        return Err(Error::InsufficientData {
            expected: 1,
            actual: 0,
        });
    }

    let controls = normalized_demographics(&demo_rows);

    let observations = ObservationSet::new(
        Matrix::from_rows(&outcomes)?,
        Matrix::from_rows(&treatments)?,
        Matrix::column(modifiers),
        Matrix::from_rows(&controls)?,
    )?;

    Ok(DemandDesign {
        observations,
        outcome_labels: brands.iter().map(|b| format!("log_units_{b}")).collect(),
        treatment_labels: brands.iter().map(|b| format!("log_price_{b}")).collect(),
        modifier_label: modifier.to_string(),
    })
}
