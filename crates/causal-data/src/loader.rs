//! Retail orange-juice dataset loading
//!
//! Reads the store-week-brand sales table (log quantity sold, shelf price,
//! store demographics) once at startup. The only schema validation is column
//! presence: every required column that is absent is reported in a single
//! [`Error::MissingColumns`], and numeric parse failures name the column and
//! line.

use causal_core::{Error, Result};
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Identifier and sales columns
pub const ID_COLUMNS: &[&str] = &["store", "brand", "week", "logmove", "price"];

/// Store demographic and trade-area covariates
pub const DEMOGRAPHIC_COLUMNS: &[&str] = &[
    "AGE60", "EDUC", "ETHNIC", "INCOME", "HHLARGE", "WORKWOM", "HVAL150", "SSTRDIST", "SVOL",
    "CPDIST5", "CPWVOL5",
];

/// One store-week-brand sales record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetailRecord {
    pub store: u32,
    pub brand: String,
    pub week: u32,
    /// Natural log of units sold
    pub log_move: f64,
    /// Shelf price in dollars
    pub price: f64,
    /// Values of [`DEMOGRAPHIC_COLUMNS`], in order
    pub demographics: Vec<f64>,
}

/// The loaded dataset
#[derive(Debug, Clone)]
pub struct RetailDataset {
    records: Vec<RetailRecord>,
}

impl RetailDataset {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    /// Parse the dataset from any reader producing CSV with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv = csv::Reader::from_reader(reader);
        let headers = csv
            .headers()
            .map_err(|e| Error::InvalidInput(format!("cannot read CSV header: {e}")))?
            .clone();

        let position = |name: &str| headers.iter().position(|h| h == name);

        let missing: Vec<String> = ID_COLUMNS
            .iter()
            .chain(DEMOGRAPHIC_COLUMNS)
            .filter(|name| position(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingColumns { columns: missing });
        }

        // Presence was just checked.
        let col = |name: &str| position(name).unwrap();
        let store_idx = col("store");
        let brand_idx = col("brand");
        let week_idx = col("week");
        let logmove_idx = col("logmove");
        let price_idx = col("price");
        let demo_idx: Vec<usize> = DEMOGRAPHIC_COLUMNS.iter().map(|name| col(name)).collect();

        let mut records = Vec::new();
        for (i, row) in csv.records().enumerate() {
            let line = i + 2; // header is line 1
            let row =
                row.map_err(|e| Error::InvalidInput(format!("malformed CSV at line {line}: {e}")))?;

            let parse_f64 = |idx: usize, name: &str| -> Result<f64> {
                row[idx].trim().parse::<f64>().map_err(|_| {
                    Error::InvalidInput(format!(
                        "column '{name}' at line {line}: '{}' is not numeric",
                        &row[idx]
                    ))
                })
            };
            let parse_u32 = |idx: usize, name: &str| -> Result<u32> {
                row[idx].trim().parse::<u32>().map_err(|_| {
                    Error::InvalidInput(format!(
                        "column '{name}' at line {line}: '{}' is not an integer",
                        &row[idx]
                    ))
                })
            };

            let demographics = DEMOGRAPHIC_COLUMNS
                .iter()
                .zip(&demo_idx)
                .map(|(name, &idx)| parse_f64(idx, name))
                .collect::<Result<Vec<f64>>>()?;

            records.push(RetailRecord {
                store: parse_u32(store_idx, "store")?,
                brand: row[brand_idx].trim().to_string(),
                week: parse_u32(week_idx, "week")?,
                log_move: parse_f64(logmove_idx, "logmove")?,
                price: parse_f64(price_idx, "price")?,
                demographics,
            });
        }

        if records.is_empty() {
            return Err(Error::empty_input());
        }

        debug!("loaded {} retail records", records.len());
        Ok(Self { records })
    }

    /// Build a dataset from already-parsed records
    pub fn from_records(records: Vec<RetailRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::empty_input());
        }
        for (i, record) in records.iter().enumerate() {
            if record.demographics.len() != DEMOGRAPHIC_COLUMNS.len() {
                return Err(Error::size_mismatch(
                    DEMOGRAPHIC_COLUMNS.len(),
                    record.demographics.len(),
                    &format!("demographics of record {i}"),
                ));
            }
        }
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[RetailRecord] {
        &self.records
    }

    /// Distinct brand names in first-appearance order
    pub fn brands(&self) -> Vec<String> {
        let mut brands: Vec<String> = Vec::new();
        for record in &self.records {
            if !brands.contains(&record.brand) {
                brands.push(record.brand.clone());
            }
        }
        brands
    }

    /// Index of a demographic column name
    pub fn demographic_index(&self, name: &str) -> Result<usize> {
        DEMOGRAPHIC_COLUMNS
            .iter()
            .position(|c| *c == name)
            .ok_or_else(|| Error::MissingColumns {
                columns: vec![name.to_string()],
            })
    }
}
