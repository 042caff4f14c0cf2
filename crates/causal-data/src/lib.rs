//! Retail demand dataset loading and observation-design preparation
//!
//! Loads the store-week-brand orange-juice sales table and prepares
//! [`ObservationSet`](causal_core::ObservationSet)s for elasticity
//! estimation: log-price treatments, z-scored covariates, one-hot brand
//! controls, and an optional cross-brand pivot for cross-elasticities.

mod design;
mod loader;

pub use design::{cross_brand_design, single_product_design, zscore, DemandDesign};
pub use loader::{RetailDataset, RetailRecord, DEMOGRAPHIC_COLUMNS, ID_COLUMNS};
