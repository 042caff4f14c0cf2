//! Bootstrap configuration
//!
//! All fatal configuration errors are raised here, at construction time,
//! before any fitting starts.

use causal_core::{CancelToken, Error, ExecutionStrategy, Result};

/// Default number of bootstrap resamples
pub const DEFAULT_RESAMPLES: usize = 1000;

/// Minimum surviving resamples required once any resample has been excluded
pub const MIN_SUCCESSFUL_RESAMPLES: usize = 2;

/// A validated pair of percentile ranks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentilePair {
    lower: f64,
    upper: f64,
}

impl PercentilePair {
    /// Create a percentile pair, requiring `0 <= lower < upper <= 100`
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if !(0.0..=100.0).contains(&lower) || !(0.0..=100.0).contains(&upper) || lower >= upper {
            return Err(Error::InvalidPercentileRange { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Two-sided alpha implied by this pair, as a fraction of 1
    pub fn alpha(&self) -> f64 {
        (self.lower + (100.0 - self.upper)) / 100.0
    }

    /// Bonferroni-tightened pair for `n_cells` simultaneous intervals
    ///
    /// Splits the two-sided alpha evenly across cells while keeping the
    /// original lower/upper tail proportions.
    pub fn bonferroni(&self, n_cells: usize) -> Result<Self> {
        if n_cells == 0 {
            return Err(Error::InvalidParameter(
                "cell count for Bonferroni correction must be positive".to_string(),
            ));
        }
        if n_cells == 1 {
            return Ok(*self);
        }
        let k = n_cells as f64;
        PercentilePair::new(self.lower / k, 100.0 - (100.0 - self.upper) / k)
    }

    /// Conventional 2.5 / 97.5 pair
    pub const NINETY_FIVE: Self = Self {
        lower: 2.5,
        upper: 97.5,
    };
}

/// Whether per-cell intervals are corrected for simultaneous coverage
///
/// The multi-outcome, multi-treatment case produces many intervals at once;
/// whether that multiplicity matters is a caller decision, so it is an
/// explicit configuration choice rather than a baked-in default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MultiplicityCorrection {
    /// Marginal per-cell coverage, matching the uncorrected workflow
    #[default]
    None,
    /// Bonferroni across the outcome x treatment cells of each query point
    Bonferroni,
}

/// Configuration for a bootstrap confidence-interval run
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub(crate) n_resamples: usize,
    pub(crate) percentiles: PercentilePair,
    pub(crate) correction: MultiplicityCorrection,
    pub(crate) strategy: ExecutionStrategy,
    pub(crate) seed: Option<u64>,
    pub(crate) cancel: CancelToken,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl BootstrapConfig {
    pub fn new() -> Self {
        Self {
            n_resamples: DEFAULT_RESAMPLES,
            percentiles: PercentilePair::NINETY_FIVE,
            correction: MultiplicityCorrection::None,
            strategy: ExecutionStrategy::Auto,
            seed: None,
            cancel: CancelToken::new(),
        }
    }

    /// Set the number of bootstrap resamples
    ///
    /// # Panics
    /// Panics if `n_resamples` is zero.
    pub fn with_resamples(mut self, n_resamples: usize) -> Self {
        assert!(n_resamples > 0, "Number of resamples must be positive");
        self.n_resamples = n_resamples;
        self
    }

    /// Set the percentile ranks for the interval bounds
    pub fn with_percentiles(mut self, lower: f64, upper: f64) -> Result<Self> {
        self.percentiles = PercentilePair::new(lower, upper)?;
        Ok(self)
    }

    /// Set the multiplicity correction policy
    pub fn with_correction(mut self, correction: MultiplicityCorrection) -> Self {
        self.correction = correction;
        self
    }

    /// Set the batch execution strategy
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set random seed for reproducible resampling
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Attach a cancellation token for the in-flight batch
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn n_resamples(&self) -> usize {
        self.n_resamples
    }

    pub fn percentiles(&self) -> PercentilePair {
        self.percentiles
    }
}
