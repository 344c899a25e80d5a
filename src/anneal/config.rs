//! Annealing configuration.

use crate::error::{PairingError, Result};

/// Configuration for the annealing driver.
///
/// Beta is an inverse temperature: the search starts at `beta_init` and
/// multiplies it by `cooling_factor` after every step, never exceeding
/// `beta_max`.
///
/// # Examples
///
/// ```
/// use u_pairing::AnnealConfig;
///
/// let config = AnnealConfig::default()
///     .with_beta_init(0.5)
///     .with_beta_max(50.0)
///     .with_cooling_factor(1.1)
///     .with_step_count(500)
///     .with_seed(46);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealConfig {
    /// Initial inverse temperature. Lower values accept more uphill moves.
    pub beta_init: f64,

    /// Upper bound on beta.
    pub beta_max: f64,

    /// Multiplier applied to beta after every step. Must be at least 1.
    pub cooling_factor: f64,

    /// Number of proposals to evaluate.
    pub step_count: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,

    /// Whether to keep a [`super::StepRecord`] for every step.
    ///
    /// Each record holds a clone of the proposal, so the trace grows with
    /// `step_count` times the pool size. Turn it off for long searches over
    /// large pools.
    pub record_trace: bool,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            beta_init: 1.0,
            beta_max: 100.0,
            cooling_factor: 1.2,
            step_count: 100,
            seed: None,
            record_trace: true,
        }
    }
}

impl AnnealConfig {
    pub fn with_beta_init(mut self, beta: f64) -> Self {
        self.beta_init = beta;
        self
    }

    pub fn with_beta_max(mut self, beta: f64) -> Self {
        self.beta_max = beta;
        self
    }

    pub fn with_cooling_factor(mut self, factor: f64) -> Self {
        self.cooling_factor = factor;
        self
    }

    pub fn with_step_count(mut self, n: usize) -> Self {
        self.step_count = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_record_trace(mut self, record: bool) -> Self {
        self.record_trace = record;
        self
    }

    /// Derives the seed for `round` from a base seed as `base + round`.
    pub fn with_round_seed(self, base: u64, round: usize) -> Self {
        self.with_seed(base.wrapping_add(round as u64))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.beta_init.is_finite() || self.beta_init <= 0.0 {
            return Err(PairingError::InvalidParameter(format!(
                "beta_init must be positive and finite, got {}",
                self.beta_init
            )));
        }
        if !self.beta_max.is_finite() || self.beta_max < self.beta_init {
            return Err(PairingError::InvalidParameter(format!(
                "beta_max must be finite and at least beta_init, got {}",
                self.beta_max
            )));
        }
        if !self.cooling_factor.is_finite() || self.cooling_factor < 1.0 {
            return Err(PairingError::InvalidParameter(format!(
                "cooling_factor must be at least 1, got {}",
                self.cooling_factor
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnnealConfig::default();
        assert!((config.beta_init - 1.0).abs() < 1e-12);
        assert!((config.beta_max - 100.0).abs() < 1e-12);
        assert!((config.cooling_factor - 1.2).abs() < 1e-12);
        assert_eq!(config.step_count, 100);
        assert!(config.seed.is_none());
        assert!(config.record_trace);
        assert!(!config.with_record_trace(false).record_trace);
    }

    #[test]
    fn test_validate_ok() {
        assert!(AnnealConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_bad_beta_init() {
        assert!(AnnealConfig::default().with_beta_init(0.0).validate().is_err());
        assert!(AnnealConfig::default()
            .with_beta_init(f64::INFINITY)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_beta_max_below_init() {
        let config = AnnealConfig::default()
            .with_beta_init(10.0)
            .with_beta_max(5.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_cooling_factor_below_one() {
        let config = AnnealConfig::default().with_cooling_factor(0.95);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_round_seed() {
        let config = AnnealConfig::default().with_round_seed(42, 4);
        assert_eq!(config.seed, Some(46));
    }
}
