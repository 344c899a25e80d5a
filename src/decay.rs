//! Recency weights for past rounds.
//!
//! The weight of a past round depends on its age, the distance to the
//! round being planned. When planning round `n` over `n - 1` committed
//! rounds, round `n - 1` has age 0 and weight 1.0, round `n - 2` has age 1,
//! and round 1 has age `n - 2`:
//!
//! ```text
//! weight(age) = exp(-decay_rate * age)
//! ```
//!
//! Weights are looked up by round number so callers never have to line up
//! positional indices against history columns themselves.

use crate::error::{PairingError, Result};

/// Converts a half-life (in rounds) into an exponential decay rate.
///
/// After `half_life` rounds the weight of a repeat has halved.
///
/// # Examples
///
/// ```
/// use u_pairing::decay::decay_rate_from_half_life;
///
/// let rate = decay_rate_from_half_life(3.0).unwrap();
/// assert!(((-rate * 3.0_f64).exp() - 0.5).abs() < 1e-12);
/// ```
pub fn decay_rate_from_half_life(half_life: f64) -> Result<f64> {
    if !half_life.is_finite() || half_life <= 0.0 {
        return Err(PairingError::InvalidParameter(format!(
            "half_life must be positive and finite, got {half_life}"
        )));
    }
    Ok(std::f64::consts::LN_2 / half_life)
}

/// One weight per committed round, indexed by round number.
#[derive(Debug, Clone, PartialEq)]
pub struct DecayWeights {
    /// `by_age[k]` is the weight of the round `k` rounds before the latest.
    by_age: Vec<f64>,
}

impl DecayWeights {
    /// Builds weights for `num_past_rounds` committed rounds.
    ///
    /// Fails if `decay_rate` is negative or not finite.
    pub fn for_rounds(num_past_rounds: usize, decay_rate: f64) -> Result<Self> {
        if !decay_rate.is_finite() || decay_rate < 0.0 {
            return Err(PairingError::InvalidParameter(format!(
                "decay_rate must be non-negative and finite, got {decay_rate}"
            )));
        }
        let by_age = (0..num_past_rounds)
            .map(|age| (-decay_rate * age as f64).exp())
            .collect();
        Ok(Self { by_age })
    }

    /// Number of past rounds covered.
    pub fn len(&self) -> usize {
        self.by_age.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_age.is_empty()
    }

    /// Weight of the round `age` rounds before the latest committed one.
    pub fn weight_for_age(&self, age: usize) -> Option<f64> {
        self.by_age.get(age).copied()
    }

    /// Weight of committed round `round` (1-based).
    ///
    /// Returns `None` for round 0 or rounds that have not been committed.
    pub fn weight_for_round(&self, round: usize) -> Option<f64> {
        if round == 0 || round > self.by_age.len() {
            return None;
        }
        self.weight_for_age(self.by_age.len() - round)
    }

    /// `(round, weight)` in ascending round order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        let n = self.by_age.len();
        (1..=n).map(move |round| (round, self.by_age[n - round]))
    }
}
