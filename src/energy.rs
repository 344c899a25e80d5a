//! Repeat energy of a pairing configuration.
//!
//! ```text
//! E = E_pair * sum over full pairs (a, b) of sum_r w_pair(r) * [history[a, r] == b]
//!   + E_left_out * sum_r w_left_out(r) * [history[x, r] == left out]
//! ```
//!
//! where `x` is the participant left out by the configuration (the second
//! term is 0 if nobody is). Participants without a history row contribute
//! nothing. Lower is better.

use crate::decay::DecayWeights;
use crate::error::{PairingError, Result};
use crate::history::{HistoryCell, HistoryStore};
use crate::types::{Configuration, ParticipantId, Partner};

/// Weights and decay rates of the energy function.
///
/// Defaults: `energy_each_pair = 10`, `energy_each_left_out = 2`, both decay
/// rates `0.1`.
///
/// # Examples
///
/// ```
/// use u_pairing::EnergyParams;
///
/// let params = EnergyParams::default()
///     .with_energy_each_pair(5.0)
///     .with_decay_rate_pair(0.3);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnergyParams {
    /// Energy of a repeat pairing in the immediately preceding round.
    pub energy_each_pair: f64,

    /// Energy of being left out again in the immediately preceding round.
    pub energy_each_left_out: f64,

    /// Decay rate applied to past pairings.
    pub decay_rate_pair: f64,

    /// Decay rate applied to past exclusions.
    pub decay_rate_left_out: f64,
}

impl Default for EnergyParams {
    fn default() -> Self {
        Self {
            energy_each_pair: 10.0,
            energy_each_left_out: 2.0,
            decay_rate_pair: 0.1,
            decay_rate_left_out: 0.1,
        }
    }
}

impl EnergyParams {
    pub fn with_energy_each_pair(mut self, e: f64) -> Self {
        self.energy_each_pair = e;
        self
    }

    pub fn with_energy_each_left_out(mut self, e: f64) -> Self {
        self.energy_each_left_out = e;
        self
    }

    pub fn with_decay_rate_pair(mut self, rate: f64) -> Self {
        self.decay_rate_pair = rate;
        self
    }

    pub fn with_decay_rate_left_out(mut self, rate: f64) -> Self {
        self.decay_rate_left_out = rate;
        self
    }

    /// Validates the parameters. All four must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("energy_each_pair", self.energy_each_pair),
            ("energy_each_left_out", self.energy_each_left_out),
            ("decay_rate_pair", self.decay_rate_pair),
            ("decay_rate_left_out", self.decay_rate_left_out),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(PairingError::InvalidParameter(format!(
                    "{name} must be non-negative and finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Both energy terms of one configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergyBreakdown {
    pub pairing: f64,
    pub left_out: f64,
}

impl EnergyBreakdown {
    pub fn total(&self) -> f64 {
        self.pairing + self.left_out
    }
}

/// Scores configurations for one round against a history snapshot.
///
/// Construction checks that the history is caught up to the round and
/// precomputes the decay weights, so scoring many candidates in a search
/// only pays for the lookups.
#[derive(Debug, Clone)]
pub struct EnergyModel<'a, P: Ord> {
    current_round: usize,
    history: &'a HistoryStore<P>,
    params: EnergyParams,
    pair_weights: DecayWeights,
    left_out_weights: DecayWeights,
}

impl<'a, P: ParticipantId> EnergyModel<'a, P> {
    /// Prepares a model for planning `current_round` (1-based).
    ///
    /// Fails with [`PairingError::InconsistentHistory`] unless the history
    /// holds exactly `current_round - 1` rounds.
    pub fn new(
        current_round: usize,
        history: &'a HistoryStore<P>,
        params: EnergyParams,
    ) -> Result<Self> {
        params.validate()?;
        let columns = history.num_rounds();
        if current_round == 0 || columns != current_round - 1 {
            return Err(PairingError::InconsistentHistory {
                current_round,
                columns,
            });
        }
        Ok(Self {
            current_round,
            history,
            params,
            pair_weights: DecayWeights::for_rounds(columns, params.decay_rate_pair)?,
            left_out_weights: DecayWeights::for_rounds(columns, params.decay_rate_left_out)?,
        })
    }

    pub fn current_round(&self) -> usize {
        self.current_round
    }

    pub fn history(&self) -> &'a HistoryStore<P> {
        self.history
    }

    pub fn params(&self) -> &EnergyParams {
        &self.params
    }

    /// Total repeat energy of `configuration`.
    pub fn energy(&self, configuration: &Configuration<P>) -> Result<f64> {
        self.breakdown(configuration).map(|b| b.total())
    }

    /// Pairing and left-out terms of `configuration`.
    pub fn breakdown(&self, configuration: &Configuration<P>) -> Result<EnergyBreakdown> {
        configuration.validate()?;

        let mut breakdown = EnergyBreakdown::default();
        for pair in configuration.pairs() {
            match &pair.second {
                Partner::Partnered(b) => {
                    breakdown.pairing += self.params.energy_each_pair
                        * self.weighted_matches(&pair.first, &self.pair_weights, |cell| {
                            matches!(cell, HistoryCell::Partnered(p) if p == b)
                        });
                }
                Partner::LeftOut => {
                    breakdown.left_out += self.params.energy_each_left_out
                        * self.weighted_matches(&pair.first, &self.left_out_weights, |cell| {
                            matches!(cell, HistoryCell::LeftOut)
                        });
                }
            }
        }
        Ok(breakdown)
    }

    /// Sum of the weights of the rounds where `participant`'s cell matches.
    fn weighted_matches<F>(&self, participant: &P, weights: &DecayWeights, is_match: F) -> f64
    where
        F: Fn(&HistoryCell<P>) -> bool,
    {
        let Some(row) = self.history.row(participant) else {
            return 0.0;
        };
        weights
            .iter()
            .zip(row)
            .filter(|(_, cell)| is_match(*cell))
            .map(|((_, w), _)| w)
            .sum()
    }
}

/// Scores `configuration` for `current_round` in one call.
///
/// Equivalent to `EnergyModel::new(current_round, history, *params)?.energy(configuration)`.
pub fn total_energy<P: ParticipantId>(
    current_round: usize,
    configuration: &Configuration<P>,
    history: &HistoryStore<P>,
    params: &EnergyParams,
) -> Result<f64> {
    EnergyModel::new(current_round, history, *params)?.energy(configuration)
}
