//! Annealing execution loop.

use super::config::AnnealConfig;
use crate::energy::EnergyModel;
use crate::error::{PairingError, Result};
use crate::mutate::propose_neighbor;
use crate::types::{Configuration, ParticipantId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// What happened in one annealing step.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepRecord<P> {
    /// Zero-based step index.
    pub step: usize,

    /// Beta in effect when the proposal was judged.
    pub beta: f64,

    /// The proposed configuration.
    pub configuration: Configuration<P>,

    /// Energy of the proposal.
    pub energy: f64,

    /// Whether the proposal replaced the current configuration.
    pub accepted: bool,
}

/// Result of an annealing run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealResult<P> {
    /// The configuration the search ended on.
    pub configuration: Configuration<P>,

    /// Energy of `configuration`.
    pub energy: f64,

    /// Energy of the starting configuration.
    pub initial_energy: f64,

    /// Number of steps executed.
    pub steps: usize,

    /// Number of accepted proposals (including improvements).
    pub accepted_moves: usize,

    /// Number of accepted proposals that strictly lowered the energy.
    pub improving_moves: usize,

    /// Beta after the last cooling step.
    pub final_beta: f64,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Per-step records, empty unless [`AnnealConfig::record_trace`] is set.
    pub trace: Vec<StepRecord<P>>,
}

/// Executes the annealing search for one round.
pub struct AnnealRunner;

impl AnnealRunner {
    /// Anneals from `initial` and returns the final configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_pairing::{
    ///     AnnealConfig, AnnealRunner, Configuration, EnergyModel, EnergyParams, HistoryStore,
    /// };
    ///
    /// let round_1 = Configuration::from_tuples([(1, Some(2)), (3, Some(4))]);
    /// let history = HistoryStore::create_empty(1..=4)
    ///     .and_then(|h| h.commit_round(1, &round_1))
    ///     .unwrap();
    ///
    /// let model = EnergyModel::new(2, &history, EnergyParams::default()).unwrap();
    /// let config = AnnealConfig::default().with_step_count(50).with_seed(42);
    /// let result = AnnealRunner::run(&model, &round_1, &config).unwrap();
    ///
    /// assert!(result.energy <= result.initial_energy);
    /// ```
    pub fn run<P: ParticipantId>(
        model: &EnergyModel<'_, P>,
        initial: &Configuration<P>,
        config: &AnnealConfig,
    ) -> Result<AnnealResult<P>> {
        Self::run_with_cancel(model, initial, config, None)
    }

    /// Runs with an optional cancellation token, checked before every step.
    pub fn run_with_cancel<P: ParticipantId>(
        model: &EnergyModel<'_, P>,
        initial: &Configuration<P>,
        config: &AnnealConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AnnealResult<P>> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        Self::run_with_rng(model, initial, config, &mut rng, cancel.as_deref())
    }

    /// Runs with a caller-owned generator. `config.seed` is ignored.
    ///
    /// Each step draws from `rng` in a fixed order: pair swap, left-out
    /// swap, acceptance.
    pub fn run_with_rng<P: ParticipantId, R: Rng>(
        model: &EnergyModel<'_, P>,
        initial: &Configuration<P>,
        config: &AnnealConfig,
        rng: &mut R,
        cancel: Option<&AtomicBool>,
    ) -> Result<AnnealResult<P>> {
        config.validate()?;

        let mut current = initial.clone();
        let mut current_energy = model.energy(&current)?;
        let initial_energy = current_energy;

        let mut beta = config.beta_init;
        let mut steps = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut cancelled = false;
        let mut trace = Vec::with_capacity(if config.record_trace {
            config.step_count
        } else {
            0
        });

        for step in 0..config.step_count {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                warn!(round = model.current_round(), step, "annealing cancelled");
                cancelled = true;
                break;
            }

            let proposal = propose_neighbor(&current, rng)?;
            let proposal_energy = model.energy(&proposal)?;
            let delta = proposal_energy - current_energy;

            // Metropolis acceptance; the draw happens on every step
            let probability = (-beta * delta).exp().min(1.0);
            let accepted = rng.random::<f64>() < probability;

            debug!(
                round = model.current_round(),
                step,
                beta,
                energy = proposal_energy,
                current_energy,
                accepted,
                "annealing step"
            );

            if config.record_trace {
                trace.push(StepRecord {
                    step,
                    beta,
                    configuration: proposal.clone(),
                    energy: proposal_energy,
                    accepted,
                });
            }

            if accepted {
                if delta < 0.0 {
                    improving_moves += 1;
                }
                accepted_moves += 1;
                current = proposal;
                current_energy = proposal_energy;
            }

            steps += 1;
            beta = (beta * config.cooling_factor).min(config.beta_max);
        }

        info!(
            round = model.current_round(),
            steps,
            accepted_moves,
            initial_energy,
            energy = current_energy,
            "annealing finished"
        );

        Ok(AnnealResult {
            configuration: current,
            energy: current_energy,
            initial_energy,
            steps,
            accepted_moves,
            improving_moves,
            final_beta: beta,
            cancelled,
            trace,
        })
    }

    /// Runs one independent search per seed and keeps the lowest-energy
    /// result. Ties go to the earliest seed.
    ///
    /// With the `parallel` feature the searches run on the rayon pool.
    /// Fails with [`PairingError::InvalidParameter`] if `seeds` is empty.
    pub fn run_trials<P: ParticipantId>(
        model: &EnergyModel<'_, P>,
        initial: &Configuration<P>,
        config: &AnnealConfig,
        seeds: &[u64],
    ) -> Result<AnnealResult<P>> {
        if seeds.is_empty() {
            return Err(PairingError::InvalidParameter(
                "run_trials needs at least one seed".into(),
            ));
        }

        let run_seed = |&seed: &u64| Self::run(model, initial, &config.clone().with_seed(seed));

        #[cfg(feature = "parallel")]
        let results: Vec<AnnealResult<P>> = seeds.par_iter().map(run_seed).collect::<Result<_>>()?;

        #[cfg(not(feature = "parallel"))]
        let results: Vec<AnnealResult<P>> = seeds.iter().map(run_seed).collect::<Result<_>>()?;

        let mut best: Option<AnnealResult<P>> = None;
        for result in results {
            if best.as_ref().is_none_or(|b| result.energy < b.energy) {
                best = Some(result);
            }
        }
        best.ok_or_else(|| PairingError::InvalidParameter("no trial produced a result".into()))
    }
}
