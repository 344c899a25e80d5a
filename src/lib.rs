//! Round-by-round participant pairing with recency-weighted repeat
//! avoidance.
//!
//! Each round splits the active pool into pairs, leaving exactly one
//! participant out when the pool is odd. The crate keeps the pairing history
//! and searches for the next configuration with simulated annealing,
//! minimizing a "repeat energy" that penalizes recent repeat pairings and
//! repeat exclusions:
//!
//! - **History** ([`HistoryStore`]): append-only, per-round partner table.
//! - **Roster** ([`Roster`]): the active pool as it changes between rounds.
//! - **Decay** ([`decay`]): exponential weights, latest round heaviest.
//! - **Energy** ([`EnergyModel`]): scores a configuration against history.
//! - **Moves** ([`mutate`]): pair swaps and left-out swaps.
//! - **Annealing** ([`AnnealRunner`]): Metropolis search with a growing
//!   inverse temperature.
//! - **Rounds** ([`run_round`]): admit newcomers, anneal, commit.
//!
//! # Examples
//!
//! ```
//! use u_pairing::{run_round, AnnealConfig, Configuration, EnergyParams, HistoryStore};
//!
//! let mut history = HistoryStore::create_empty(1..=6).unwrap();
//! let mut current = Configuration::from_tuples([(1, Some(2)), (3, Some(4)), (5, Some(6))]);
//! let params = EnergyParams::default();
//!
//! for round in 1..=3 {
//!     let config = AnnealConfig::default().with_round_seed(42, round);
//!     let outcome = run_round(round, &current, &history, &params, &config).unwrap();
//!     history = outcome.history;
//!     current = outcome.configuration;
//! }
//! assert_eq!(history.num_rounds(), 3);
//! ```

pub mod anneal;
pub mod decay;
pub mod energy;
pub mod error;
pub mod history;
pub mod mutate;
pub mod roster;
pub mod round;
pub mod types;

pub use anneal::{AnnealConfig, AnnealResult, AnnealRunner, StepRecord};
pub use decay::DecayWeights;
pub use energy::{total_energy, EnergyBreakdown, EnergyModel, EnergyParams};
pub use error::{PairingError, Result};
pub use history::{HistoryCell, HistoryStore};
pub use roster::Roster;
pub use round::{run_round, RoundOutcome};
pub use types::{Configuration, Pair, ParticipantId, Partner};
