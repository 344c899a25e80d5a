//! One full scheduling round: admit, anneal, commit.

use crate::anneal::{AnnealConfig, AnnealResult, AnnealRunner};
use crate::energy::{EnergyModel, EnergyParams};
use crate::error::Result;
use crate::history::HistoryStore;
use crate::types::{Configuration, ParticipantId};
use tracing::info;

/// Everything a round produced.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "P: serde::Serialize",
        deserialize = "P: serde::Deserialize<'de> + Ord"
    ))
)]
pub struct RoundOutcome<P: Ord> {
    /// The committed configuration.
    pub configuration: Configuration<P>,

    /// History including the committed round.
    pub history: HistoryStore<P>,

    /// Participants admitted to the history before the search.
    pub newcomers: Vec<P>,

    /// Details of the search.
    pub search: AnnealResult<P>,
}

/// Plans and commits round `current_round`.
///
/// `configuration` is the starting point of the search and defines the
/// active pool: anyone in it without a history row is admitted first (with
/// empty history), then the search runs, then its final configuration is
/// committed. `history` itself is not modified.
///
/// # Examples
///
/// ```
/// use u_pairing::{run_round, AnnealConfig, Configuration, EnergyParams, HistoryStore};
///
/// let history = HistoryStore::create_empty(1..=4).unwrap();
/// let start = Configuration::from_tuples([(1, Some(2)), (3, Some(4)), (5, None)]);
/// let config = AnnealConfig::default().with_step_count(20).with_seed(43);
///
/// let outcome = run_round(1, &start, &history, &EnergyParams::default(), &config).unwrap();
/// assert_eq!(outcome.newcomers, vec![5]);
/// assert_eq!(outcome.history.num_rounds(), 1);
/// ```
pub fn run_round<P: ParticipantId>(
    current_round: usize,
    configuration: &Configuration<P>,
    history: &HistoryStore<P>,
    params: &EnergyParams,
    config: &AnnealConfig,
) -> Result<RoundOutcome<P>> {
    configuration.validate()?;

    let newcomers = history.newcomers(configuration);
    let admitted = history.admit_new_participants(newcomers.iter().cloned())?;
    if !newcomers.is_empty() {
        info!(round = current_round, count = newcomers.len(), "admitted new participants");
    }

    let model = EnergyModel::new(current_round, &admitted, *params)?;
    let search = AnnealRunner::run(&model, configuration, config)?;
    let committed = admitted.commit_round(current_round, &search.configuration)?;

    Ok(RoundOutcome {
        configuration: search.configuration.clone(),
        history: committed,
        newcomers,
        search,
    })
}
