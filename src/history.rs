//! Pairing history: who was paired with whom in every committed round.
//!
//! The store is a value. Every mutation ([`HistoryStore::commit_round`],
//! [`HistoryStore::admit_new_participants`]) returns a new store and leaves
//! the receiver untouched, so a search can read one snapshot while the
//! caller holds on to it.
//!
//! Rounds are numbered from 1. Column `r` holds the result of round `r`.

use crate::error::{PairingError, Result};
use crate::types::{Configuration, ParticipantId, Partner};
use std::collections::BTreeMap;
use tracing::debug;

/// What a participant did in one committed round.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HistoryCell<P> {
    /// Not part of the pool that round (joined later or had left).
    NoHistory,
    Partnered(P),
    LeftOut,
}

impl<P> HistoryCell<P> {
    pub fn is_no_history(&self) -> bool {
        matches!(self, HistoryCell::NoHistory)
    }
}

/// Append-only table of per-round partners, keyed by participant.
///
/// # Examples
///
/// ```
/// use u_pairing::{Configuration, HistoryCell, HistoryStore};
///
/// let empty = HistoryStore::create_empty([1, 2, 3]).unwrap();
/// let round_1 = Configuration::from_tuples([(1, Some(2)), (3, None)]);
/// let history = empty.commit_round(1, &round_1).unwrap();
///
/// assert_eq!(history.num_rounds(), 1);
/// assert_eq!(history.cell(&2, 1), Some(&HistoryCell::Partnered(1)));
/// assert_eq!(history.cell(&3, 1), Some(&HistoryCell::LeftOut));
/// assert_eq!(empty.num_rounds(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "P: serde::Serialize",
        deserialize = "P: serde::Deserialize<'de> + Ord"
    ))
)]
pub struct HistoryStore<P: Ord> {
    rows: BTreeMap<P, Vec<HistoryCell<P>>>,
    num_rounds: usize,
}

impl<P: ParticipantId> HistoryStore<P> {
    /// Creates a store with one empty row per id and no rounds.
    pub fn create_empty<I>(participant_ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
    {
        let store = Self {
            rows: BTreeMap::new(),
            num_rounds: 0,
        };
        store.admit_new_participants(participant_ids)
    }

    /// Number of committed rounds (columns).
    pub fn num_rounds(&self) -> usize {
        self.num_rounds
    }

    /// Number of participants with a row.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All participants that have a row, in id order.
    pub fn participants(&self) -> impl Iterator<Item = &P> {
        self.rows.keys()
    }

    pub fn contains(&self, participant: &P) -> bool {
        self.rows.contains_key(participant)
    }

    /// The participant's cells, index 0 being round 1.
    pub fn row(&self, participant: &P) -> Option<&[HistoryCell<P>]> {
        self.rows.get(participant).map(Vec::as_slice)
    }

    /// The cell for `participant` in `round` (1-based).
    ///
    /// Returns `None` if the participant has no row or the round has not
    /// been committed.
    pub fn cell(&self, participant: &P, round: usize) -> Option<&HistoryCell<P>> {
        if round == 0 {
            return None;
        }
        self.rows.get(participant)?.get(round - 1)
    }

    /// Every committed round for the participant with what they did.
    ///
    /// Rounds before the participant joined report
    /// [`HistoryCell::NoHistory`].
    pub fn partner_history(&self, participant: &P) -> Result<Vec<(usize, HistoryCell<P>)>> {
        let row = self
            .rows
            .get(participant)
            .ok_or_else(|| PairingError::UnknownParticipant(format!("{participant:?}")))?;
        Ok(row
            .iter()
            .enumerate()
            .map(|(i, cell)| (i + 1, cell.clone()))
            .collect())
    }

    /// Participants of `configuration` that have no row yet, in
    /// configuration order.
    pub fn newcomers(&self, configuration: &Configuration<P>) -> Vec<P> {
        configuration
            .participants()
            .filter(|id| !self.rows.contains_key(*id))
            .cloned()
            .collect()
    }

    /// Returns a new store with a row for each new id, backfilled with
    /// [`HistoryCell::NoHistory`] for every committed round.
    ///
    /// Fails with [`PairingError::DuplicateParticipant`] if an id already has
    /// a row or is listed twice.
    pub fn admit_new_participants<I>(&self, new_ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
    {
        let mut next = self.clone();
        for id in new_ids {
            if next.rows.contains_key(&id) {
                return Err(PairingError::DuplicateParticipant(format!("{id:?}")));
            }
            next.rows
                .insert(id, vec![HistoryCell::NoHistory; self.num_rounds]);
        }
        Ok(next)
    }

    /// Returns a new store with `configuration` appended as round
    /// `round_number`.
    ///
    /// Full pairs are written symmetrically. A left-out participant gets
    /// [`HistoryCell::LeftOut`] on their own row only. Participants seen for
    /// the first time gain a backfilled row; rows not mentioned in the
    /// configuration get [`HistoryCell::NoHistory`] for this round.
    pub fn commit_round(
        &self,
        round_number: usize,
        configuration: &Configuration<P>,
    ) -> Result<Self> {
        let expected = self.num_rounds + 1;
        if round_number != expected {
            return Err(PairingError::InvalidRound {
                expected,
                got: round_number,
            });
        }
        configuration.validate()?;

        let newcomers = self.newcomers(configuration);
        let mut next = self.admit_new_participants(newcomers)?;
        for row in next.rows.values_mut() {
            row.push(HistoryCell::NoHistory);
        }

        let column = round_number - 1;
        for pair in configuration.pairs() {
            match &pair.second {
                Partner::Partnered(q) => {
                    next.set(&pair.first, column, HistoryCell::Partnered(q.clone()))?;
                    next.set(q, column, HistoryCell::Partnered(pair.first.clone()))?;
                }
                Partner::LeftOut => {
                    next.set(&pair.first, column, HistoryCell::LeftOut)?;
                }
            }
        }
        next.num_rounds = round_number;

        debug!(
            round = round_number,
            pairs = configuration.pairs().len(),
            participants = next.rows.len(),
            "committed round to history"
        );
        Ok(next)
    }

    /// Writes one cell. Both the row and the column must already exist.
    fn set(&mut self, participant: &P, column: usize, cell: HistoryCell<P>) -> Result<()> {
        let row = self
            .rows
            .get_mut(participant)
            .ok_or_else(|| PairingError::UnknownParticipant(format!("{participant:?}")))?;
        let width = row.len();
        let slot = row.get_mut(column).ok_or(PairingError::InvalidRound {
            expected: width,
            got: column + 1,
        })?;
        *slot = cell;
        Ok(())
    }
}
