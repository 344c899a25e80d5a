//! The active participant pool.
//!
//! The roster changes between rounds as people join and leave. Leaving the
//! roster never touches the [`crate::HistoryStore`]; past rows stay so a
//! returning participant is still scored against their history.

use crate::error::{PairingError, Result};
use crate::types::{Configuration, ParticipantId};
use std::collections::BTreeSet;

/// Set of participants eligible for the next round.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "P: serde::Serialize",
        deserialize = "P: serde::Deserialize<'de> + Ord"
    ))
)]
pub struct Roster<P: Ord> {
    ids: BTreeSet<P>,
}

impl<P: ParticipantId> Roster<P> {
    /// Creates a roster. Fails with [`PairingError::DuplicateParticipant`]
    /// if an id is listed twice.
    pub fn new<I>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
    {
        let mut set = BTreeSet::new();
        for id in ids {
            if set.contains(&id) {
                return Err(PairingError::DuplicateParticipant(format!("{id:?}")));
            }
            set.insert(id);
        }
        Ok(Self { ids: set })
    }

    /// The roster implied by a configuration's participants.
    pub fn from_configuration(configuration: &Configuration<P>) -> Result<Self> {
        configuration.validate()?;
        Self::new(configuration.participants().cloned())
    }

    /// Adds a participant. Adding someone already present is a no-op.
    ///
    /// Returns whether the participant was new.
    pub fn add(&mut self, id: P) -> bool {
        self.ids.insert(id)
    }

    /// Removes a participant. Fails with
    /// [`PairingError::UnknownParticipant`] if they are not on the roster.
    pub fn remove(&mut self, id: &P) -> Result<()> {
        if self.ids.remove(id) {
            Ok(())
        } else {
            Err(PairingError::UnknownParticipant(format!("{id:?}")))
        }
    }

    pub fn contains(&self, id: &P) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Participants in id order.
    pub fn ids(&self) -> impl Iterator<Item = &P> {
        self.ids.iter()
    }

    /// Checks that `configuration` is well formed and covers this roster
    /// exactly once each.
    pub fn validate_configuration(&self, configuration: &Configuration<P>) -> Result<()> {
        configuration.validate()?;

        if let Some(stranger) = configuration.participants().find(|id| !self.ids.contains(*id)) {
            return Err(PairingError::MalformedConfiguration(format!(
                "participant {stranger:?} is not on the roster"
            )));
        }
        let placed: BTreeSet<&P> = configuration.participants().collect();
        if let Some(missing) = self.ids.iter().find(|id| !placed.contains(id)) {
            return Err(PairingError::MalformedConfiguration(format!(
                "participant {missing:?} is missing from the configuration"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_participant() {
        let mut roster = Roster::new([1, 2, 3]).unwrap();
        assert!(roster.add(4));
        assert!(!roster.add(4));
        assert_eq!(roster.ids().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_remove_participant() {
        let mut roster = Roster::new([1, 2, 3, 4]).unwrap();
        roster.remove(&3).unwrap();
        assert_eq!(roster.ids().copied().collect::<Vec<_>>(), vec![1, 2, 4]);
    }

    #[test]
    fn test_remove_unknown() {
        let mut roster = Roster::new([1, 2]).unwrap();
        assert_eq!(
            roster.remove(&9),
            Err(PairingError::UnknownParticipant("9".into()))
        );
    }

    #[test]
    fn test_new_rejects_duplicates() {
        assert!(matches!(
            Roster::new([1, 2, 2]),
            Err(PairingError::DuplicateParticipant(_))
        ));
    }

    #[test]
    fn test_from_configuration() {
        let cfg = Configuration::from_tuples([(3, Some(5)), (1, Some(4)), (6, None)]);
        let roster = Roster::from_configuration(&cfg).unwrap();
        assert_eq!(roster.len(), 5);
        assert!(roster.contains(&6));
    }

    #[test]
    fn test_validate_configuration_partition() {
        let roster = Roster::new(1..=5).unwrap();
        let exact = Configuration::from_tuples([(1, Some(2)), (3, Some(4)), (5, None)]);
        assert!(roster.validate_configuration(&exact).is_ok());

        let stranger = Configuration::from_tuples([(1, Some(2)), (3, Some(4)), (6, None)]);
        assert!(matches!(
            roster.validate_configuration(&stranger),
            Err(PairingError::MalformedConfiguration(_))
        ));

        let missing = Configuration::from_tuples([(1, Some(2)), (3, None)]);
        assert!(matches!(
            roster.validate_configuration(&missing),
            Err(PairingError::MalformedConfiguration(_))
        ));
    }
}
