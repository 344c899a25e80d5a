//! Participants, pairs and pairing configurations.

use crate::error::{PairingError, Result};
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

/// Identifier of a participant.
///
/// Blanket-implemented, so integers, strings and any other ordered,
/// hashable id type can be used directly.
pub trait ParticipantId: Clone + Eq + Ord + Hash + Debug + Send + Sync {}

impl<T> ParticipantId for T where T: Clone + Eq + Ord + Hash + Debug + Send + Sync {}

/// The second slot of a pair: a real partner or the left-out marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Partner<P> {
    Partnered(P),
    LeftOut,
}

impl<P> Partner<P> {
    /// Returns the partner id, or `None` for the left-out marker.
    pub fn as_partner(&self) -> Option<&P> {
        match self {
            Partner::Partnered(p) => Some(p),
            Partner::LeftOut => None,
        }
    }

    pub fn is_left_out(&self) -> bool {
        matches!(self, Partner::LeftOut)
    }
}

/// One entry of a pairing configuration.
///
/// A full pair has `second = Partnered(q)`; a left-out pair carries
/// `second = LeftOut` and excludes `first` from this round.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pair<P> {
    pub first: P,
    pub second: Partner<P>,
}

impl<P: ParticipantId> Pair<P> {
    /// Creates a full pair of two real participants.
    pub fn full(first: P, second: P) -> Self {
        Self {
            first,
            second: Partner::Partnered(second),
        }
    }

    /// Creates a pair that leaves `participant` out.
    pub fn left_out(participant: P) -> Self {
        Self {
            first: participant,
            second: Partner::LeftOut,
        }
    }

    pub fn is_full(&self) -> bool {
        !self.second.is_left_out()
    }

    /// Iterates over the real participants of this pair.
    pub fn members(&self) -> impl Iterator<Item = &P> {
        std::iter::once(&self.first).chain(self.second.as_partner())
    }
}

/// An ordered collection of pairs partitioning the active participants.
///
/// Construction does not validate; call [`Configuration::validate`] (or use
/// [`Configuration::try_new`]) before trusting the structure. Every
/// component that consumes a configuration validates it first.
///
/// # Examples
///
/// ```
/// use u_pairing::{Configuration, Pair};
///
/// let cfg = Configuration::new(vec![Pair::full(1, 2), Pair::left_out(3)]);
/// assert!(cfg.validate().is_ok());
/// assert_eq!(cfg.left_out(), Some(&3));
/// assert_eq!(cfg.full_pair_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Configuration<P> {
    pairs: Vec<Pair<P>>,
}

impl<P: ParticipantId> Configuration<P> {
    pub fn new(pairs: Vec<Pair<P>>) -> Self {
        Self { pairs }
    }

    /// Creates a configuration and validates its structure.
    pub fn try_new(pairs: Vec<Pair<P>>) -> Result<Self> {
        let cfg = Self::new(pairs);
        cfg.validate()?;
        Ok(cfg)
    }

    /// Builds a configuration from `(p, Some(q))` full pairs and
    /// `(p, None)` left-out entries.
    pub fn from_tuples<I>(tuples: I) -> Self
    where
        I: IntoIterator<Item = (P, Option<P>)>,
    {
        tuples
            .into_iter()
            .map(|(first, second)| match second {
                Some(q) => Pair::full(first, q),
                None => Pair::left_out(first),
            })
            .collect()
    }

    pub fn pairs(&self) -> &[Pair<P>] {
        &self.pairs
    }

    pub fn into_pairs(self) -> Vec<Pair<P>> {
        self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Participants in pair order, first member before second.
    pub fn participants(&self) -> impl Iterator<Item = &P> {
        self.pairs.iter().flat_map(|pair| pair.members())
    }

    pub fn participant_count(&self) -> usize {
        self.participants().count()
    }

    /// Positions of the full pairs in this configuration.
    pub fn full_pair_indices(&self) -> Vec<usize> {
        self.pairs
            .iter()
            .enumerate()
            .filter(|(_, pair)| pair.is_full())
            .map(|(i, _)| i)
            .collect()
    }

    /// Full pairs as `(position, first, second)`.
    pub fn full_pairs(&self) -> Vec<(usize, &P, &P)> {
        self.pairs
            .iter()
            .enumerate()
            .filter_map(|(i, pair)| pair.second.as_partner().map(|q| (i, &pair.first, q)))
            .collect()
    }

    pub fn full_pair_count(&self) -> usize {
        self.pairs.iter().filter(|pair| pair.is_full()).count()
    }

    /// Position of the (first) left-out pair, if any.
    pub fn left_out_index(&self) -> Option<usize> {
        self.pairs.iter().position(|pair| pair.second.is_left_out())
    }

    /// The participant left out this round, if any.
    pub fn left_out(&self) -> Option<&P> {
        self.left_out_index().map(|i| &self.pairs[i].first)
    }

    /// Checks the structural invariants.
    ///
    /// - no participant appears twice (including paired with itself)
    /// - at most one left-out pair
    ///
    /// Parity follows from these: full pairs contribute two participants
    /// each, so an odd count always has exactly one left-out.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.pairs.len() * 2);
        for id in self.participants() {
            if !seen.insert(id) {
                return Err(PairingError::MalformedConfiguration(format!(
                    "participant {id:?} appears more than once"
                )));
            }
        }

        let left_out = self
            .pairs
            .iter()
            .filter(|pair| pair.second.is_left_out())
            .count();
        if left_out > 1 {
            return Err(PairingError::MalformedConfiguration(format!(
                "{left_out} participants left out, at most one allowed"
            )));
        }

        Ok(())
    }
}

impl<P> Default for Configuration<P> {
    fn default() -> Self {
        Self { pairs: Vec::new() }
    }
}

impl<P: ParticipantId> FromIterator<Pair<P>> for Configuration<P> {
    fn from_iter<I: IntoIterator<Item = Pair<P>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn malformed(cfg: &Configuration<u32>) -> bool {
        matches!(
            cfg.validate(),
            Err(PairingError::MalformedConfiguration(_))
        )
    }

    #[test]
    fn test_valid_even_configuration() {
        let cfg = Configuration::from_tuples([(1, Some(2)), (3, Some(4))]);
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.left_out(), None);
        assert_eq!(cfg.participant_count(), 4);
        assert_eq!(cfg.full_pair_indices(), vec![0, 1]);
    }

    #[test]
    fn test_valid_odd_configuration() {
        let cfg = Configuration::from_tuples([(1, Some(2)), (5, None), (3, Some(4))]);
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.left_out(), Some(&5));
        assert_eq!(cfg.left_out_index(), Some(1));
        assert_eq!(cfg.full_pair_count(), 2);
        assert_eq!(cfg.full_pairs(), vec![(0, &1, &2), (2, &3, &4)]);
    }

    #[test]
    fn test_empty_configuration_is_valid() {
        let cfg: Configuration<u32> = Configuration::default();
        assert!(cfg.validate().is_ok());
        assert!(cfg.is_empty());
    }

    #[test]
    fn test_duplicate_participant_rejected() {
        let cfg = Configuration::from_tuples([(1, Some(2)), (2, Some(3)), (4, Some(5))]);
        assert!(malformed(&cfg));
    }

    #[test]
    fn test_self_pair_rejected() {
        let cfg = Configuration::from_tuples([(1, Some(1))]);
        assert!(malformed(&cfg));
    }

    #[test]
    fn test_two_left_out_rejected() {
        let cfg = Configuration::from_tuples([(1, None), (2, None), (3, None)]);
        assert!(malformed(&cfg));
    }

    #[test]
    fn test_parity_follows_left_out() {
        let odd = Configuration::from_tuples([(1, Some(2)), (3, Some(4)), (5, Some(6)), (7, None)]);
        assert!(odd.validate().is_ok());
        assert_eq!(odd.participant_count() % 2, 1);

        let even = Configuration::from_tuples([(1, Some(2)), (3, Some(4))]);
        assert_eq!(even.participant_count() % 2, 0);
        assert!(even.left_out().is_none());
    }

    #[test]
    fn test_string_ids() {
        let cfg = Configuration::try_new(vec![
            Pair::full("ana".to_string(), "bo".to_string()),
            Pair::left_out("cy".to_string()),
        ])
        .unwrap();
        let names: Vec<&str> = cfg.participants().map(String::as_str).collect();
        assert_eq!(names, vec!["ana", "bo", "cy"]);
    }
}
