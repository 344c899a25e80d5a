//! Local moves over pairing configurations.
//!
//! Both moves touch exactly two entries of the configuration and keep every
//! structural invariant: the participant set, the number of full pairs and
//! the number of left-out entries are all preserved.
//!
//! Randomness always comes from the caller's generator. Feeding both moves
//! from the same seeded generator reproduces the same sequence of
//! proposals.

use crate::error::{PairingError, Result};
use crate::types::{Configuration, Pair, ParticipantId};
use rand::Rng;

/// Recombines two distinct full pairs chosen uniformly at random.
///
/// `(a, b)` and `(c, d)` become `(a, c)` and `(b, d)`, written back at the
/// positions of the original pairs.
///
/// Fails with [`PairingError::InsufficientPairs`] if fewer than two full
/// pairs exist.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_pairing::Configuration;
/// use u_pairing::mutate::pair_swap;
///
/// let cfg = Configuration::from_tuples([(1, Some(2)), (3, Some(4))]);
/// let mut rng = StdRng::seed_from_u64(7);
/// let next = pair_swap(&cfg, &mut rng).unwrap();
/// assert_ne!(next, cfg);
/// assert!(next.validate().is_ok());
/// ```
pub fn pair_swap<P, R>(
    configuration: &Configuration<P>,
    rng: &mut R,
) -> Result<Configuration<P>>
where
    P: ParticipantId,
    R: Rng,
{
    configuration.validate()?;
    let full = configuration.full_pairs();
    if full.len() < 2 {
        return Err(PairingError::InsufficientPairs { found: full.len() });
    }

    let i = rng.random_range(0..full.len());
    let mut j = rng.random_range(0..full.len() - 1);
    if j >= i {
        j += 1;
    }
    let (pos_ab, a, b) = full[i];
    let (pos_cd, c, d) = full[j];

    let mut pairs = configuration.pairs().to_vec();
    pairs[pos_ab] = Pair::full(a.clone(), c.clone());
    pairs[pos_cd] = Pair::full(b.clone(), d.clone());
    Ok(Configuration::new(pairs))
}

/// Swaps the left-out participant with one member of a random full pair.
///
/// The full pair and the member are both chosen uniformly. The displaced
/// member becomes the new left-out participant and the old one takes their
/// place in the pair.
///
/// Returns the input unchanged if nobody is left out or there is no full
/// pair to swap with.
pub fn left_out_swap<P, R>(
    configuration: &Configuration<P>,
    rng: &mut R,
) -> Result<Configuration<P>>
where
    P: ParticipantId,
    R: Rng,
{
    configuration.validate()?;
    let Some(left_out_pos) = configuration.left_out_index() else {
        return Ok(configuration.clone());
    };
    let full = configuration.full_pairs();
    if full.is_empty() {
        return Ok(configuration.clone());
    }

    let (pos, a, b) = full[rng.random_range(0..full.len())];
    let swap_first = rng.random_bool(0.5);

    let mut pairs = configuration.pairs().to_vec();
    let outsider = pairs[left_out_pos].first.clone();
    let (kept_pair, displaced) = if swap_first {
        (Pair::full(outsider, b.clone()), a.clone())
    } else {
        (Pair::full(a.clone(), outsider), b.clone())
    };
    pairs[pos] = kept_pair;
    pairs[left_out_pos] = Pair::left_out(displaced);
    Ok(Configuration::new(pairs))
}

/// One annealing proposal: a pair swap followed by a left-out swap.
///
/// The pair swap is skipped when fewer than two full pairs exist, so pools
/// of two or three participants can still be searched (a pool of three only
/// moves through left-out swaps).
pub fn propose_neighbor<P, R>(
    configuration: &Configuration<P>,
    rng: &mut R,
) -> Result<Configuration<P>>
where
    P: ParticipantId,
    R: Rng,
{
    let swapped = if configuration.full_pair_count() >= 2 {
        pair_swap(configuration, rng)?
    } else {
        configuration.clone()
    };
    left_out_swap(&swapped, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    fn sorted_ids(cfg: &Configuration<i32>) -> Vec<i32> {
        let mut ids: Vec<i32> = cfg.participants().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn changed_positions(a: &Configuration<i32>, b: &Configuration<i32>) -> usize {
        a.pairs()
            .iter()
            .zip(b.pairs())
            .filter(|(x, y)| x != y)
            .count()
    }

    fn unordered(cfg: &Configuration<i32>) -> BTreeSet<(i32, Option<i32>)> {
        cfg.pairs()
            .iter()
            .map(|p| match p.second.as_partner() {
                Some(&q) => (p.first.min(q), Some(p.first.max(q))),
                None => (p.first, None),
            })
            .collect()
    }

    #[test]
    fn test_pair_swap_recombines_first_with_first() {
        let cfg = Configuration::from_tuples([(1, Some(2)), (3, Some(4))]);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let next = pair_swap(&cfg, &mut rng).unwrap();
            let expected: BTreeSet<_> = [(1, Some(3)), (2, Some(4))].into_iter().collect();
            assert_eq!(unordered(&next), expected, "seed {seed}");
        }
    }

    #[test]
    fn test_pair_swap_is_local_and_valid() {
        let cfg = Configuration::from_tuples([
            (1, Some(2)),
            (3, Some(4)),
            (5, Some(6)),
            (7, None),
            (8, Some(9)),
        ]);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let next = pair_swap(&cfg, &mut rng).unwrap();
            assert!(next.validate().is_ok());
            assert_eq!(changed_positions(&cfg, &next), 2);
            assert_eq!(sorted_ids(&next), sorted_ids(&cfg));
            assert_eq!(next.left_out(), Some(&7));
        }
    }

    #[test]
    fn test_pair_swap_insufficient_pairs() {
        let mut rng = StdRng::seed_from_u64(1);
        let one = Configuration::from_tuples([(1, Some(2)), (3, None)]);
        assert_eq!(
            pair_swap(&one, &mut rng),
            Err(PairingError::InsufficientPairs { found: 1 })
        );
        let none: Configuration<i32> = Configuration::from_tuples([(1, None)]);
        assert_eq!(
            pair_swap(&none, &mut rng),
            Err(PairingError::InsufficientPairs { found: 0 })
        );
    }

    #[test]
    fn test_left_out_swap_moves_outsider_in() {
        let cfg = Configuration::from_tuples([(1, Some(2)), (3, Some(4)), (5, None)]);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let next = left_out_swap(&cfg, &mut rng).unwrap();
            assert!(next.validate().is_ok());
            assert_eq!(changed_positions(&cfg, &next), 2);
            assert_eq!(sorted_ids(&next), sorted_ids(&cfg));
            let left_out = *next.left_out().unwrap();
            assert_ne!(left_out, 5);
            assert_eq!(next.left_out_index(), Some(2));
        }
    }

    #[test]
    fn test_left_out_swap_reaches_every_member() {
        let cfg = Configuration::from_tuples([(1, Some(2)), (3, Some(4)), (5, None)]);
        let mut rng = StdRng::seed_from_u64(11);
        let seen: BTreeSet<i32> = (0..200)
            .map(|_| *left_out_swap(&cfg, &mut rng).unwrap().left_out().unwrap())
            .collect();
        assert_eq!(seen, [1, 2, 3, 4].into_iter().collect());
    }

    #[test]
    fn test_moves_with_left_out_entry_first() {
        let cfg = Configuration::from_tuples([(9, None), (1, Some(2)), (3, Some(4))]);
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..50 {
            let swapped = pair_swap(&cfg, &mut rng).unwrap();
            assert_eq!(swapped.pairs()[0], Pair::left_out(9));
            assert_eq!(swapped.full_pair_count(), 2);

            let rotated = left_out_swap(&cfg, &mut rng).unwrap();
            assert_eq!(rotated.left_out_index(), Some(0));
            assert_ne!(rotated.left_out(), Some(&9));
            assert_eq!(sorted_ids(&rotated), sorted_ids(&cfg));
        }
    }

    #[test]
    fn test_left_out_swap_noop_without_left_out() {
        let cfg = Configuration::from_tuples([(1, Some(2)), (3, Some(4))]);
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(left_out_swap(&cfg, &mut rng).unwrap(), cfg);
    }

    #[test]
    fn test_left_out_swap_noop_without_full_pair() {
        let cfg = Configuration::from_tuples([(1, None)]);
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(left_out_swap(&cfg, &mut rng).unwrap(), cfg);
    }

    #[test]
    fn test_moves_reject_malformed() {
        let cfg = Configuration::from_tuples([(1, Some(2)), (2, Some(3))]);
        let mut rng = StdRng::seed_from_u64(5);
        assert!(matches!(
            pair_swap(&cfg, &mut rng),
            Err(PairingError::MalformedConfiguration(_))
        ));
        assert!(matches!(
            left_out_swap(&cfg, &mut rng),
            Err(PairingError::MalformedConfiguration(_))
        ));
    }

    #[test]
    fn test_same_seed_same_moves() {
        let cfg = Configuration::from_tuples([
            (1, Some(2)),
            (3, Some(4)),
            (5, Some(6)),
            (7, Some(8)),
            (9, None),
        ]);
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut current = cfg.clone();
            let mut trail = Vec::new();
            for _ in 0..20 {
                current = propose_neighbor(&current, &mut rng).unwrap();
                trail.push(current.clone());
            }
            trail
        };
        assert_eq!(run(46), run(46));
        assert_ne!(run(46), run(47));
    }

    #[test]
    fn test_propose_small_pools() {
        let mut rng = StdRng::seed_from_u64(9);
        let two = Configuration::from_tuples([(1, Some(2))]);
        assert_eq!(propose_neighbor(&two, &mut rng).unwrap(), two);

        let three = Configuration::from_tuples([(1, Some(2)), (3, None)]);
        let next = propose_neighbor(&three, &mut rng).unwrap();
        assert_ne!(next.left_out(), Some(&3));
        assert!(next.validate().is_ok());
    }
}
