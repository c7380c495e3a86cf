//! Uniform random choices used for board generation and the fallback move

use rand::Rng;
use std::ops::RangeInclusive;

/// Random integer from an inclusive range, every value equally likely.
///
/// # Panics
///
/// Panics if the range is empty.
#[inline]
pub fn random_int<R>(rng: &mut R, range: RangeInclusive<u32>) -> u32
where
    R: Rng + ?Sized,
{
    assert!(!range.is_empty(), "empty range {range:?}");
    rng.random_range(range)
}

/// Random index into a collection of `len` elements.
///
/// Returns [`None`] for empty collections.
#[inline]
pub fn random_index<R>(rng: &mut R, len: usize) -> Option<usize>
where
    R: Rng + ?Sized,
{
    (len > 0).then(|| rng.random_range(0..len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn random_int_covers_whole_range() {
        let mut rng = StdRng::seed_from_u64(0xdead_beef);
        let mut seen = [false; 4];
        for _ in 0..1000 {
            let n = random_int(&mut rng, 2..=5);
            assert!((2..=5).contains(&n));
            seen[(n - 2) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn single_value_range() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(random_int(&mut rng, 3..=3), 3);
    }

    #[test]
    fn random_index_bounds() {
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(random_index(&mut rng, 0), None);
        assert_eq!(random_index(&mut rng, 1), Some(0));
        for _ in 0..100 {
            assert!(random_index(&mut rng, 5).is_some_and(|i| i < 5));
        }
    }
}
