//! Nimber is a number that represents a Nim heap of a given size.

use auto_ops::impl_op_ex;
use std::{fmt::Display, iter::Sum};

/// Number that represents a Nim heap of given size.
///
/// Addition is overloaded to Nim sum.
#[repr(transparent)]
#[derive(Debug, Default, Hash, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Nimber(u32);

impl Nimber {
    /// Value of an empty position
    pub const ZERO: Nimber = Nimber(0);

    /// Construct new nimber
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the underlying nimber value
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Check if position of this value is lost for the player to move
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Compute the minimum excluded value from a vector of nimbers.
    /// See <https://en.wikipedia.org/wiki/Mex_(mathematics)>
    pub fn mex(mut nimbers: Vec<Self>) -> Self {
        nimbers.sort_unstable();
        let mut current = 0;
        for n in nimbers {
            match current.cmp(&n.0) {
                std::cmp::Ordering::Less => return Self(current),
                std::cmp::Ordering::Equal => current += 1,
                std::cmp::Ordering::Greater => {}
            }
        }
        Self(current)
    }
}

impl From<u32> for Nimber {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Nimber> for u32 {
    fn from(value: Nimber) -> Self {
        value.0
    }
}

// xor is correct, that's how nimbers additon works
impl_op_ex!(+|lhs: &Nimber, rhs: &Nimber| -> Nimber { Nimber(lhs.0 ^ rhs.0) });
impl_op_ex!(+=|lhs: &mut Nimber, rhs: &Nimber| { lhs.0 ^= rhs.0 });

// Subtraction is the same as addition
impl_op_ex!(-|lhs: &Nimber, rhs: &Nimber| -> Nimber { Nimber(lhs.0 ^ rhs.0) });

impl Sum for Nimber {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nimber::ZERO, |acc, n| acc + n)
    }
}

impl<'a> Sum<&'a Nimber> for Nimber {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Display for Nimber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 == 0 {
            write!(f, "0")
        } else if self.0 == 1 {
            write!(f, "*")
        } else {
            write!(f, "*{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mex_works() {
        assert_eq!(
            Nimber(3),
            Nimber::mex(vec![Nimber(0), Nimber(0), Nimber(2), Nimber(5), Nimber(1)])
        );
        assert_eq!(Nimber(2), Nimber::mex(vec![Nimber(0), Nimber(1), Nimber(1)]));
        assert_eq!(Nimber(0), Nimber::mex(vec![Nimber(1), Nimber(2)]));
        assert_eq!(Nimber(0), Nimber::mex(vec![]));
    }

    #[test]
    fn nim_sum_is_xor() {
        assert_eq!(Nimber(3) + Nimber(4), Nimber(7));
        assert_eq!(Nimber(2) + Nimber(2), Nimber::ZERO);
        assert_eq!(Nimber(5) - Nimber(1), Nimber(4));

        let total: Nimber = [1, 2, 3].into_iter().map(Nimber::new).sum();
        assert!(total.is_zero());
    }

    #[test]
    fn display() {
        assert_eq!(Nimber(0).to_string(), "0");
        assert_eq!(Nimber(1).to_string(), "*");
        assert_eq!(Nimber(7).to_string(), "*7");
    }
}
