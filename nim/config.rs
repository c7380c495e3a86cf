//! Round setup parameters

use crate::error::Error;
use std::{ops::RangeInclusive, time::Duration};

/// Parameters of a new round and of the computer opponent pacing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundConfig {
    /// Number of heaps on a fresh board
    pub heap_count: RangeInclusive<u32>,

    /// Number of tokens in each heap of a fresh board
    pub heap_size: RangeInclusive<u32>,

    /// Pause between the player's move and the computer's reply
    pub computer_delay: Duration,
}

impl RoundConfig {
    /// Default bounds for heap count and heap size
    pub const DEFAULT_RANGE: RangeInclusive<u32> = 2..=5;

    /// Default pause before the computer replies
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

    /// Check that both ranges are non-empty and never produce empty heaps or boards
    pub fn validate(&self) -> Result<(), Error> {
        for (what, range) in [("heap count", &self.heap_count), ("heap size", &self.heap_size)] {
            if range.is_empty() || *range.start() == 0 {
                return Err(Error::InvalidRange {
                    what,
                    start: *range.start(),
                    end: *range.end(),
                });
            }
        }
        Ok(())
    }

    /// Largest board this configuration can generate, as `(heaps, tokens per heap)`
    pub fn max_dimensions(&self) -> (u32, u32) {
        (*self.heap_count.end(), *self.heap_size.end())
    }
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            heap_count: Self::DEFAULT_RANGE,
            heap_size: Self::DEFAULT_RANGE,
            computer_delay: Self::DEFAULT_DELAY,
        }
    }
}
