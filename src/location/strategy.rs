//! Per-volume server selection
//!
//! A strategy is derived once from the location set seen at lookup time and
//! then replayed on every cache hit.

use crate::location::LocationSet;
use rand::Rng;

/// How to pick a server for a cached volume
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionStrategy {
    /// Single replica, always returned
    #[non_exhaustive]
    Fixed(String),
    /// Two or more replicas, one picked uniformly at random per call
    #[non_exhaustive]
    RandomUniform(Vec<String>),
}

impl SelectionStrategy {
    /// Derive the strategy for a lookup result. `None` if the set is empty.
    pub fn from_locations(mut locations: LocationSet) -> Option<Self> {
        match locations.len() {
            0 => None,
            1 => locations.pop().map(SelectionStrategy::Fixed),
            _ => Some(SelectionStrategy::RandomUniform(locations)),
        }
    }

    /// Pick a server using the thread-local RNG
    pub fn pick(&self) -> &str {
        self.pick_with(&mut rand::thread_rng())
    }

    /// Pick a server using the given RNG
    pub fn pick_with<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        match self {
            SelectionStrategy::Fixed(address) => address,
            SelectionStrategy::RandomUniform(addresses) => {
                &addresses[rng.gen_range(0..addresses.len())]
            }
        }
    }

    /// Every candidate this strategy can return
    pub fn addresses(&self) -> &[String] {
        match self {
            SelectionStrategy::Fixed(address) => std::slice::from_ref(address),
            SelectionStrategy::RandomUniform(addresses) => addresses,
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, SelectionStrategy::Fixed(..))
    }
}
