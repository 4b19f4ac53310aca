//! Graph utilities.

pub mod algo;

use crate::container::Container;
use crate::core::AtomId;

pub use algo::*;

impl<const N: usize> Container<N> {
    /// The smallest set of smallest rings, as atom cycles.
    pub fn sssr(&self) -> Vec<Vec<AtomId>> {
        find_sssr(self.graph())
    }

    /// Lazily find rings, smallest first.
    pub fn rings(&self) -> RingsIterator<AtomId> {
        RingsIterator::new(self.graph())
    }

    /// The number of independent rings.
    pub fn ring_count(&self) -> usize {
        sssr::ring_count(self.graph())
    }
}
