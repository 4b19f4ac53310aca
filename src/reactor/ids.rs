use super::Mapping;
use crate::container::Container;
use crate::core::AtomId;
use crate::error::DataError;
use std::collections::BTreeSet;

/// Hands out the lowest positive atom numbers that aren't taken yet
#[derive(Debug, Clone)]
pub struct IdAllocator {
    taken: BTreeSet<AtomId>,
    next: AtomId,
}
impl IdAllocator {
    pub fn new(taken: impl IntoIterator<Item = AtomId>) -> Self {
        Self {
            taken: taken.into_iter().collect(),
            next: 1,
        }
    }
    /// Mark a number as used.
    pub fn reserve(&mut self, id: AtomId) {
        self.taken.insert(id);
    }
}
impl Iterator for IdAllocator {
    type Item = AtomId;

    fn next(&mut self) -> Option<AtomId> {
        loop {
            let id = self.next;
            self.next = self.next.checked_add(1)?;
            if self.taken.insert(id) {
                return Some(id);
            }
        }
    }
}

/// Renumber a fragment for inclusion into `target`.
///
/// Atoms in `mapping` go where it says, every other atom gets a fresh number unused by `target`
/// and by the mapping. Returns the fragment and the full mapping.
pub fn remap_into<const N: usize, const M: usize>(
    group: &Container<N>,
    target: &Container<M>,
    mapping: &Mapping,
) -> Result<(Container<N>, Mapping), DataError> {
    let mut full = mapping.clone();
    let mut fresh = IdAllocator::new(target.atom_ids().chain(mapping.values().copied()));
    for id in group.atom_ids() {
        if full.contains_key(&id) {
            continue;
        }
        let new = fresh.next().ok_or(DataError::IdOverflow)?;
        full.insert(id, new);
    }
    let remapped = group.remap(&full)?;
    Ok((remapped, full))
}
