use super::*;
use crate::graph::algo::connect::components;
use std::collections::BTreeSet;

impl<const N: usize> Container<N> {
    /// Renumber atoms. Atoms missing from `mapping` keep their number.
    pub fn remap(&self, mapping: &BTreeMap<AtomId, AtomId>) -> Result<Self, DataError> {
        let target = |id: AtomId| mapping.get(&id).copied().unwrap_or(id);
        let mut out = Self::new();
        for (&id, atom) in &self.atoms {
            let new = target(id);
            if new == 0 {
                return Err(DataError::NonPositiveMap);
            }
            if out.atoms.contains_key(&new) {
                return Err(DataError::MapConflict(new));
            }
            out.insert_atom(new, atom.clone());
        }
        for (a, b, bond) in self.graph.all_edges() {
            out.set_bond(target(a), target(b), bond.clone());
        }
        out.meta = self.meta.clone();
        Ok(out)
    }

    /// Disjoint union. Fails if the graphs share an atom number.
    pub fn union(&self, other: &Self) -> Result<Self, DataError> {
        if let Some(&id) = self.atoms.keys().find(|id| other.atoms.contains_key(id)) {
            return Err(DataError::MapConflict(id));
        }
        Ok(self.compose(other))
    }

    /// Overlay `other` on this graph. Atoms and bonds present in both take `other`'s attributes.
    pub fn compose(&self, other: &Self) -> Self {
        let mut out = self.clone();
        for (&id, atom) in &other.atoms {
            out.insert_atom(id, atom.clone());
        }
        for (a, b, bond) in other.graph.all_edges() {
            out.set_bond(a, b, bond.clone());
        }
        for (k, v) in &other.meta {
            out.meta.entry(k.clone()).or_insert_with(|| v.clone());
        }
        out
    }

    /// The subgraph induced by some atoms.
    pub fn substructure(&self, ids: impl IntoIterator<Item = AtomId>) -> Result<Self, DataError> {
        let mut out = Self::new();
        for id in ids {
            let atom = self.atoms.get(&id).ok_or(DataError::AtomNotFound(id))?;
            out.insert_atom(id, atom.clone());
        }
        for (a, b, bond) in self.graph.all_edges() {
            if out.atoms.contains_key(&a) && out.atoms.contains_key(&b) {
                out.set_bond(a, b, bond.clone());
            }
        }
        out.meta = self.meta.clone();
        Ok(out)
    }

    /// The atom sets of the connected components, ordered by their lowest atom.
    pub fn components(&self) -> Vec<BTreeSet<AtomId>> {
        components(&self.graph)
    }

    /// Split into connected components.
    pub fn split(&self) -> Vec<Self> {
        self.components()
            .into_iter()
            .filter_map(|c| self.substructure(c).ok())
            .collect()
    }

    /// Check whether two atoms are in the same component.
    pub fn connected(&self, a: AtomId, b: AtomId) -> bool {
        self.atoms.contains_key(&a)
            && self.atoms.contains_key(&b)
            && petgraph::algo::has_path_connecting(&self.graph, a, b, None)
    }
}
