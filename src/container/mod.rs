//! Graphs of molecules and reactions.
//!
//! [`Container`] is generic over the number of states each atom and bond carries:
//! [`MoleculeContainer`] has one, [`CgrContainer`] has a reagent and a product state. Operations
//! that only make sense on reactions are only implemented for `CgrContainer`.

use crate::atom_info::{fitting_valence, valence_rules, FREE_CHARGE};
use crate::core::*;
use crate::error::DataError;
use itertools::Itertools;
use petgraph::graphmap::UnGraphMap;
use std::cell::OnceCell;
use std::collections::BTreeMap;
use tracing::*;

mod algebra;
mod cgr;
mod hydrogens;
mod query;
pub mod records;
mod stereo;

/// Free-form metadata, every key can have several values
pub type Meta = BTreeMap<String, Vec<String>>;

/// Whether adding a bond checks the valence of its atoms
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ValenceCheck {
    #[default]
    Strict,
    /// Used for intermediate structures that are temporarily invalid
    Ignore,
}

/// A molecule or reaction graph, with atoms keyed by their map numbers
#[derive(Debug, Clone)]
pub struct Container<const N: usize> {
    atoms: BTreeMap<AtomId, Atom<N>>,
    graph: UnGraphMap<AtomId, Bond<N>>,
    meta: Meta,
    marks: OnceCell<BTreeMap<AtomId, QueryMarks<N>>>,
}

/// A single-state molecule
pub type MoleculeContainer = Container<1>;
/// A condensed graph of reaction, with reagent and product states
pub type CgrContainer = Container<2>;

impl<const N: usize> Default for Container<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Container<N> {
    pub fn new() -> Self {
        Self {
            atoms: BTreeMap::new(),
            graph: UnGraphMap::new(),
            meta: Meta::new(),
            marks: OnceCell::new(),
        }
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }
    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
    pub fn contains(&self, id: AtomId) -> bool {
        self.atoms.contains_key(&id)
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom<N>> {
        self.atoms.get(&id)
    }
    /// Mutable access to an atom. This invalidates the cached query marks.
    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom<N>> {
        self.flush_cache();
        self.atoms.get_mut(&id)
    }
    /// Iterate over the atoms in ascending map order.
    pub fn atoms(&self) -> impl Iterator<Item = (AtomId, &Atom<N>)> + '_ {
        self.atoms.iter().map(|(&id, a)| (id, a))
    }
    pub fn atom_ids(&self) -> impl Iterator<Item = AtomId> + '_ {
        self.atoms.keys().copied()
    }

    pub fn bond(&self, a: AtomId, b: AtomId) -> Option<&Bond<N>> {
        self.graph.edge_weight(a, b)
    }
    /// Mutable access to a bond. This invalidates the cached query marks.
    pub fn bond_mut(&mut self, a: AtomId, b: AtomId) -> Option<&mut Bond<N>> {
        self.flush_cache();
        self.graph.edge_weight_mut(a, b)
    }
    pub fn has_bond(&self, a: AtomId, b: AtomId) -> bool {
        self.graph.contains_edge(a, b)
    }
    /// Iterate over the bonds as `(low, high, bond)`, sorted.
    pub fn bonds(&self) -> impl Iterator<Item = (AtomId, AtomId, &Bond<N>)> + '_ {
        self.atoms.keys().flat_map(move |&a| {
            self.graph
                .edges(a)
                .filter(move |&(_, b, _)| a < b)
                .sorted_by_key(|&(_, b, _)| b)
        })
    }
    /// The bonds of one atom, sorted by neighbor.
    pub fn bonds_of(&self, id: AtomId) -> impl Iterator<Item = (AtomId, &Bond<N>)> + '_ {
        self.graph
            .edges(id)
            .map(|(_, n, b)| (n, b))
            .sorted_by_key(|&(n, _)| n)
    }
    pub fn neighbors(&self, id: AtomId) -> impl Iterator<Item = AtomId> + '_ {
        self.graph.neighbors(id).sorted()
    }
    /// The underlying connectivity, for graph algorithms.
    pub fn graph(&self) -> &UnGraphMap<AtomId, Bond<N>> {
        &self.graph
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }
    pub fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }

    /// Drop derived data. Called by every mutation.
    pub fn flush_cache(&mut self) {
        self.marks.take();
    }

    /// Add an atom, returning its map number.
    ///
    /// If `id` is `None`, the atom gets the number after the current maximum.
    #[instrument(level = "trace", skip(self, atom))]
    pub fn add_atom(&mut self, atom: Atom<N>, id: Option<AtomId>) -> Result<AtomId, DataError> {
        let id = match id {
            Some(0) => return Err(DataError::NonPositiveMap),
            Some(id) if self.atoms.contains_key(&id) => return Err(DataError::MapConflict(id)),
            Some(id) => id,
            None => self
                .atoms
                .keys()
                .next_back()
                .map_or(Some(1), |&m| m.checked_add(1))
                .ok_or(DataError::IdOverflow)?,
        };
        validate_atom(&atom)?;
        self.insert_atom(id, atom);
        Ok(id)
    }

    /// Add a bond, checking the valence of both atoms.
    pub fn add_bond(&mut self, a: AtomId, b: AtomId, bond: Bond<N>) -> Result<(), DataError> {
        self.add_bond_with(a, b, bond, ValenceCheck::Strict)
    }

    #[instrument(level = "trace", skip(self, bond))]
    pub fn add_bond_with(
        &mut self,
        a: AtomId,
        b: AtomId,
        bond: Bond<N>,
        check: ValenceCheck,
    ) -> Result<(), DataError> {
        if a == b {
            return Err(DataError::SelfLoop(a));
        }
        for id in [a, b] {
            if !self.atoms.contains_key(&id) {
                return Err(DataError::AtomNotFound(id));
            }
        }
        if self.graph.contains_edge(a, b) {
            return Err(DataError::DuplicateBond(a, b));
        }
        for state in &bond.states {
            let invalid = match &state.order {
                Attr::Any => None,
                Attr::Fixed(o) => (!o.is_valid()).then_some(*o),
                Attr::OneOf(os) => os.iter().copied().find(|o| !o.is_valid()),
                Attr::Conditional(map) => map.values().copied().find(|o| !o.is_valid()),
            };
            if let Some(order) = invalid {
                return Err(DataError::InvalidBondOrder(order));
            }
        }
        if bond.is_empty() {
            return Err(DataError::EmptyBond(a, b));
        }
        if check == ValenceCheck::Strict {
            for side in 0..N {
                let Some(order) = bond.order(side).filter(|o| o.is_present()) else {
                    continue;
                };
                self.check_bonding(a, side, order)?;
                self.check_bonding(b, side, order)?;
            }
        }
        self.set_bond(a, b, bond);
        Ok(())
    }

    pub fn remove_atom(&mut self, id: AtomId) -> Result<Atom<N>, DataError> {
        let atom = self.atoms.remove(&id).ok_or(DataError::AtomNotFound(id))?;
        self.graph.remove_node(id);
        self.flush_cache();
        Ok(atom)
    }

    pub fn remove_bond(&mut self, a: AtomId, b: AtomId) -> Result<Bond<N>, DataError> {
        let bond = self
            .graph
            .remove_edge(a, b)
            .ok_or(DataError::BondNotFound(a, b))?;
        self.flush_cache();
        Ok(bond)
    }

    /// Insert or replace an atom without validation.
    pub(crate) fn insert_atom(&mut self, id: AtomId, atom: Atom<N>) {
        trace!(id, "inserting atom");
        self.graph.add_node(id);
        self.atoms.insert(id, atom);
        self.flush_cache();
    }

    /// Insert or replace a bond between existing atoms without validation.
    pub(crate) fn set_bond(&mut self, a: AtomId, b: AtomId, bond: Bond<N>) {
        debug_assert!(self.atoms.contains_key(&a) && self.atoms.contains_key(&b));
        self.graph.add_edge(a, b, bond);
        self.flush_cache();
    }

    /// Sum of fixed bond orders on one side, in half-bond units, ignoring some neighbors.
    fn half_units(&self, id: AtomId, side: usize, skip: &[AtomId]) -> u16 {
        self.graph
            .edges(id)
            .filter(|(_, n, _)| !skip.contains(n))
            .filter_map(|(_, _, b)| b.order(side))
            .map(|o| o.half_units() as u16)
            .sum()
    }

    /// Bonding positions used on one side: bonds plus radical electrons. Aromatic bonds count as
    /// one and a half, rounded down over the atom, so ring fusion atoms fit.
    fn used_valence(&self, id: AtomId, side: usize, skip: &[AtomId], extra: u16) -> u8 {
        let radical = self
            .atoms
            .get(&id)
            .map_or(0, |a| a.states[side].radical().electrons() as u16);
        let used = (self.half_units(id, side, skip) + extra) / 2 + radical;
        u8::try_from(used).unwrap_or(u8::MAX)
    }

    fn check_bonding(&self, id: AtomId, side: usize, order: BondOrder) -> Result<(), DataError> {
        let atom = self.atoms.get(&id).ok_or(DataError::AtomNotFound(id))?;
        let (Some(element), Some(&charge)) = (atom.element(), atom.states[side].charge.fixed())
        else {
            return Ok(());
        };
        let used = self.used_valence(id, side, &[], order.half_units() as u16);
        if fitting_valence(element.protons(), charge, used) == Some(None) {
            debug!(id, side, used, "valence exceeded");
            return Err(DataError::Valence(id));
        }
        Ok(())
    }
}

/// Check a charge and radical against the valence table.
pub fn check_charge_radical(element: Element, charge: i8, radical: Radical) -> bool {
    match valence_rules(element.protons()) {
        Some(rules) => rules
            .iter()
            .filter(|r| r.charge == charge)
            .any(|r| r.valences.iter().any(|&v| v >= radical.electrons())),
        None => FREE_CHARGE.contains(&charge),
    }
}

fn validate_atom<const N: usize>(atom: &Atom<N>) -> Result<(), DataError> {
    for state in &atom.states {
        let radicals: &[Radical] = match &state.radical {
            Attr::Fixed(r) => std::slice::from_ref(r),
            Attr::OneOf(rs) => rs,
            _ => &[],
        };
        if let Some(&r) = radicals.iter().find(|r| !r.is_valid()) {
            return Err(DataError::InvalidRadical(r));
        }
        if let (Some(element), Some(&charge)) = (atom.element(), state.charge.fixed()) {
            let radical = state.radical();
            if !check_charge_radical(element, charge, radical) {
                return Err(DataError::ImpossibleChargeRadical {
                    element,
                    charge,
                    radical,
                });
            }
        }
    }
    Ok(())
}
