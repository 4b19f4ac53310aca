use super::*;
use std::collections::BTreeSet;

impl<const N: usize> Container<N> {
    /// Implicit hydrogens on one side, not counting bonds to the neighbors in `skip`.
    pub(crate) fn implicit_on_side(&self, id: AtomId, side: usize, skip: &[AtomId]) -> u8 {
        let Some(atom) = self.atoms.get(&id) else {
            return 0;
        };
        let (Some(element), Some(&charge)) = (atom.element(), atom.states[side].charge.fixed())
        else {
            return 0;
        };
        let used = self.used_valence(id, side, skip, 0);
        match fitting_valence(element.protons(), charge, used) {
            Some(Some(valence)) => valence - used,
            _ => 0,
        }
    }

    /// The number of implicit hydrogens on each side of an atom.
    ///
    /// This is the gap between the smallest allowed valence that fits the explicit bonds and
    /// the bonds themselves. Elements outside the valence table never get implicit hydrogens.
    pub fn implicit_hydrogens(&self, id: AtomId) -> Result<[u8; N], DataError> {
        if !self.atoms.contains_key(&id) {
            return Err(DataError::AtomNotFound(id));
        }
        Ok(std::array::from_fn(|side| {
            self.implicit_on_side(id, side, &[])
        }))
    }

    /// Turn every implicit hydrogen into an explicit atom. Returns the number of atoms added.
    ///
    /// A hydrogen that only exists on some sides gets a bond that is absent on the others.
    #[instrument(level = "debug", skip_all)]
    pub fn explicify_hydrogens(&mut self) -> Result<usize, DataError> {
        let mut pending = Vec::new();
        for (&id, atom) in &self.atoms {
            if atom.is_hydrogen() {
                continue;
            }
            let counts = self.implicit_hydrogens(id)?;
            let most = counts.iter().copied().max().unwrap_or(0);
            for k in 0..most {
                let orders: [BondOrder; N] = std::array::from_fn(|side| {
                    if k < counts[side] {
                        BondOrder::Single
                    } else {
                        BondOrder::Absent
                    }
                });
                pending.push((id, orders));
            }
        }
        let added = pending.len();
        for (id, orders) in pending {
            let mut hydrogen = Atom::new(Element::H);
            if let Some(atom) = self.atoms.get(&id) {
                for (h, s) in hydrogen.states.iter_mut().zip(&atom.states) {
                    h.xyz = s.xyz;
                }
            }
            let h = self.add_atom(hydrogen, None)?;
            let bond = Bond {
                states: orders.map(BondState::concrete),
            };
            self.add_bond_with(id, h, bond, ValenceCheck::Ignore)?;
        }
        debug!(added, "explicified hydrogens");
        Ok(added)
    }

    /// Remove explicit hydrogens that can be restored implicitly. Returns the number removed.
    ///
    /// Hydrogens bonded to other hydrogens are kept, as are the hydrogens of an atom whose
    /// valence model wouldn't give back as many implicit hydrogens on some side.
    #[instrument(level = "debug", skip_all)]
    pub fn implicify_hydrogens(&mut self) -> usize {
        let mut explicit = BTreeMap::<AtomId, Vec<AtomId>>::new();
        let mut keep = BTreeSet::new();
        for (&h, atom) in &self.atoms {
            if !atom.is_hydrogen() {
                continue;
            }
            for n in self.graph.neighbors(h) {
                if self.atoms.get(&n).is_some_and(Atom::is_hydrogen) {
                    keep.insert(h);
                    keep.insert(n);
                } else {
                    explicit.entry(n).or_default().push(h);
                }
            }
        }
        let mut remove = BTreeSet::new();
        for (n, hs) in explicit {
            let restorable = (0..N).all(|side| {
                let bonded = hs
                    .iter()
                    .filter(|&&h| {
                        self.bond(n, h)
                            .and_then(|b| b.order(side))
                            .is_some_and(BondOrder::is_present)
                    })
                    .count();
                self.implicit_on_side(n, side, &hs) as usize >= bonded
            });
            if restorable {
                remove.extend(hs);
            } else {
                trace!(atom = n, "hydrogens aren't restorable");
                keep.extend(hs);
            }
        }
        let mut removed = 0;
        for h in remove.difference(&keep) {
            if self.remove_atom(*h).is_ok() {
                removed += 1;
            }
        }
        debug!(removed, "implicified hydrogens");
        removed
    }
}
