//! Flat atom and bond lists, as exchanged with file readers and writers.
//!
//! Molecules read the reagent fields and write them to both.

use super::*;
use crate::error::CgrError;

#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    /// Requested map number, or `None` to take the next free one
    pub map: Option<AtomId>,
    pub element: String,
    pub isotope: u16,
    /// Reagent and product charges
    pub charge: [i8; 2],
    pub radical: [Radical; 2],
    pub mark: String,
    pub xyz: Point3,
    /// Product coordinates, if they differ from the reagent ones
    pub p_xyz: Option<Point3>,
}
impl AtomRecord {
    pub fn new(element: impl Into<String>) -> Self {
        Self {
            map: None,
            element: element.into(),
            isotope: 0,
            charge: [0; 2],
            radical: [Radical::None; 2],
            mark: "0".to_string(),
            xyz: Point3::default(),
            p_xyz: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BondRecord {
    /// Positions of the atoms in the atom list. A wedge points away from the first one.
    pub atoms: (usize, usize),
    pub order: [BondOrder; 2],
    pub stereo: [Wedge; 2],
}
impl BondRecord {
    pub fn new(a: usize, b: usize, order: BondOrder) -> Self {
        Self {
            atoms: (a, b),
            order: [order; 2],
            stereo: [Wedge::None; 2],
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Records {
    pub atoms: Vec<AtomRecord>,
    pub bonds: Vec<BondRecord>,
    pub meta: Meta,
}

/// Which record field a state reads from
fn field(side: usize) -> usize {
    side.min(PRODUCT)
}

impl<const N: usize> Container<N> {
    /// Build a graph from records, validating everything as it's added.
    #[instrument(level = "debug", skip_all, fields(atoms = records.atoms.len()))]
    pub fn from_records(records: &Records) -> Result<Self, CgrError> {
        let mut out = Self::new();
        let mut ids = Vec::with_capacity(records.atoms.len());
        for rec in &records.atoms {
            let element = rec.element.parse::<Element>()?;
            let mut atom = Atom::<N>::new(element).with_isotope(rec.isotope);
            atom.mark.clone_from(&rec.mark);
            for (side, state) in atom.states.iter_mut().enumerate() {
                let f = field(side);
                state.charge = Attr::Fixed(rec.charge[f]);
                state.radical = Attr::Fixed(rec.radical[f]);
                state.xyz = Some(match rec.p_xyz {
                    Some(p) if f == PRODUCT => p,
                    _ => rec.xyz,
                });
            }
            ids.push(out.add_atom(atom, rec.map)?);
        }
        let id_at = |pos: usize| {
            ids.get(pos)
                .copied()
                .ok_or(DataError::AtomNotFound(AtomId::try_from(pos + 1).unwrap_or(AtomId::MAX)))
        };
        let mut wedged = Vec::new();
        for rec in &records.bonds {
            let (a, b) = (id_at(rec.atoms.0)?, id_at(rec.atoms.1)?);
            let bond = Bond {
                states: std::array::from_fn(|side| BondState::concrete(rec.order[field(side)])),
            };
            out.add_bond(a, b, bond)?;
            let wedges: [Wedge; N] = std::array::from_fn(|side| rec.stereo[field(side)]);
            if wedges.iter().any(|&w| w != Wedge::None) {
                wedged.push((a, b, wedges));
            }
        }
        for (a, b, wedges) in wedged {
            out.add_stereo(a, b, wedges)?;
        }
        out.meta = records.meta.clone();
        Ok(out)
    }

    /// Flatten the graph, atoms in map order. Unset values are written as their defaults.
    pub fn to_records(&self) -> Records {
        let state = |side: usize| side.min(N.saturating_sub(1));
        let mut positions = BTreeMap::new();
        let mut atoms = Vec::with_capacity(self.atom_count());
        for (pos, (id, atom)) in self.atoms().enumerate() {
            positions.insert(id, pos);
            let (r, p) = (&atom.states[state(REAGENT)], &atom.states[state(PRODUCT)]);
            let charge = |s: &AtomState| s.charge.fixed().copied().unwrap_or(0);
            let xyz = r.xyz.unwrap_or_default();
            let p_xyz = p.xyz.filter(|&p| p != xyz);
            atoms.push(AtomRecord {
                map: Some(id),
                element: atom
                    .element()
                    .map_or_else(|| "*".to_string(), |e| e.symbol().to_string()),
                isotope: atom.isotope.fixed().copied().unwrap_or(0),
                charge: [charge(r), charge(p)],
                radical: [r.radical(), p.radical()],
                mark: atom.mark.clone(),
                xyz,
                p_xyz,
            });
        }
        let bonds = self
            .bonds()
            .filter_map(|(a, b, bond)| {
                let (r, p) = (&bond.states[state(REAGENT)], &bond.states[state(PRODUCT)]);
                let order = |s: &BondState| s.order.fixed().copied().unwrap_or(BondOrder::Any);
                let wedge = |s: &BondState| s.stereo.fixed().copied().unwrap_or(Wedge::None);
                Some(BondRecord {
                    atoms: (*positions.get(&a)?, *positions.get(&b)?),
                    order: [order(r), order(p)],
                    stereo: [wedge(r), wedge(p)],
                })
            })
            .collect();
        Records {
            atoms,
            bonds,
            meta: self.meta.clone(),
        }
    }
}
