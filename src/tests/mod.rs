use crate::prelude::*;

mod macros;
use macros::trace_capture;

mod hydrogens;
mod isomorphism;
mod records;
mod sssr;

/// A molecule with atoms numbered from 1 in the given order.
pub fn molecule(atoms: &[Element], bonds: &[(AtomId, AtomId, BondOrder)]) -> MoleculeContainer {
    let mut mol = MoleculeContainer::new();
    for &e in atoms {
        mol.add_atom(Atom::new(e), None).unwrap();
    }
    for &(a, b, order) in bonds {
        mol.add_bond(a, b, Bond::new(order)).unwrap();
    }
    mol
}

/// A reaction graph with atoms numbered from 1. Bonds carry (reagent, product) orders.
pub fn reaction(
    atoms: &[Element],
    bonds: &[(AtomId, AtomId, BondOrder, BondOrder)],
) -> CgrContainer {
    let mut cgr = CgrContainer::new();
    for &e in atoms {
        cgr.add_atom(Atom::new(e), None).unwrap();
    }
    for &(a, b, r, p) in bonds {
        cgr.add_bond(a, b, Bond::dual(r, p)).unwrap();
    }
    cgr
}

/// A ring of `n` carbons with single bonds.
pub fn carbon_ring(n: AtomId) -> MoleculeContainer {
    let atoms = vec![Element::C; n as usize];
    let bonds = (1..=n)
        .map(|i| (i, i % n + 1, BondOrder::Single))
        .collect::<Vec<_>>();
    molecule(&atoms, &bonds)
}

/// Compare sets of rings, ignoring their rotation and direction.
#[track_caller]
pub fn assert_rings_eq(found: &[Vec<AtomId>], expected: &[&[AtomId]]) {
    let normalize = |r: &[AtomId]| {
        let mut r = r.to_vec();
        r.sort_unstable();
        r
    };
    let mut found = found.iter().map(|r| normalize(r)).collect::<Vec<_>>();
    let mut expected = expected.iter().map(|r| normalize(r)).collect::<Vec<_>>();
    found.sort();
    expected.sort();
    assert_eq!(found, expected);
}

/// Check that consecutive ring atoms are bonded, and the ends too.
#[track_caller]
pub fn assert_closed_ring<const N: usize>(graph: &Container<N>, ring: &[AtomId]) {
    assert!(ring.len() >= 3, "ring {ring:?} is too short");
    for (&a, &b) in ring.iter().zip(ring.iter().cycle().skip(1)) {
        assert!(graph.has_bond(a, b), "ring {ring:?} has no bond {a}-{b}");
    }
}
