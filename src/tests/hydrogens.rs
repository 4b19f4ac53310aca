use super::*;

#[test]
fn implicit_counts() {
    let mol = molecule(
        &[Element::C, Element::C, Element::O],
        &[(1, 2, BondOrder::Single), (2, 3, BondOrder::Double)],
    );
    assert_eq!(mol.implicit_hydrogens(1), Ok([3]));
    assert_eq!(mol.implicit_hydrogens(2), Ok([1]));
    assert_eq!(mol.implicit_hydrogens(3), Ok([0]));
    assert_eq!(mol.implicit_hydrogens(4), Err(DataError::AtomNotFound(4)));

    let benzene = {
        let atoms = [Element::C; 6];
        let bonds = (1..=6)
            .map(|i| (i, i % 6 + 1, BondOrder::Aromatic))
            .collect::<Vec<_>>();
        molecule(&atoms, &bonds)
    };
    assert!(benzene
        .atom_ids()
        .all(|id| benzene.implicit_hydrogens(id) == Ok([1])));
}

#[test]
fn charged_and_radical() {
    let mut mol = MoleculeContainer::new();
    let n = mol
        .add_atom(Atom::new(Element::N).with_charge(1), None)
        .unwrap();
    let c = mol
        .add_atom(Atom::new(Element::C).with_radical(Radical::Doublet), None)
        .unwrap();
    assert_eq!(mol.implicit_hydrogens(n), Ok([4]));
    assert_eq!(mol.implicit_hydrogens(c), Ok([3]));
}

#[test]
fn explicit_round_trip() {
    trace_capture!();
    let mut mol = molecule(
        &[Element::C, Element::O],
        &[(1, 2, BondOrder::Single)],
    );
    assert_eq!(mol.explicify_hydrogens(), Ok(4));
    assert_eq!(mol.atom_count(), 6);
    assert_eq!(mol.implicit_hydrogens(1), Ok([0]));
    assert!(mol
        .neighbors(2)
        .any(|n| mol.atom(n).is_some_and(Atom::is_hydrogen)));
    assert_eq!(mol.implicify_hydrogens(), 4);
    assert_eq!(mol.atom_ids().collect::<Vec<_>>(), [1, 2]);
    assert_eq!(mol.implicit_hydrogens(1), Ok([3]));
}

#[test]
fn dual_hydrogens() {
    // a C-O bond forms, taking a hydrogen from each side
    let cgr = reaction(
        &[Element::C, Element::O],
        &[(1, 2, BondOrder::Absent, BondOrder::Single)],
    );
    assert_eq!(cgr.implicit_hydrogens(1), Ok([4, 3]));
    let mut explicit = cgr.clone();
    assert_eq!(explicit.explicify_hydrogens(), Ok(6));
    let orders = explicit
        .bonds_of(1)
        .filter(|&(n, _)| n != 2)
        .map(|(_, b)| (b.order(REAGENT), b.order(PRODUCT)))
        .collect::<Vec<_>>();
    let lost = orders
        .iter()
        .filter(|&&o| o == (Some(BondOrder::Single), Some(BondOrder::Absent)))
        .count();
    assert_eq!(orders.len(), 4);
    assert_eq!(lost, 1);
    assert_eq!(explicit.implicit_hydrogens(1), Ok([0, 0]));
    assert_eq!(explicit.implicify_hydrogens(), 6);
    assert_eq!(explicit.atom_count(), 2);
}

#[test]
fn kept_hydrogens() {
    let mut mol = molecule(
        &[Element::H, Element::H, Element::H, Element::C],
        &[(1, 2, BondOrder::Single)],
    );
    // molecular hydrogen and the lone hydrogen stay
    assert_eq!(mol.implicify_hydrogens(), 0);
    assert_eq!(mol.atom_count(), 4);

    // boron takes three, the fourth hydrogen can't be restored
    let mut borane = MoleculeContainer::new();
    let b = borane
        .add_atom(Atom::new(Element::from_protons(5).unwrap()), None)
        .unwrap();
    for _ in 0..4 {
        let h = borane.add_atom(Atom::new(Element::H), None).unwrap();
        borane
            .add_bond_with(b, h, Bond::new(BondOrder::Single), ValenceCheck::Ignore)
            .unwrap();
    }
    assert_eq!(borane.implicify_hydrogens(), 0);
    assert_eq!(borane.atom_count(), 5);

    let mut borate = MoleculeContainer::new();
    let b = borate
        .add_atom(Atom::new(Element::from_protons(5).unwrap()).with_charge(-1), None)
        .unwrap();
    for _ in 0..4 {
        let h = borate.add_atom(Atom::new(Element::H), None).unwrap();
        borate.add_bond(b, h, Bond::new(BondOrder::Single)).unwrap();
    }
    assert_eq!(borate.implicify_hydrogens(), 4);
    assert_eq!(borate.implicit_hydrogens(b), Ok([4]));
}
