use super::*;

fn numbered(element: &str, map: AtomId, x: f64) -> AtomRecord {
    AtomRecord {
        map: Some(map),
        xyz: Point3::new(x, 0.0, 0.0),
        ..AtomRecord::new(element)
    }
}

#[test]
fn molecule_round_trip() {
    trace_capture!();
    let mut oxygen = numbered("O", 2, 1.5);
    oxygen.charge = [-1, -1];
    let records = Records {
        atoms: vec![numbered("C", 1, 0.0), oxygen],
        bonds: vec![BondRecord::new(0, 1, BondOrder::Single)],
        meta: [("source".to_string(), vec!["test".to_string()])].into(),
    };
    let mol = MoleculeContainer::from_records(&records).unwrap();
    assert_eq!(mol.atom(2).and_then(|a| a.states[0].charge.fixed().copied()), Some(-1));
    assert_eq!(mol.bond(1, 2).and_then(|b| b.order(0)), Some(BondOrder::Single));
    assert_eq!(mol.meta()["source"], ["test"]);
    assert_eq!(mol.to_records(), records);
}

#[test]
fn reaction_round_trip() {
    let mut carbon = numbered("C", 1, 0.0);
    carbon.p_xyz = Some(Point3::new(0.0, 2.0, 0.0));
    let mut nitrogen = numbered("N", 2, 1.5);
    nitrogen.charge = [0, 1];
    let mut bond = BondRecord::new(0, 1, BondOrder::Single);
    bond.order[PRODUCT] = BondOrder::Double;
    let records = Records {
        atoms: vec![carbon, nitrogen],
        bonds: vec![bond],
        meta: Meta::new(),
    };
    let cgr = CgrContainer::from_records(&records).unwrap();
    let n = cgr.atom(2).unwrap();
    assert_eq!(n.reagent().charge, Attr::Fixed(0));
    assert_eq!(n.product().charge, Attr::Fixed(1));
    let c = cgr.atom(1).unwrap();
    assert_eq!(c.product().xyz, Some(Point3::new(0.0, 2.0, 0.0)));
    assert_eq!(cgr.center_atoms(false), [1, 2].into());
    assert_eq!(cgr.to_records(), records);

    // a molecule only keeps the reagent side
    let mol = MoleculeContainer::from_records(&records).unwrap();
    let flat = mol.to_records();
    assert_eq!(flat.atoms[1].charge, [0, 0]);
    assert_eq!(flat.atoms[0].p_xyz, None);
    assert_eq!(flat.bonds[0].order, [BondOrder::Single; 2]);
}

#[test]
fn requested_numbers() {
    let records = Records {
        atoms: vec![
            AtomRecord {
                map: Some(7),
                ..AtomRecord::new("C")
            },
            AtomRecord::new("C"),
        ],
        bonds: vec![BondRecord::new(1, 0, BondOrder::Single)],
        meta: Meta::new(),
    };
    let mol = MoleculeContainer::from_records(&records).unwrap();
    let ids = mol.atom_ids().collect::<Vec<_>>();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&7));
    assert!(mol.has_bond(ids[0], ids[1]));
}

#[test]
fn rejected() {
    let unknown = Records {
        atoms: vec![AtomRecord::new("Xx")],
        ..Records::default()
    };
    assert_eq!(
        MoleculeContainer::from_records(&unknown).unwrap_err(),
        DataError::UnknownElement("Xx".to_string()).into()
    );

    let dangling = Records {
        atoms: vec![AtomRecord::new("C")],
        bonds: vec![BondRecord::new(0, 1, BondOrder::Single)],
        meta: Meta::new(),
    };
    assert_eq!(
        MoleculeContainer::from_records(&dangling).unwrap_err(),
        DataError::AtomNotFound(2).into()
    );

    let empty = Records {
        atoms: vec![AtomRecord::new("C"), AtomRecord::new("C")],
        bonds: vec![BondRecord::new(0, 1, BondOrder::Absent)],
        meta: Meta::new(),
    };
    assert_eq!(
        CgrContainer::from_records(&empty).unwrap_err(),
        DataError::EmptyBond(1, 2).into()
    );
}

#[test]
fn wedged_center() {
    let mut atoms = vec![AtomRecord::new("C")];
    let points = [(1.0, 0.0), (-0.5, 0.866), (-0.5, -0.866)];
    for (e, (x, y)) in ["F", "Cl", "Br"].into_iter().zip(points) {
        atoms.push(AtomRecord {
            xyz: Point3::new(x, y, 0.0),
            ..AtomRecord::new(e)
        });
    }
    let mut bonds = (1..4)
        .map(|i| BondRecord::new(0, i, BondOrder::Single))
        .collect::<Vec<_>>();
    bonds[0].stereo = [Wedge::Up; 2];
    let records = Records {
        atoms,
        bonds,
        meta: Meta::new(),
    };
    let mol = MoleculeContainer::from_records(&records).unwrap();
    assert!(mol
        .atom(1)
        .and_then(|a| a.states[0].stereo.fixed().copied())
        .is_some_and(Chirality::is_chiral));
    let written = mol.to_records();
    assert_eq!(written.bonds[0].stereo, [Wedge::Up; 2]);
}
