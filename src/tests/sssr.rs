use super::*;
use crate::graph::algo::sssr::ring_count;

#[test]
fn acyclic() {
    let hexane = molecule(
        &[Element::C; 6],
        &(1..6).map(|i| (i, i + 1, BondOrder::Single)).collect::<Vec<_>>(),
    );
    assert_eq!(hexane.ring_count(), 0);
    assert!(hexane.sssr().is_empty());
    assert_eq!(hexane.rings().next(), None);
    assert!(MoleculeContainer::new().sssr().is_empty());
}

#[test]
fn single_rings() {
    trace_capture!();
    for n in 3..=8 {
        let ring = carbon_ring(n);
        assert_eq!(ring.ring_count(), 1);
        let found = ring.sssr();
        assert_eq!(found.len(), 1, "{n}-membered ring");
        assert_eq!(found[0].len(), n as usize);
        assert_closed_ring(&ring, &found[0]);
    }
}

#[test]
fn fused_four_rings() {
    trace_capture!();
    // bicyclo[2.2.0]hexane with a methyl: 7 atoms, 8 bonds
    let mol = molecule(
        &[Element::C; 7],
        &[
            (1, 2, BondOrder::Single),
            (2, 3, BondOrder::Single),
            (3, 4, BondOrder::Single),
            (4, 1, BondOrder::Single),
            (3, 5, BondOrder::Single),
            (5, 6, BondOrder::Single),
            (6, 4, BondOrder::Single),
            (6, 7, BondOrder::Single),
        ],
    );
    assert_eq!(mol.ring_count(), 2);
    let rings = mol.sssr();
    assert_eq!(rings.len(), 2);
    for ring in &rings {
        assert_closed_ring(&mol, ring);
    }
    assert_rings_eq(&rings, &[&[1, 2, 3, 4], &[3, 4, 5, 6]]);
}

#[test]
fn naphthalene_skeleton() {
    let bonds = [
        (1, 2),
        (2, 3),
        (3, 4),
        (4, 5),
        (5, 10),
        (10, 1),
        (5, 6),
        (6, 7),
        (7, 8),
        (8, 9),
        (9, 10),
    ]
    .map(|(a, b)| (a, b, BondOrder::Aromatic));
    let mol = molecule(&[Element::C; 10], &bonds);
    assert_rings_eq(
        &mol.sssr(),
        &[&[1, 2, 3, 4, 5, 10], &[5, 6, 7, 8, 9, 10]],
    );
}

#[test]
fn odd_rings() {
    // two fused five-membered rings, closed from a shortest and a longer path
    let mol = molecule(
        &[Element::C; 8],
        &[
            (1, 2, BondOrder::Single),
            (2, 3, BondOrder::Single),
            (3, 4, BondOrder::Single),
            (4, 5, BondOrder::Single),
            (5, 1, BondOrder::Single),
            (4, 6, BondOrder::Single),
            (6, 7, BondOrder::Single),
            (7, 8, BondOrder::Single),
            (8, 5, BondOrder::Single),
        ],
    );
    assert_rings_eq(&mol.sssr(), &[&[1, 2, 3, 4, 5], &[4, 5, 6, 7, 8]]);
}

#[test]
fn cubane() {
    let bonds = [
        (1, 2),
        (2, 3),
        (3, 4),
        (4, 1),
        (5, 6),
        (6, 7),
        (7, 8),
        (8, 5),
        (1, 5),
        (2, 6),
        (3, 7),
        (4, 8),
    ]
    .map(|(a, b)| (a, b, BondOrder::Single));
    let mol = molecule(&[Element::C; 8], &bonds);
    assert_eq!(mol.ring_count(), 5);
    let rings = mol.sssr();
    assert_eq!(rings.len(), 5);
    for ring in &rings {
        assert_eq!(ring.len(), 4);
        assert_closed_ring(&mol, ring);
    }
}

#[test]
fn disconnected() {
    let shifted = carbon_ring(6)
        .remap(&(1..=6).map(|i| (i, i + 10)).collect())
        .unwrap();
    let two = carbon_ring(5).union(&shifted).unwrap();
    assert_eq!(ring_count(two.graph()), 2);
    assert_rings_eq(&two.sssr(), &[&[1, 2, 3, 4, 5], &[11, 12, 13, 14, 15, 16]]);
}

#[test]
fn lazy() {
    let triangle = carbon_ring(3)
        .remap(&(1..=3).map(|i| (i, i + 4)).collect())
        .unwrap();
    let ring = carbon_ring(4).union(&triangle).unwrap();
    let mut rings = ring.rings();
    // smallest ring first
    assert_eq!(rings.next().map(|r| r.len()), Some(3));
    assert_eq!(rings.next().map(|r| r.len()), Some(4));
    assert_eq!(rings.next(), None);
}
