use super::*;
use crate::graph::algo::isomorphism::*;
use petgraph::graph::UnGraph;

fn path(n: u32) -> UnGraph<(), ()> {
    UnGraph::from_edges((1..n).map(|i| (i - 1, i)))
}

fn cycle(n: u32) -> UnGraph<(), ()> {
    UnGraph::from_edges((0..n).map(|i| (i, (i + 1) % n)))
}

#[test]
fn structural() {
    trace_capture!();
    assert!(is_isomorphic_matching(&cycle(5), &cycle(5), Structural));
    assert!(!is_isomorphic_matching(&cycle(5), &path(5), Structural));
    assert_eq!(
        subgraph_isomorphisms(&path(3), &cycle(4), Structural).count(),
        8
    );
    // matching is induced, so a path doesn't fit in a triangle
    assert_eq!(
        subgraph_isomorphisms(&path(3), &cycle(3), Structural).count(),
        0
    );
    assert_eq!(
        subgraph_isomorphisms(&cycle(6), &cycle(5), Structural).next(),
        None
    );
}

#[test]
fn empty_pattern() {
    let empty = UnGraph::<(), ()>::default();
    let mut it = subgraph_isomorphisms(&empty, &cycle(3), Structural);
    assert_eq!(it.next(), Some(Vec::new()));
    assert_eq!(it.next(), None);
}

#[test]
fn mappings_are_injective() {
    for m in subgraph_isomorphisms(&path(2), &cycle(6), Structural) {
        assert_eq!(m.len(), 2);
        assert_ne!(m[0], m[1]);
    }
}

/// Only pairs nodes with the same label
struct Labels(Vec<u8>, Vec<u8>);
impl Semantics for Labels {
    fn nodes(&mut self, n0: usize, n1: usize) -> bool {
        self.0[n0] == self.1[n1]
    }
    fn edges(&mut self, _e0: (usize, usize), _e1: (usize, usize)) -> bool {
        true
    }
}

#[test]
fn semantic_pruning() {
    let labels = Labels(vec![1, 2], vec![2, 1, 1, 2]);
    let mut found = subgraph_isomorphisms(&path(2), &cycle(4), labels).collect::<Vec<_>>();
    found.sort();
    // only the bonds 0-1 and 2-3 join a 1 to a 2
    assert_eq!(found, [vec![1, 0], vec![2, 3]]);
}

#[test]
fn identical_copy() {
    trace_capture!();
    let mol = molecule(
        &[Element::C, Element::C, Element::O, Element::N],
        &[
            (1, 2, BondOrder::Single),
            (2, 3, BondOrder::Double),
            (2, 4, BondOrder::Single),
        ],
    );
    let copy = mol
        .remap(&[(1, 21), (2, 22), (3, 23), (4, 24)].into())
        .unwrap();
    let reactor = Reactor::new(ReactorConfig {
        element: true,
        isotope: true,
        extralabels: true,
        stereo: true,
    });
    let mapping = reactor.matcher(&mol, &copy).next().unwrap();
    assert_eq!(mapping, Mapping::from([(1, 21), (2, 22), (3, 23), (4, 24)]));
}

#[test]
fn wildcard_element() {
    let target = molecule(
        &[Element::C, Element::O, Element::N],
        &[(1, 2, BondOrder::Single), (2, 3, BondOrder::Single)],
    );
    let mut pattern = MoleculeContainer::new();
    pattern.add_atom(Atom::query(), None).unwrap();
    let found = Reactor::default()
        .matcher(&pattern, &target)
        .map(|m| m[&1])
        .collect::<Vec<_>>();
    assert_eq!(found, [1, 2, 3]);

    let mut oxygen = MoleculeContainer::new();
    oxygen.add_atom(Atom::new(Element::O), None).unwrap();
    let found = Reactor::default()
        .matcher(&oxygen, &target)
        .collect::<Vec<_>>();
    assert_eq!(found, [Mapping::from([(1, 2)])]);
}

#[test]
fn config_toggles() {
    let target = molecule(&[Element::C], &[]);
    let mut pattern = MoleculeContainer::new();
    pattern
        .add_atom(Atom::new(Element::C).with_isotope(13), None)
        .unwrap();
    assert_eq!(Reactor::default().matcher(&pattern, &target).count(), 1);
    let isotopes = Reactor::new(ReactorConfig {
        isotope: true,
        ..Default::default()
    });
    assert_eq!(isotopes.matcher(&pattern, &target).count(), 0);
    // natural abundance in a pattern doesn't constrain the isotope
    assert_eq!(isotopes.matcher(&target, &pattern).count(), 1);

    let nitrogen = molecule(&[Element::N], &[]);
    let anything = Reactor::new(ReactorConfig {
        element: false,
        ..Default::default()
    });
    assert_eq!(anything.matcher(&pattern, &nitrogen).count(), 1);
}

#[test]
fn stereo_toggle() {
    let mut target = super::stereo::halomethane::<1>();
    target.add_stereo(1, 2, [Wedge::Up]).unwrap();
    let chirality = target
        .atom(1)
        .and_then(|a| a.states[0].stereo.fixed().copied())
        .unwrap();
    let stereo = Reactor::new(ReactorConfig {
        stereo: true,
        ..Default::default()
    });
    // an unmarked pattern atom takes either configuration
    let mut pattern = molecule(&[Element::C], &[]);
    assert_eq!(stereo.matcher(&pattern, &target).count(), 1);

    pattern.atom_mut(1).unwrap().states[0].stereo = Attr::Fixed(chirality);
    assert_eq!(stereo.matcher(&pattern, &target).count(), 1);
    let mirrored = if chirality == Chirality::Cw {
        Chirality::Ccw
    } else {
        Chirality::Cw
    };
    pattern.atom_mut(1).unwrap().states[0].stereo = Attr::Fixed(mirrored);
    assert_eq!(stereo.matcher(&pattern, &target).count(), 0);
    assert_eq!(Reactor::default().matcher(&pattern, &target).count(), 1);
}

#[test]
fn variable_atoms() {
    let target = molecule(
        &[Element::C, Element::CL, Element::BR],
        &[(1, 2, BondOrder::Single), (1, 3, BondOrder::Single)],
    );
    let mut pattern = MoleculeContainer::new();
    let mut halogen = Atom::query();
    halogen.element = Attr::OneOf(vec![Element::CL, Element::BR]);
    pattern.add_atom(halogen, None).unwrap();
    let found = Reactor::default()
        .matcher(&pattern, &target)
        .map(|m| m[&1])
        .collect::<Vec<_>>();
    assert_eq!(found, [2, 3]);
}

#[test]
fn extra_labels() {
    let target = molecule(
        &[Element::C, Element::C, Element::O],
        &[(1, 2, BondOrder::Single), (2, 3, BondOrder::Double)],
    );
    let mut pattern = MoleculeContainer::new();
    let mut sp2 = Atom::new(Element::C);
    sp2.states[0].hybridization = Attr::Fixed(Hybridization::Sp2);
    pattern.add_atom(sp2, None).unwrap();
    let labelled = Reactor::new(ReactorConfig {
        extralabels: true,
        ..Default::default()
    });
    let found = labelled
        .matcher(&pattern, &target)
        .map(|m| m[&1])
        .collect::<Vec<_>>();
    assert_eq!(found, [2]);
    assert_eq!(Reactor::default().matcher(&pattern, &target).count(), 2);
}

#[test]
fn reaction_bonds() {
    // pattern: a C-O bond that breaks
    let pattern = reaction(
        &[Element::C, Element::O],
        &[(1, 2, BondOrder::Single, BondOrder::Absent)],
    );
    let target = reaction(
        &[Element::C, Element::O, Element::C],
        &[
            (1, 2, BondOrder::Single, BondOrder::Single),
            (2, 3, BondOrder::Single, BondOrder::Absent),
        ],
    );
    let found = Reactor::default()
        .matcher(&pattern, &target)
        .collect::<Vec<_>>();
    assert_eq!(found, [Mapping::from([(1, 3), (2, 2)])]);
}

#[test]
fn combined_charges() {
    let mut target = reaction(&[Element::N, Element::N], &[]);
    target.atom_mut(2).unwrap().states[PRODUCT].charge = Attr::Fixed(1);
    let pattern_with = |reagent: Attr<i8>, product: Attr<i8>| {
        let mut atom = Atom::<2>::new(Element::N);
        atom.states[REAGENT].charge = reagent;
        atom.states[PRODUCT].charge = product;
        let mut p = CgrContainer::new();
        p.add_atom(atom, None).unwrap();
        p
    };
    let hits = |p: &CgrContainer| {
        Reactor::default()
            .matcher(p, &target)
            .map(|m| m[&1])
            .collect::<Vec<_>>()
    };
    // the same list on both sides means unchanged
    let same = pattern_with(Attr::OneOf(vec![0, 1]), Attr::OneOf(vec![0, 1]));
    assert_eq!(hits(&same), [1]);
    // a list against a fixed value asks for a change to it
    let charging = pattern_with(Attr::OneOf(vec![0, -1]), Attr::Fixed(1));
    assert_eq!(hits(&charging), [2]);
    // lists pair up by position
    let paired = pattern_with(Attr::OneOf(vec![0, 1]), Attr::OneOf(vec![1, 1]));
    assert_eq!(hits(&paired), [2]);
    // an unset side matches anything there
    let product_only = pattern_with(Attr::Any, Attr::Fixed(1));
    assert_eq!(hits(&product_only), [2]);
}

#[test]
fn molecule_against_reaction() {
    let target = reaction(
        &[Element::C, Element::O],
        &[(1, 2, BondOrder::Single, BondOrder::Double)],
    );
    let pattern = molecule(
        &[Element::C, Element::O],
        &[(1, 2, BondOrder::Single)],
    );
    assert_eq!(Reactor::default().matcher(&pattern, &target).count(), 1);
}
