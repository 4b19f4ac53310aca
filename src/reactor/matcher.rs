//! Attribute comparisons for subgraph matching.
//!
//! A pattern attribute is checked against the target's concrete values. On reaction graphs both
//! sides are considered together, so a variable pattern can ask for a specific change.

use super::{Mapping, ReactorConfig};
use crate::container::Container;
use crate::core::*;
use crate::graph::algo::{GraphMatcher, Semantics};
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::BTreeMap;
use tracing::*;

/// How atoms and bonds are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rule {
    /// Pattern constraints against the target, as toggled by the config
    Query(ReactorConfig),
    /// Exact equality of product-side attributes, used to find repeated fragments
    Products { isotope: bool, stereo: bool },
}

/// One side of a pattern attribute
enum Options<'a, V> {
    Any,
    One(&'a V),
    Many(Vec<&'a V>),
}
impl<'a, V> Options<'a, V> {
    fn of(attr: &'a Attr<V>) -> Self {
        match attr {
            Attr::Any => Self::Any,
            Attr::Fixed(v) => Self::One(v),
            Attr::OneOf(vs) => Self::Many(vs.iter().collect()),
            Attr::Conditional(map) => Self::Many(map.keys().collect()),
        }
    }
}

/// Check a reagent/product pair of pattern values against the target's pair.
///
/// Identical lists on both sides mean "unchanged, one of these". Different lists pair up by
/// position, dropping pairs that don't change. A list against a fixed value pairs every entry with
/// it, again dropping unchanged pairs. An unset side matches anything on that side.
fn combined_accepts<V: PartialEq>(reagent: &Attr<V>, product: &Attr<V>, tr: &V, tp: &V) -> bool {
    use Options::*;
    match (Options::of(reagent), Options::of(product)) {
        (Any, Any) => true,
        (Any, One(v)) => v == tp,
        (Any, Many(vs)) => vs.contains(&tp),
        (One(v), Any) => v == tr,
        (Many(vs), Any) => vs.contains(&tr),
        (One(r), One(p)) => r == tr && p == tp,
        (Many(rs), Many(ps)) if rs == ps => tr == tp && rs.contains(&tr),
        (Many(rs), Many(ps)) => rs
            .iter()
            .zip(&ps)
            .any(|(r, p)| r != p && *r == tr && *p == tp),
        (Many(rs), One(f)) => f == tp && tr != tp && rs.contains(&tr),
        (One(f), Many(ps)) => f == tr && tr != tp && ps.contains(&tp),
    }
}

/// Check a pattern attribute against a target attribute that should be concrete.
fn attr_accepts<V: PartialEq>(pattern: &Attr<V>, target: &Attr<V>) -> bool {
    match target {
        Attr::Fixed(v) => pattern.accepts(v),
        _ => pattern.is_any() || pattern == target,
    }
}

/// Compare one attribute over all sides. Reaction graphs on both ends use the combined semantics,
/// anything else compares the first side.
fn states_accept<'a, V: PartialEq + 'a>(
    pattern: impl IntoIterator<Item = &'a Attr<V>>,
    target: impl IntoIterator<Item = &'a Attr<V>>,
) -> bool {
    let pattern = pattern.into_iter().take(2).collect::<Vec<_>>();
    let target = target.into_iter().take(2).collect::<Vec<_>>();
    match (&pattern[..], &target[..]) {
        ([pr, pp], [Attr::Fixed(tr), Attr::Fixed(tp)]) => combined_accepts(pr, pp, tr, tp),
        ([pr, pp], [tr, tp]) => attr_accepts(pr, tr) && attr_accepts(pp, tp),
        ([p, ..], [t, ..]) => attr_accepts(p, t),
        _ => true,
    }
}

static UNMARKED: Attr<Chirality> = Attr::Any;

/// A pattern side without a configuration leaves the target's unconstrained.
fn pattern_stereo(state: &AtomState) -> &Attr<Chirality> {
    match &state.stereo {
        Attr::Fixed(Chirality::None) => &UNMARKED,
        other => other,
    }
}

/// Semantic checks between a pattern and a target, laid out by compact index
pub(crate) struct Compare<'a, const P: usize, const T: usize> {
    pattern: &'a Container<P>,
    target: &'a Container<T>,
    pattern_ids: Vec<AtomId>,
    target_ids: Vec<AtomId>,
    /// Computed labels of the target, only needed for extra labels
    marks: Option<&'a BTreeMap<AtomId, QueryMarks<T>>>,
    rule: Rule,
}

impl<const P: usize, const T: usize> Compare<'_, P, T> {
    fn query_atoms(&self, config: ReactorConfig, p: &Atom<P>, t: &Atom<T>, tid: AtomId) -> bool {
        if config.element
            && !(attr_accepts(&p.element, &t.element)
                && states_accept(
                    p.states.iter().map(|s| &s.charge),
                    t.states.iter().map(|s| &s.charge),
                ))
        {
            return false;
        }
        // natural abundance in a pattern matches any isotope
        if config.isotope
            && p.isotope != Attr::Fixed(0)
            && !attr_accepts(&p.isotope, &t.isotope)
        {
            return false;
        }
        if config.extralabels {
            let Some(marks) = self.marks.and_then(|m| m.get(&tid)) else {
                return false;
            };
            let hybridization = marks.map(|m| Attr::Fixed(m.hybridization()));
            let neighbors = marks.map(|m| Attr::Fixed(m.neighbors()));
            if !states_accept(p.states.iter().map(|s| &s.hybridization), &hybridization)
                || !states_accept(p.states.iter().map(|s| &s.neighbors), &neighbors)
            {
                return false;
            }
        }
        if config.stereo
            && !states_accept(
                p.states.iter().map(pattern_stereo),
                t.states.iter().map(|s| &s.stereo),
            )
        {
            return false;
        }
        true
    }

    fn product_atoms(&self, isotope: bool, stereo: bool, p: &Atom<P>, t: &Atom<T>) -> bool {
        let (ps, ts) = (p.states.get(PRODUCT), t.states.get(PRODUCT));
        p.element == t.element
            && ps.map(|s| &s.charge) == ts.map(|s| &s.charge)
            && (!isotope || p.isotope == t.isotope)
            && (!stereo || ps.map(|s| &s.stereo) == ts.map(|s| &s.stereo))
    }
}

impl<const P: usize, const T: usize> Semantics for Compare<'_, P, T> {
    fn nodes(&mut self, n0: usize, n1: usize) -> bool {
        let (pid, tid) = (self.pattern_ids[n0], self.target_ids[n1]);
        let (Some(p), Some(t)) = (self.pattern.atom(pid), self.target.atom(tid)) else {
            return false;
        };
        match self.rule {
            Rule::Query(config) => self.query_atoms(config, p, t, tid),
            Rule::Products { isotope, stereo } => self.product_atoms(isotope, stereo, p, t),
        }
    }

    fn edges(&mut self, e0: (usize, usize), e1: (usize, usize)) -> bool {
        let p = self
            .pattern
            .bond(self.pattern_ids[e0.0], self.pattern_ids[e0.1]);
        let t = self.target.bond(self.target_ids[e1.0], self.target_ids[e1.1]);
        let (Some(p), Some(t)) = (p, t) else {
            return false;
        };
        match self.rule {
            Rule::Query(_) => states_accept(
                p.states.iter().map(|s| &s.order),
                t.states.iter().map(|s| &s.order),
            ),
            Rule::Products { .. } => {
                p.states.get(PRODUCT).map(|s| &s.order) == t.states.get(PRODUCT).map(|s| &s.order)
            }
        }
    }
}

/// Lay a graph out by compact index, in ascending atom order.
fn snapshot<const N: usize>(graph: &Container<N>) -> (Vec<AtomId>, UnGraph<(), ()>) {
    let ids = graph.atom_ids().collect::<Vec<_>>();
    let mut out = UnGraph::with_capacity(ids.len(), graph.bond_count());
    for _ in &ids {
        out.add_node(());
    }
    for (a, b, _) in graph.bonds() {
        if let (Ok(a), Ok(b)) = (ids.binary_search(&a), ids.binary_search(&b)) {
            out.add_edge(NodeIndex::new(a), NodeIndex::new(b), ());
        }
    }
    (ids, out)
}

/// Lazily enumerates induced subgraph matches of a pattern in a target.
///
/// Mappings go from pattern atoms to target atoms, in VF2 discovery order.
pub struct Matcher<'a, const P: usize, const T: usize> {
    inner: GraphMatcher<Compare<'a, P, T>>,
}

impl<'a, const P: usize, const T: usize> Matcher<'a, P, T> {
    pub(crate) fn new(pattern: &'a Container<P>, target: &'a Container<T>, rule: Rule) -> Self {
        let (pattern_ids, pg) = snapshot(pattern);
        let (target_ids, tg) = snapshot(target);
        let marks = match rule {
            Rule::Query(config) if config.extralabels => Some(target.query_marks()),
            _ => None,
        };
        trace!(
            pattern = pattern_ids.len(),
            target = target_ids.len(),
            "matching"
        );
        let compare = Compare {
            pattern,
            target,
            pattern_ids,
            target_ids,
            marks,
            rule,
        };
        Self {
            inner: GraphMatcher::new(&pg, &tg, compare, true),
        }
    }
}

impl<const P: usize, const T: usize> Iterator for Matcher<'_, P, T> {
    type Item = Mapping;

    fn next(&mut self) -> Option<Mapping> {
        let found = self.inner.next()?;
        let compare = self.inner.semantics();
        Some(
            found
                .into_iter()
                .enumerate()
                .map(|(p, t)| (compare.pattern_ids[p], compare.target_ids[t]))
                .collect(),
        )
    }
}
