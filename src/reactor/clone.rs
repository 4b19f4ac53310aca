//! Reaction center splitting and substituent cloning.
//!
//! A substituent replaced at a reaction center leaves a recognizable shape: one reagent-only bond
//! and one product-only bond on the same atom. Cutting those splits the graph into the leaving
//! fragment, the fragment that stays, and whatever was attached. Attached fragments that repeat
//! a staying one get a copy of the staying fragment and of its leaving partner.

use super::ids::remap_into;
use super::matcher::{Matcher, Rule};
use super::{Mapping, Reactor};
use crate::container::{CgrContainer, ValenceCheck};
use crate::core::*;
use crate::error::DataError;
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet};
use tracing::*;

fn has_orders(bond: &Bond<2>, reagent: BondOrder, product: BondOrder) -> bool {
    bond.states[REAGENT].order == Attr::Fixed(reagent)
        && bond.states[PRODUCT].order == Attr::Fixed(product)
}

fn lost(bond: &Bond<2>) -> bool {
    has_orders(bond, BondOrder::Single, BondOrder::Absent)
}

fn formed(bond: &Bond<2>) -> bool {
    has_orders(bond, BondOrder::Absent, BondOrder::Single)
}

/// A center with one lost and one formed single bond, as (lost neighbor, center, formed neighbor).
fn substitution_paths(g: &CgrContainer) -> Vec<(AtomId, AtomId, AtomId)> {
    let mut out = Vec::new();
    for center in g.atom_ids() {
        for (m, l) in g.neighbors(center).collect_vec().into_iter().tuple_combinations() {
            let (Some(cm), Some(cl)) = (g.bond(center, m), g.bond(center, l)) else {
                continue;
            };
            if lost(cm) && formed(cl) {
                out.push((m, center, l));
            } else if formed(cm) && lost(cl) {
                out.push((l, center, m));
            }
        }
    }
    out
}

/// Formed single bonds, as sorted pairs.
fn broken_paths(g: &CgrContainer) -> Vec<(AtomId, AtomId)> {
    g.bonds()
        .filter(|(_, _, b)| formed(b))
        .map(|(a, b, _)| (a, b))
        .collect()
}

/// The result of cutting a graph at its substitution sites
#[derive(Debug)]
struct Split {
    components: Vec<BTreeSet<AtomId>>,
    /// Center to the neighbor it loses
    lost: BTreeMap<AtomId, AtomId>,
    /// Ends of cut formed bonds
    terminals: BTreeSet<AtomId>,
}

#[instrument(level = "trace", skip_all)]
fn split_center(g: &CgrContainer) -> Result<Split, DataError> {
    let mut cut = g.clone();
    let mut lost_bonds = Vec::<(AtomId, AtomId)>::new();
    for (l, n, m) in substitution_paths(g) {
        if lost_bonds.contains(&(n, l)) {
            continue;
        }
        trace!(center = n, lost = l, formed = m, "substitution path");
        lost_bonds.push((n, l));
        if cut.has_bond(n, l) {
            cut.remove_bond(n, l)?;
        }
        if cut.has_bond(n, m) {
            cut.remove_bond(n, m)?;
        }
    }
    let lost_atoms = lost_bonds
        .iter()
        .flat_map(|&(n, l)| [n, l])
        .collect::<Vec<_>>();
    let mut terminals = BTreeSet::new();
    for (n, m) in broken_paths(&cut) {
        let reachable = lost_atoms
            .iter()
            .cartesian_product([n, m])
            .any(|(&x, y)| cut.connected(x, y));
        if !reachable {
            trace!(a = n, b = m, "broken path");
            cut.remove_bond(n, m)?;
            terminals.insert(n);
            terminals.insert(m);
        }
    }
    let mut lost = BTreeMap::new();
    for (n, l) in lost_bonds {
        lost.insert(n, l);
    }
    Ok(Split {
        components: cut.components(),
        lost,
        terminals,
    })
}

impl Reactor {
    /// Copy repeated substituents across reaction centers.
    ///
    /// Returns a new graph. When any fragment was cloned, the result carries the input's metadata.
    #[instrument(level = "debug", skip_all)]
    pub fn clone_subgraphs(&self, g: &CgrContainer) -> Result<CgrContainer, DataError> {
        let Split {
            components,
            lost,
            terminals,
        } = split_center(g)?;
        let x_terminals = lost.values().copied().collect::<BTreeSet<_>>();
        let mut x_groups = BTreeMap::new();
        let mut r_groups = Vec::new();
        let mut others = Vec::new();
        for component in components {
            if let Some(&x) = component.iter().find(|id| x_terminals.contains(id)) {
                x_groups.insert(x, g.substructure(component.iter().copied())?);
                continue;
            }
            let centers = component
                .iter()
                .copied()
                .filter(|id| lost.contains_key(id))
                .collect::<BTreeSet<_>>();
            if !centers.is_empty() {
                r_groups.push((centers, g.substructure(component.iter().copied())?));
                continue;
            }
            others.push(g.substructure(component.iter().copied())?);
        }
        debug!(
            r_groups = r_groups.len(),
            x_groups = x_groups.len(),
            others = others.len(),
            "split reaction center"
        );
        let rule = Rule::Products {
            isotope: self.config().isotope,
            stereo: self.config().stereo,
        };
        let mut out = g.clone();
        let mut clones = Vec::<(&BTreeSet<AtomId>, Mapping)>::new();
        for other in &others {
            for (centers, group) in &r_groups {
                let found = Matcher::new(other, group, rule)
                    .map(|m| m.into_iter().map(|(c, r)| (r, c)).collect::<Mapping>())
                    .find(|m| {
                        centers
                            .iter()
                            .all(|c| m.get(c).is_some_and(|t| terminals.contains(t)))
                    });
                let Some(mapping) = found else {
                    continue;
                };
                trace!(centers = ?centers, "cloned substituent");
                let (copy, _) = remap_into(group, &out, &mapping)?;
                out = out.compose(&copy);
                clones.push((centers, mapping));
                break;
            }
        }
        for (centers, mapping) in &clones {
            for center in *centers {
                let (Some(x), Some(&to)) = (lost.get(center), mapping.get(center)) else {
                    continue;
                };
                let Some(group) = x_groups.get(x) else {
                    continue;
                };
                let (copy, xmap) = remap_into(group, &out, &Mapping::new())?;
                out = out.union(&copy)?;
                let Some(&from) = xmap.get(x) else {
                    continue;
                };
                out.add_bond_with(
                    to,
                    from,
                    Bond::dual(BondOrder::Single, BondOrder::Absent),
                    ValenceCheck::Ignore,
                )?;
            }
        }
        if !clones.is_empty() {
            let meta = g.meta().clone();
            out.meta_mut().extend(meta);
        }
        debug!(clones = clones.len(), atoms = out.atom_count(), "cloned");
        Ok(out)
    }
}
