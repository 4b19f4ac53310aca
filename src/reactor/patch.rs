use crate::container::{CgrContainer, Container};
use crate::core::*;
use crate::error::{CgrError, TemplateError};
use itertools::Itertools;
use tracing::*;

/// Resolve a patch value against the current one. `None` keeps the current value.
fn resolve<V: Ord + Clone>(
    patch: &Attr<V>,
    current: Option<&Attr<V>>,
    id: AtomId,
) -> Result<Option<Attr<V>>, TemplateError> {
    match patch {
        Attr::Any => Ok(None),
        Attr::Fixed(v) => Ok(Some(Attr::Fixed(v.clone()))),
        Attr::OneOf(_) => Err(TemplateError::VariablePatch(id)),
        Attr::Conditional(map) => current
            .and_then(Attr::fixed)
            .and_then(|v| map.get(v))
            .map(|v| Some(Attr::Fixed(v.clone())))
            .ok_or(TemplateError::UnresolvedCondition(id)),
    }
}

fn apply<V: Ord + Clone>(
    slot: &mut Attr<V>,
    patch: &Attr<V>,
    current: Option<&Attr<V>>,
    id: AtomId,
) -> Result<(), TemplateError> {
    if let Some(value) = resolve(patch, current, id)? {
        *slot = value;
    }
    Ok(())
}

/// The starting point for atoms the target doesn't have.
fn blank_atom<const N: usize>() -> Atom<N> {
    let mut atom = Atom::query();
    atom.isotope = Attr::Fixed(0);
    for s in &mut atom.states {
        *s = AtomState {
            xyz: None,
            ..AtomState::concrete(0)
        };
    }
    atom
}

fn patched_atom<const N: usize>(
    id: AtomId,
    patch: &Atom<2>,
    current: Option<&Atom<N>>,
) -> Result<Atom<N>, TemplateError> {
    let mut atom = current.cloned().unwrap_or_else(blank_atom);
    apply(
        &mut atom.element,
        &patch.element,
        current.map(|a| &a.element),
        id,
    )?;
    apply(
        &mut atom.isotope,
        &patch.isotope,
        current.map(|a| &a.isotope),
        id,
    )?;
    atom.mark.clone_from(&patch.mark);
    for (side, (state, p)) in atom.states.iter_mut().zip(&patch.states).enumerate() {
        let old = current.map(|a| &a.states[side]);
        apply(&mut state.charge, &p.charge, old.map(|s| &s.charge), id)?;
        apply(&mut state.radical, &p.radical, old.map(|s| &s.radical), id)?;
        apply(&mut state.stereo, &p.stereo, old.map(|s| &s.stereo), id)?;
    }
    Ok(atom)
}

fn patched_bond<const N: usize>(
    (a, b): (AtomId, AtomId),
    patch: &Bond<2>,
    current: Option<&Bond<N>>,
) -> Result<Bond<N>, TemplateError> {
    let mut bond = current.cloned().unwrap_or_else(|| Bond::new(BondOrder::Absent));
    for (side, (state, p)) in bond.states.iter_mut().zip(&patch.states).enumerate() {
        let old = current.map(|b| &b.states[side]);
        apply(&mut state.order, &p.order, old.map(|s| &s.order), a)?;
        apply(&mut state.stereo, &p.stereo, old.map(|s| &s.stereo), a)?;
    }
    trace!(a, b, "patched bond");
    Ok(bond)
}

/// Apply a patch whose atom numbers already refer to the target.
///
/// Patch attributes override the target's, except coordinates and query labels. Conditional
/// values are looked up with the target's current value. All bonds between atoms in both graphs
/// are replaced by the patch's bonds. A molecule takes the patch's first side.
#[instrument(level = "debug", skip_all)]
pub fn patcher<const N: usize>(
    structure: &Container<N>,
    patch: &CgrContainer,
) -> Result<Container<N>, CgrError> {
    let mut out = structure.clone();
    let common = patch
        .atom_ids()
        .filter(|&id| structure.contains(id))
        .collect::<Vec<_>>();
    for (&a, &b) in common.iter().tuple_combinations() {
        if out.has_bond(a, b) {
            out.remove_bond(a, b)?;
        }
    }
    for (id, p) in patch.atoms() {
        let atom = patched_atom(id, p, structure.atom(id))?;
        out.insert_atom(id, atom);
    }
    for (a, b, p) in patch.bonds() {
        let bond = patched_bond((a, b), p, structure.bond(a, b))?;
        if bond.is_empty() {
            trace!(a, b, "bond dropped");
            continue;
        }
        out.set_bond(a, b, bond);
    }
    debug!(
        common = common.len(),
        added = patch.atom_count() - common.len(),
        "patched"
    );
    Ok(out)
}
