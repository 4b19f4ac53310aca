use crate::container::{CgrContainer, Meta};
use crate::core::*;
use crate::error::{CgrError, DataError, TemplateError};
use std::collections::BTreeMap;
use tracing::*;

/// Atom numbers of prepared templates start here
pub const TEMPLATE_ID_BASE: AtomId = 1000;

/// A template as read: separate reagent and product graphs
#[derive(Debug, Clone, Default)]
pub struct RawTemplate {
    pub reagents: Vec<CgrContainer>,
    pub products: Vec<CgrContainer>,
    pub meta: Meta,
}

/// A template ready for searching.
///
/// The pattern is matched against targets, the patch describes what matched atoms become. Atoms
/// in both share their number.
#[derive(Debug, Clone)]
pub struct Template {
    pub pattern: CgrContainer,
    pub patch: CgrContainer,
    pub meta: Meta,
}

/// Turn a variable patch value into one keyed by the pattern's values, pairing them by position.
fn conditional<V: Ord + Clone>(
    patch: &mut Attr<V>,
    pattern: &Attr<V>,
    error: TemplateError,
) -> Result<(), TemplateError> {
    let Attr::OneOf(values) = patch else {
        return Ok(());
    };
    let Attr::OneOf(keys) = pattern else {
        return Err(error);
    };
    *patch = Attr::Conditional(keys.iter().cloned().zip(values.iter().cloned()).collect());
    Ok(())
}

fn atom_is_variable<const N: usize>(atom: &Atom<N>) -> bool {
    atom.element.is_variable()
        || atom.isotope.is_variable()
        || atom.states.iter().any(|s| {
            s.charge.is_variable()
                || s.radical.is_variable()
                || s.stereo.is_variable()
                || s.hybridization.is_variable()
                || s.neighbors.is_variable()
        })
}

fn union_all(graphs: &[CgrContainer]) -> Result<CgrContainer, CgrError> {
    let mut out = CgrContainer::new();
    for g in graphs {
        out = out.union(g)?;
    }
    Ok(out)
}

impl Template {
    /// Build a template from reagent and product graphs.
    ///
    /// New atoms and bonds must not be variable. Variable values of common atoms and bonds become
    /// conditional on the pattern's values, and coordinates are dropped from the patch. Both graphs
    /// are moved to numbers from [`TEMPLATE_ID_BASE`].
    #[instrument(level = "debug", skip_all)]
    pub fn prepare(raw: &RawTemplate) -> Result<Self, CgrError> {
        let pattern = union_all(&raw.reagents)?;
        let mut patch = union_all(&raw.products)?;
        let ids = patch.atom_ids().collect::<Vec<_>>();
        for id in ids {
            let Some(atom) = patch.atom_mut(id) else {
                continue;
            };
            let Some(base) = pattern.atom(id) else {
                if atom_is_variable(atom) {
                    return Err(TemplateError::VariableNewAtom(id).into());
                }
                continue;
            };
            let err = TemplateError::VariablePatch(id);
            conditional(&mut atom.element, &base.element, err)?;
            conditional(&mut atom.isotope, &base.isotope, err)?;
            for (s, old) in atom.states.iter_mut().zip(&base.states) {
                conditional(&mut s.charge, &old.charge, err)?;
                conditional(&mut s.radical, &old.radical, err)?;
                conditional(&mut s.stereo, &old.stereo, err)?;
                conditional(&mut s.hybridization, &old.hybridization, err)?;
                conditional(&mut s.neighbors, &old.neighbors, err)?;
                s.xyz = None;
            }
        }
        let bonds = patch
            .bonds()
            .map(|(a, b, _)| (a, b))
            .collect::<Vec<_>>();
        for (a, b) in bonds {
            let base = pattern.bond(a, b);
            let Some(bond) = patch.bond_mut(a, b) else {
                continue;
            };
            let Some(base) = base else {
                let variable = bond
                    .states
                    .iter()
                    .any(|s| s.order.is_variable() || s.stereo.is_variable());
                if variable {
                    return Err(TemplateError::VariableNewBond(a, b).into());
                }
                continue;
            };
            let err = TemplateError::VariablePatch(a);
            for (s, old) in bond.states.iter_mut().zip(&base.states) {
                conditional(&mut s.order, &old.order, err)?;
                conditional(&mut s.stereo, &old.stereo, err)?;
            }
        }
        let shift = |g: &CgrContainer| -> Result<CgrContainer, DataError> {
            let mapping = g
                .atom_ids()
                .map(|id| {
                    id.checked_add(TEMPLATE_ID_BASE)
                        .map(|to| (id, to))
                        .ok_or(DataError::IdOverflow)
                })
                .collect::<Result<BTreeMap<_, _>, _>>()?;
            g.remap(&mapping)
        };
        debug!(
            pattern = pattern.atom_count(),
            patch = patch.atom_count(),
            "prepared template"
        );
        Ok(Self {
            pattern: shift(&pattern)?,
            patch: shift(&patch)?,
            meta: raw.meta.clone(),
        })
    }
}

/// Prepare several templates, stopping at the first invalid one.
pub fn prepare_templates(raw: &[RawTemplate]) -> Result<Vec<Template>, CgrError> {
    raw.iter().map(Template::prepare).collect()
}
