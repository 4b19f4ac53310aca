//! Template matching and graph rewriting.
//!
//! A [`Reactor`] holds the matching configuration. Templates are prepared once with
//! [`prepare_templates`], searched in a target with [`Reactor::search`], and each [`Match`]'s patch
//! can be applied with [`patcher`].

use crate::container::{CgrContainer, Container};
use crate::core::AtomId;
use crate::error::CgrError;
use std::collections::BTreeMap;

mod clone;
mod config;
mod ids;
mod matcher;
mod patch;
mod search;
mod template;

pub use config::ReactorConfig;
pub use ids::{remap_into, IdAllocator};
pub use matcher::Matcher;
pub use patch::patcher;
pub use search::{Match, TemplateSearch};
pub use template::{prepare_templates, RawTemplate, Template, TEMPLATE_ID_BASE};

/// Atom numbers of one graph to atom numbers of another
pub type Mapping = BTreeMap<AtomId, AtomId>;

/// Matching configuration for searches and substituent cloning
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Reactor {
    config: ReactorConfig,
}

impl Reactor {
    pub fn new(config: ReactorConfig) -> Self {
        Self { config }
    }
    pub fn config(&self) -> ReactorConfig {
        self.config
    }

    /// Enumerate matches of `pattern` in `target`.
    ///
    /// A reaction pattern against a reaction target compares reagent and product values together,
    /// anything else compares the first state only.
    pub fn matcher<'a, const P: usize, const T: usize>(
        &self,
        pattern: &'a Container<P>,
        target: &'a Container<T>,
    ) -> Matcher<'a, P, T> {
        Matcher::new(pattern, target, matcher::Rule::Query(self.config))
    }

    /// Search every template in `target`, in order.
    ///
    /// With `skip_intersection`, a match using any atom of an earlier yielded match is dropped.
    pub fn search<'a, const N: usize>(
        &self,
        templates: &'a [Template],
        target: &'a Container<N>,
        skip_intersection: bool,
    ) -> TemplateSearch<'a, N> {
        TemplateSearch::new(*self, templates, target, skip_intersection)
    }

    pub fn prepare_templates(raw: &[RawTemplate]) -> Result<Vec<Template>, CgrError> {
        prepare_templates(raw)
    }

    pub fn patcher<const N: usize>(
        structure: &Container<N>,
        patch: &CgrContainer,
    ) -> Result<Container<N>, CgrError> {
        patcher(structure, patch)
    }
}
