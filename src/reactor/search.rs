use super::ids::remap_into;
use super::matcher::{Matcher, Rule};
use super::{Mapping, Reactor, Template};
use crate::container::{CgrContainer, Container, Meta};
use crate::core::AtomId;
use ahash::AHashSet;
use tracing::*;

/// One occurrence of a template in a target
#[derive(Debug, Clone)]
pub struct Match {
    /// Pattern atoms to target atoms
    pub mapping: Mapping,
    /// The template's patch, renumbered into the target: common atoms take their target number and
    /// new atoms get numbers the target doesn't use
    pub patch: CgrContainer,
    pub meta: Meta,
}

/// Lazily searches templates in order, yielding their matches in discovery order.
///
/// Holds a borrow of the target, so it can't change while matches are produced.
pub struct TemplateSearch<'a, const N: usize> {
    reactor: Reactor,
    templates: std::iter::Enumerate<std::slice::Iter<'a, Template>>,
    current: Option<(usize, &'a Template, Matcher<'a, 2, N>)>,
    target: &'a Container<N>,
    /// Target atoms used by earlier matches, if overlaps are suppressed
    claimed: Option<AHashSet<AtomId>>,
}

impl<'a, const N: usize> TemplateSearch<'a, N> {
    pub(crate) fn new(
        reactor: Reactor,
        templates: &'a [Template],
        target: &'a Container<N>,
        skip_intersection: bool,
    ) -> Self {
        Self {
            reactor,
            templates: templates.iter().enumerate(),
            current: None,
            target,
            claimed: skip_intersection.then(AHashSet::new),
        }
    }
}

impl<const N: usize> Iterator for TemplateSearch<'_, N> {
    type Item = Match;

    #[instrument(level = "trace", skip_all, name = "template_search")]
    fn next(&mut self) -> Option<Match> {
        loop {
            let Some((index, template, matcher)) = &mut self.current else {
                let (index, template) = self.templates.next()?;
                let matcher = Matcher::new(
                    &template.pattern,
                    self.target,
                    Rule::Query(self.reactor.config()),
                );
                self.current = Some((index, template, matcher));
                continue;
            };
            let Some(mapping) = matcher.next() else {
                trace!(template = *index, "template exhausted");
                self.current = None;
                continue;
            };
            if let Some(claimed) = &self.claimed {
                if mapping.values().any(|id| claimed.contains(id)) {
                    continue;
                }
            }
            match remap_into(&template.patch, self.target, &mapping) {
                Ok((patch, _)) => {
                    if let Some(claimed) = &mut self.claimed {
                        claimed.extend(mapping.values().copied());
                    }
                    debug!(template = *index, atoms = mapping.len(), "found match");
                    return Some(Match {
                        mapping,
                        patch,
                        meta: template.meta.clone(),
                    });
                }
                Err(error) => {
                    debug!(template = *index, %error, "patch doesn't fit the target");
                }
            }
        }
    }
}
