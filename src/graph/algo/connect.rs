use petgraph::visit::*;
use smallvec::{smallvec, SmallVec};
use std::collections::BTreeSet;

/// Iterate over the connected components of a graph, returning their nodes.
///
/// Components come out in order of their smallest node.
#[derive(Debug, Clone)]
pub struct ConnectedGraphIter<N> {
    pub full: BTreeSet<N>,
    pub seen: BTreeSet<N>,
}

impl<N: Copy + Ord> ConnectedGraphIter<N> {
    pub fn new<G: IntoNodeIdentifiers<NodeId = N>>(graph: G) -> Self {
        Self {
            full: graph.node_identifiers().collect(),
            seen: BTreeSet::new(),
        }
    }
}

impl<G: IntoNeighbors<NodeId = N>, N: Copy + Ord> Walker<G> for ConnectedGraphIter<N> {
    type Item = BTreeSet<N>;
    fn walk_next(&mut self, graph: G) -> Option<BTreeSet<N>> {
        let start = *self.full.difference(&self.seen).next()?;
        let mut stack: SmallVec<N, 8> = smallvec![start];
        let mut out = BTreeSet::new();
        while let Some(id) = stack.pop() {
            if !self.seen.insert(id) {
                continue;
            }
            out.insert(id);
            stack.extend(
                graph
                    .neighbors(id)
                    .filter(|id| self.full.contains(id) && !self.seen.contains(id)),
            )
        }
        Some(out)
    }
}

/// Collect the connected components of a graph.
pub fn components<G: IntoNodeIdentifiers + IntoNeighbors>(graph: G) -> Vec<BTreeSet<G::NodeId>>
where
    G::NodeId: Ord,
{
    ConnectedGraphIter::new(graph).iter(graph).collect()
}
