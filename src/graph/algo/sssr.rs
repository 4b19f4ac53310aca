//! Smallest set of smallest rings, from a path-included distance matrix.
//!
//! For every pair of nodes we collect the shortest paths between them and the paths one bond
//! longer. Two shortest paths, or a shortest path and a longer one, that only share their ends
//! close a ring. Pairs are tried smallest ring first until the cyclomatic number is reached.

use super::connect::components;
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use petgraph::visit::*;
use std::collections::VecDeque;
use std::hash::Hash;
use tracing::*;

/// The number of independent rings: E - V + C.
pub fn ring_count<G>(graph: G) -> usize
where
    G: IntoNodeIdentifiers + IntoNeighbors,
    G::NodeId: Ord,
{
    let nodes = graph.node_identifiers().count();
    let edges = graph
        .node_identifiers()
        .map(|n| graph.neighbors(n).count())
        .sum::<usize>()
        / 2;
    (edges + components(graph).len()).saturating_sub(nodes)
}

/// Find the SSSR. Returns an empty set for acyclic graphs.
pub fn find_sssr<G>(graph: G) -> Vec<Vec<G::NodeId>>
where
    G: IntoNodeIdentifiers + IntoNeighbors,
    G::NodeId: Ord + Hash,
{
    RingsIterator::new(graph).collect()
}

/// Ring closures available for one pair of nodes
#[derive(Debug, Clone)]
struct Candidate<N> {
    score: usize,
    pair: (N, N),
    shortest: Vec<Vec<N>>,
    longer: Vec<Vec<N>>,
}
impl<N: Copy + PartialEq> Candidate<N> {
    /// Join two paths between the same ends into a ring, if they share nothing else.
    fn join(a: &[N], b: &[N]) -> Option<Vec<N>> {
        if a.iter().filter(|n| b.contains(n)).count() != 2 {
            return None;
        }
        let inner = b.get(1..b.len() - 1)?;
        Some(a.iter().chain(inner.iter().rev()).copied().collect())
    }

    fn rings(&self) -> Vec<Vec<N>> {
        if self.score % 2 == 1 {
            let Some(first) = self.shortest.first() else {
                return Vec::new();
            };
            self.longer
                .iter()
                .filter_map(|p| Self::join(first, p))
                .collect()
        } else {
            self.shortest
                .windows(2)
                .filter_map(|w| Self::join(&w[0], &w[1]))
                .collect()
        }
    }
}

fn bfs_distances<G>(graph: G, start: G::NodeId) -> AHashMap<G::NodeId, usize>
where
    G: IntoNeighbors,
    G::NodeId: Hash + Eq,
{
    let mut dist = AHashMap::new();
    dist.insert(start, 0);
    let mut queue = VecDeque::from([start]);
    while let Some(n) = queue.pop_front() {
        let d = dist[&n];
        for next in graph.neighbors(n) {
            if !dist.contains_key(&next) {
                dist.insert(next, d + 1);
                queue.push_back(next);
            }
        }
    }
    dist
}

/// Depth-first enumeration of simple paths to `to` of at most `limit` bonds, in lexicographic
/// order. `dist` holds the distances to `to`, which prune the search.
fn walk<G>(
    graph: G,
    path: &mut Vec<G::NodeId>,
    to: G::NodeId,
    limit: usize,
    dist: &AHashMap<G::NodeId, usize>,
    out: &mut Vec<Vec<G::NodeId>>,
) where
    G: IntoNeighbors,
    G::NodeId: Ord + Hash,
{
    let Some(&last) = path.last() else {
        return;
    };
    if last == to {
        out.push(path.clone());
        return;
    }
    for next in graph.neighbors(last).sorted() {
        if path.contains(&next) {
            continue;
        }
        let Some(&rest) = dist.get(&next) else {
            continue;
        };
        if path.len() + rest > limit {
            continue;
        }
        path.push(next);
        walk(graph, path, to, limit, dist, out);
        path.pop();
    }
}

#[instrument(level = "trace", skip_all)]
fn collect_candidates<G>(graph: G) -> Vec<Candidate<G::NodeId>>
where
    G: IntoNodeIdentifiers + IntoNeighbors,
    G::NodeId: Ord + Hash,
{
    let nodes = graph.node_identifiers().sorted().collect_vec();
    let distances = nodes
        .iter()
        .map(|&n| (n, bfs_distances(graph, n)))
        .collect::<AHashMap<_, _>>();
    let mut out = Vec::new();
    for (&i, &j) in nodes.iter().tuple_combinations() {
        let to_j = &distances[&j];
        let Some(&d) = to_j.get(&i) else {
            continue;
        };
        let mut paths = Vec::new();
        walk(graph, &mut vec![i], j, d + 1, to_j, &mut paths);
        let (shortest, longer): (Vec<_>, Vec<_>) =
            paths.into_iter().partition(|p| p.len() == d + 1);
        if shortest.len() < 2 && longer.is_empty() {
            continue;
        }
        out.push(Candidate {
            score: 2 * d + usize::from(!longer.is_empty()),
            pair: (i, j),
            shortest,
            longer,
        });
    }
    out.sort_by(|a, b| a.score.cmp(&b.score).then_with(|| a.pair.cmp(&b.pair)));
    out
}

/// Lazily closes rings, smallest candidates first, until there are as many as the graph has.
#[derive(Debug, Clone)]
pub struct RingsIterator<N> {
    candidates: std::vec::IntoIter<Candidate<N>>,
    pending: VecDeque<Vec<N>>,
    seen: AHashSet<Vec<N>>,
    remaining: usize,
}
impl<N: Copy + Ord + Hash> RingsIterator<N> {
    pub fn new<G>(graph: G) -> Self
    where
        G: IntoNodeIdentifiers<NodeId = N> + IntoNeighbors,
    {
        let remaining = ring_count(graph);
        debug!(remaining, "searching rings");
        let candidates = if remaining == 0 {
            Vec::new()
        } else {
            collect_candidates(graph)
        };
        Self {
            candidates: candidates.into_iter(),
            pending: VecDeque::new(),
            seen: AHashSet::new(),
            remaining,
        }
    }
}
impl<N: Copy + Ord + Hash> Iterator for RingsIterator<N> {
    type Item = Vec<N>;

    fn next(&mut self) -> Option<Vec<N>> {
        while self.remaining > 0 {
            let Some(ring) = self.pending.pop_front() else {
                let candidate = self.candidates.next()?;
                trace!(score = candidate.score, "closing rings");
                self.pending.extend(candidate.rings());
                continue;
            };
            let key = ring.iter().copied().sorted().collect_vec();
            if self.seen.insert(key) {
                self.remaining -= 1;
                return Some(ring);
            }
        }
        None
    }
}
