//! VF2 matching for undirected graphs.
//!
//! Everything works on compact node indices, and semantic checks are asked about pairs of indices,
//! so callers keep their atom and bond data wherever they like. Subgraph matching is induced: a
//! pair of pattern nodes is adjacent exactly when their images are.

use petgraph::visit::*;
use tracing::instrument;

use self::state::Vf2State;

/// Semantic feasibility of a candidate pair, given compact indices into both graphs
pub trait Semantics {
    fn nodes(&mut self, n0: usize, n1: usize) -> bool;
    fn edges(&mut self, e0: (usize, usize), e1: (usize, usize)) -> bool;
}

/// Only compare structure
#[derive(Debug, Clone, Copy, Default)]
pub struct Structural;
impl Semantics for Structural {
    fn nodes(&mut self, _n0: usize, _n1: usize) -> bool {
        true
    }
    fn edges(&mut self, _e0: (usize, usize), _e1: (usize, usize)) -> bool {
        true
    }
}

/// Graphs that can be matched
pub trait Vf2Graph: NodeCompactIndexable + GetAdjacencyMatrix + IntoNeighbors {}
impl<G: NodeCompactIndexable + GetAdjacencyMatrix + IntoNeighbors> Vf2Graph for G {}

const UNMAPPED: usize = usize::MAX;

mod state {
    use super::*;
    use smallvec::SmallVec;

    /// One side of the search. The graph's structure is copied in, so the state owns everything.
    #[derive(Debug, Clone)]
    pub struct Vf2State {
        neighbors: Vec<SmallVec<usize, 4>>,
        /// Row-major adjacency matrix
        adjacency: Vec<bool>,
        /// The current mapping into the other graph, `UNMAPPED` for no mapping.
        pub mapping: Vec<usize>,
        /// out[i] is non-zero if i is in either M(s) or Tout(s): the generation at which it
        /// became a neighbor of the mapping.
        out: Vec<usize>,
        pub out_size: usize,
        generation: usize,
    }

    impl Vf2State {
        pub fn new<G: Vf2Graph>(graph: G) -> Self {
            let c0 = graph.node_count();
            let matrix = graph.adjacency_matrix();
            let neighbors = (0..c0)
                .map(|i| {
                    graph
                        .neighbors(graph.from_index(i))
                        .map(|x| graph.to_index(x))
                        .collect()
                })
                .collect();
            let mut adjacency = vec![false; c0 * c0];
            for a in 0..c0 {
                for b in 0..c0 {
                    adjacency[a * c0 + b] =
                        graph.is_adjacent(&matrix, graph.from_index(a), graph.from_index(b));
                }
            }
            Vf2State {
                neighbors,
                adjacency,
                mapping: vec![UNMAPPED; c0],
                out: vec![0; c0],
                out_size: 0,
                generation: 0,
            }
        }

        pub fn len(&self) -> usize {
            self.mapping.len()
        }

        /// Return **true** if we have a complete mapping
        pub fn is_complete(&self) -> bool {
            self.generation == self.mapping.len()
        }

        pub fn is_adjacent(&self, a: usize, b: usize) -> bool {
            self.adjacency[a * self.mapping.len() + b]
        }

        pub fn neighbors(&self, n: usize) -> impl Iterator<Item = usize> + '_ {
            self.neighbors[n].iter().copied()
        }

        /// Add mapping **from** <-> **to** to the state.
        pub fn push_mapping(&mut self, from: usize, to: usize) {
            self.generation += 1;
            self.mapping[from] = to;
            for &ix in &self.neighbors[from] {
                if self.out[ix] == 0 {
                    self.out[ix] = self.generation;
                    self.out_size += 1;
                }
            }
        }

        /// Restore the state to before the last added mapping
        pub fn pop_mapping(&mut self, from: usize) {
            self.mapping[from] = UNMAPPED;
            for &ix in &self.neighbors[from] {
                if self.out[ix] == self.generation {
                    self.out[ix] = 0;
                    self.out_size -= 1;
                }
            }
            self.generation -= 1;
        }

        /// Find the next (least) node in the Tout set, at or after `from_index`.
        pub fn next_out_index(&self, from_index: usize) -> Option<usize> {
            (from_index..self.mapping.len())
                .find(|&ix| self.out[ix] > 0 && self.mapping[ix] == UNMAPPED)
        }

        /// Find the next (least) node in the N - M set, at or after `from_index`.
        pub fn next_rest_index(&self, from_index: usize) -> Option<usize> {
            (from_index..self.mapping.len()).find(|&ix| self.mapping[ix] == UNMAPPED)
        }
    }
}

mod matching {
    use super::*;

    #[derive(Copy, Clone, PartialEq, Debug)]
    pub(super) enum OpenList {
        Out,
        Other,
    }

    #[derive(Clone, PartialEq, Debug)]
    pub(super) enum Frame {
        Outer,
        Inner {
            nodes: (usize, usize),
            open_list: OpenList,
        },
        Unwind {
            nodes: (usize, usize),
            open_list: OpenList,
        },
    }

    pub(super) type States = (Vf2State, Vf2State);

    /// Check that every mapped neighbor of `n` maps to a neighbor of `m`.
    fn neighbors_agree(from: &Vf2State, to: &Vf2State, n: usize, m: usize) -> bool {
        from.neighbors(n).all(|neigh| {
            let image = from.mapping[neigh];
            image == UNMAPPED || to.is_adjacent(m, image)
        })
    }

    fn is_feasible<S: Semantics>(st: &States, nodes: (usize, usize), semantics: &mut S) -> bool {
        // syntactic feasibility, in both directions so the match is induced
        if !neighbors_agree(&st.0, &st.1, nodes.0, nodes.1)
            || !neighbors_agree(&st.1, &st.0, nodes.1, nodes.0)
        {
            return false;
        }
        if !semantics.nodes(nodes.0, nodes.1) {
            return false;
        }
        // the mapped edges are the same set from both sides now, so one pass is enough
        st.0.neighbors(nodes.0).all(|neigh| {
            let image = st.0.mapping[neigh];
            image == UNMAPPED || semantics.edges((nodes.0, neigh), (nodes.1, image))
        })
    }

    fn next_candidate(st: &States) -> Option<(usize, usize, OpenList)> {
        let mut from_index = None;
        let mut open_list = OpenList::Out;
        let mut to_index = st.1.next_out_index(0);

        // Try the out list
        if to_index.is_some() {
            from_index = st.0.next_out_index(0);
        }

        // Try the other list -- disconnected graph
        if to_index.is_none() || from_index.is_none() {
            to_index = st.1.next_rest_index(0);
            if to_index.is_some() {
                from_index = st.0.next_rest_index(0);
                open_list = OpenList::Other;
            }
        }
        Some((from_index?, to_index?, open_list))
    }

    /// Find the next node index to try on the target side of the mapping
    fn next_from_ix(st: &States, nx: usize, open_list: OpenList) -> Option<usize> {
        match open_list {
            OpenList::Out => st.1.next_out_index(nx + 1),
            OpenList::Other => st.1.next_rest_index(nx + 1),
        }
    }

    fn pop_state(st: &mut States, nodes: (usize, usize)) {
        st.0.pop_mapping(nodes.0);
        st.1.pop_mapping(nodes.1);
    }

    fn push_state(st: &mut States, nodes: (usize, usize)) {
        st.0.push_mapping(nodes.0, nodes.1);
        st.1.push_mapping(nodes.1, nodes.0);
    }

    /// Resume the depth-first search, returning the next complete mapping.
    #[instrument(level = "trace", skip_all)]
    pub(super) fn isomorphisms<S: Semantics>(
        st: &mut States,
        semantics: &mut S,
        match_subgraph: bool,
        stack: &mut Vec<Frame>,
    ) -> Option<Vec<usize>> {
        let mut result = None;
        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Unwind { nodes, open_list } => {
                    pop_state(st, nodes);
                    if let Some(nx) = next_from_ix(st, nodes.1, open_list) {
                        stack.push(Frame::Inner {
                            nodes: (nodes.0, nx),
                            open_list,
                        });
                    }
                }
                Frame::Outer => {
                    if let Some((nx, mx, open_list)) = next_candidate(st) {
                        stack.push(Frame::Inner {
                            nodes: (nx, mx),
                            open_list,
                        });
                    }
                }
                Frame::Inner { nodes, open_list } => {
                    if is_feasible(st, nodes, semantics) {
                        push_state(st, nodes);
                        if st.0.is_complete() {
                            result = Some(st.0.mapping.clone());
                        }
                        // Check cardinalities of the Tout sets
                        if (!match_subgraph && st.0.out_size == st.1.out_size)
                            || (match_subgraph && st.0.out_size <= st.1.out_size)
                        {
                            stack.push(Frame::Unwind { nodes, open_list });
                            stack.push(Frame::Outer);
                            continue;
                        }
                        pop_state(st, nodes);
                    }
                    if let Some(nx) = next_from_ix(st, nodes.1, open_list) {
                        stack.push(Frame::Inner {
                            nodes: (nodes.0, nx),
                            open_list,
                        });
                    }
                }
            }
            if result.is_some() {
                return result;
            }
        }
        result
    }
}

/// A resumable VF2 search, yielding mappings from `g0` indices to `g1` indices.
///
/// Both graphs are copied in, so the search doesn't borrow them. An empty `g0` has exactly one
/// (empty) mapping.
#[derive(Debug, Clone)]
pub struct GraphMatcher<S> {
    st: (Vf2State, Vf2State),
    semantics: S,
    match_subgraph: bool,
    stack: Vec<matching::Frame>,
    done: bool,
}

impl<S: Semantics> GraphMatcher<S> {
    pub fn new<G0: Vf2Graph, G1: Vf2Graph>(
        g0: G0,
        g1: G1,
        semantics: S,
        match_subgraph: bool,
    ) -> Self {
        let st = (Vf2State::new(g0), Vf2State::new(g1));
        let done = if match_subgraph {
            st.0.len() > st.1.len()
        } else {
            st.0.len() != st.1.len()
        };
        Self {
            st,
            semantics,
            match_subgraph,
            stack: vec![matching::Frame::Outer],
            done,
        }
    }
    pub fn semantics(&self) -> &S {
        &self.semantics
    }
}

impl<S: Semantics> Iterator for GraphMatcher<S> {
    type Item = Vec<usize>;

    #[instrument(level = "trace", skip_all, name = "ism_next")]
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.st.0.len() == 0 {
            self.done = true;
            return Some(Vec::new());
        }
        let found = matching::isomorphisms(
            &mut self.st,
            &mut self.semantics,
            self.match_subgraph,
            &mut self.stack,
        );
        if found.is_none() {
            self.done = true;
        }
        found
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        // ordered picks of pattern-many target nodes, as long as it fits
        let (n, m) = (self.st.0.len(), self.st.1.len());
        let bound = (m.saturating_sub(n) + 1..=m).try_fold(1usize, |acc, k| acc.checked_mul(k));
        (0, bound)
    }
}

/// Induced subgraph isomorphisms of `g0` in `g1`.
pub fn subgraph_isomorphisms<G0: Vf2Graph, G1: Vf2Graph, S: Semantics>(
    g0: G0,
    g1: G1,
    semantics: S,
) -> GraphMatcher<S> {
    GraphMatcher::new(g0, g1, semantics, true)
}

/// Return `true` if the graphs `g0` and `g1` are isomorphic.
pub fn is_isomorphic_matching<G0: Vf2Graph, G1: Vf2Graph, S: Semantics>(
    g0: G0,
    g1: G1,
    semantics: S,
) -> bool {
    GraphMatcher::new(g0, g1, semantics, false)
        .next()
        .is_some()
}
