use super::*;

impl<const N: usize> Container<N> {
    /// Hybridization and heavy-neighbor count of every atom, per side.
    ///
    /// Computed on first use and cached until the graph changes.
    pub fn query_marks(&self) -> &BTreeMap<AtomId, QueryMarks<N>> {
        self.marks.get_or_init(|| self.compute_marks())
    }

    /// Drop the cached marks and compute them again.
    pub fn reset_query_marks(&mut self) -> &BTreeMap<AtomId, QueryMarks<N>> {
        self.flush_cache();
        self.query_marks()
    }

    pub fn marks_of(&self, id: AtomId) -> Option<&QueryMarks<N>> {
        self.query_marks().get(&id)
    }

    #[instrument(level = "trace", skip_all)]
    fn compute_marks(&self) -> BTreeMap<AtomId, QueryMarks<N>> {
        self.atoms
            .keys()
            .map(|&id| (id, std::array::from_fn(|side| self.side_marks(id, side))))
            .collect()
    }

    fn side_marks(&self, id: AtomId, side: usize) -> SideMarks {
        let mut hybridization = Hybridization::Sp3;
        let mut neighbors = 0u8;
        for (n, bond) in self.graph.edges(id).map(|(_, n, b)| (n, b)) {
            let Some(order) = bond.order(side).filter(|o| o.is_present()) else {
                continue;
            };
            if !self.atoms.get(&n).is_some_and(Atom::is_hydrogen) {
                neighbors = neighbors.saturating_add(1);
            }
            hybridization = match (hybridization, order) {
                (Hybridization::Sp | Hybridization::Aromatic, _) => hybridization,
                (_, BondOrder::Aromatic) => Hybridization::Aromatic,
                (_, BondOrder::Triple) => Hybridization::Sp,
                (Hybridization::Sp2, BondOrder::Double) => Hybridization::Sp,
                (_, BondOrder::Double) => Hybridization::Sp2,
                _ => hybridization,
            };
        }
        SideMarks::new()
            .with_hybridization(hybridization)
            .with_neighbors(neighbors.min(63))
    }

    /// The hybridization of an atom across all sides.
    pub fn hybridization(&self, id: AtomId) -> Option<Combined<Hybridization>> {
        let marks = self.marks_of(id)?;
        Combined::of(&marks.map(|m| m.hybridization()))
    }

    /// The heavy-neighbor count of an atom across all sides.
    pub fn heavy_neighbors(&self, id: AtomId) -> Option<Combined<u8>> {
        let marks = self.marks_of(id)?;
        Combined::of(&marks.map(|m| m.neighbors()))
    }
}
