use super::*;
use crate::error::{CgrError, StereoError};

const FLAT: f64 = 1e-9;

impl<const N: usize> Container<N> {
    /// Perceive tetrahedral stereo from a wedge drawn on the bond `center`-`neighbor`.
    ///
    /// `wedges` gives the mark for each side, sides with `Wedge::None` are left alone. The
    /// configuration comes from the 2D layout: the wedged neighbor is lifted out of the plane, and
    /// an implicit hydrogen is placed opposite the explicit neighbors. On success, the center gets
    /// a chirality and the bond keeps the wedge. Nothing changes if any side fails.
    #[instrument(level = "debug", skip(self))]
    pub fn add_stereo(
        &mut self,
        center: AtomId,
        neighbor: AtomId,
        wedges: [Wedge; N],
    ) -> Result<(), CgrError> {
        if wedges.iter().all(|&w| w == Wedge::None) {
            return Err(StereoError::NoMarks.into());
        }
        let atom = self
            .atoms
            .get(&center)
            .ok_or(DataError::AtomNotFound(center))?;
        if !self.graph.contains_edge(center, neighbor) {
            return Err(DataError::BondNotFound(center, neighbor).into());
        }
        if atom
            .states
            .iter()
            .any(|s| s.stereo.fixed().is_some_and(|c| c.is_chiral()))
        {
            return Err(StereoError::AlreadySet(center).into());
        }
        let mut perceived = Vec::new();
        for (side, &wedge) in wedges.iter().enumerate() {
            if wedge == Wedge::None {
                continue;
            }
            let chirality = self.perceive(center, neighbor, side, wedge)?;
            trace!(side, ?chirality, "perceived");
            perceived.push((side, wedge, chirality));
        }
        for (side, wedge, chirality) in perceived {
            if let Some(atom) = self.atoms.get_mut(&center) {
                atom.states[side].stereo = Attr::Fixed(chirality);
            }
            if let Some(bond) = self.graph.edge_weight_mut(center, neighbor) {
                bond.states[side].stereo = Attr::Fixed(wedge);
            }
        }
        self.flush_cache();
        Ok(())
    }

    fn perceive(
        &self,
        center: AtomId,
        wedged: AtomId,
        side: usize,
        wedge: Wedge,
    ) -> Result<Chirality, StereoError> {
        let xyz = |id: AtomId| {
            self.atoms
                .get(&id)
                .and_then(|a| a.states[side].xyz)
                .unwrap_or_default()
        };
        let neighbors = self
            .bonds_of(center)
            .filter(|(_, b)| b.order(side).is_some_and(BondOrder::is_present))
            .map(|(n, _)| n)
            .collect::<Vec<_>>();
        let origin = xyz(center);
        if origin.z != 0.0 || neighbors.iter().any(|&n| xyz(n).z != 0.0) {
            return Err(StereoError::Has3d(center));
        }
        let implicit = self.implicit_on_side(center, side, &[]);
        let explicit_h = neighbors
            .iter()
            .filter(|&&n| self.atoms.get(&n).is_some_and(Atom::is_hydrogen))
            .count();
        if implicit as usize + explicit_h > 1 {
            return Err(StereoError::TooManyHydrogens(center));
        }
        if implicit as usize + neighbors.len() != 4 {
            return Err(StereoError::Unsupported(center));
        }
        let mut points = neighbors
            .iter()
            .map(|&n| {
                let mut p = xyz(n) - origin;
                if n == wedged {
                    p.z = wedge.lift();
                }
                p
            })
            .collect::<Vec<_>>();
        if implicit == 1 {
            let (x, y) = points.iter().fold((0.0, 0.0), |(x, y), p| {
                let len = p.x.hypot(p.y);
                if len < FLAT {
                    (x, y)
                } else {
                    (x + p.x / len, y + p.y / len)
                }
            });
            points.push(Point3::new(-x, -y, 0.0));
        }
        let [a, b, c, d] = points[..] else {
            return Err(StereoError::Unsupported(center));
        };
        let volume = (b - a).dot(&(c - a).cross(&(d - a)));
        if volume.abs() < FLAT {
            return Err(StereoError::Unsupported(center));
        }
        Ok(if volume > 0.0 {
            Chirality::Ccw
        } else {
            Chirality::Cw
        })
    }
}
