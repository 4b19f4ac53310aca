use super::*;
use std::collections::BTreeSet;

impl Container<2> {
    /// Atoms changed by the reaction.
    ///
    /// These are atoms whose charge or radical differs between reagents and products, and the
    /// ends of bonds whose order differs. With `stereo`, changed configurations and wedges count
    /// too.
    pub fn center_atoms(&self, stereo: bool) -> BTreeSet<AtomId> {
        let mut out = BTreeSet::new();
        for (id, atom) in self.atoms() {
            let (r, p) = (atom.reagent(), atom.product());
            if r.charge != p.charge || r.radical != p.radical || (stereo && r.stereo != p.stereo) {
                out.insert(id);
            }
        }
        for (a, b, bond) in self.bonds() {
            let (r, p) = (bond.reagent(), bond.product());
            if r.order != p.order || (stereo && r.stereo != p.stereo) {
                out.insert(a);
                out.insert(b);
            }
        }
        out
    }
}
