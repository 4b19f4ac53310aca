//! This file is pretty much a periodic table, plus the valence rules used for validation

/// Element symbols, indexed by atomic number. Index 0 is unused.
pub static SYMBOLS: &[&str] = &[
    "",
    "H",  "He", "Li", "Be", "B",  "C",  "N",  "O",  "F",  "Ne",
    "Na", "Mg", "Al", "Si", "P",  "S",  "Cl", "Ar", "K",  "Ca",
    "Sc", "Ti", "V",  "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn",
    "Ga", "Ge", "As", "Se", "Br", "Kr", "Rb", "Sr", "Y",  "Zr",
    "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn",
    "Sb", "Te", "I",  "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd",
    "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb",
    "Lu", "Hf", "Ta", "W",  "Re", "Os", "Ir", "Pt", "Au", "Hg",
    "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th",
    "Pa", "U",  "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm",
    "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds",
    "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

/// Look up the atomic number of a symbol. Matching is exact, so `"CL"` isn't chlorine.
pub fn protons_of(symbol: &str) -> Option<u8> {
    SYMBOLS
        .iter()
        .skip(1)
        .position(|&s| s == symbol)
        .map(|n| n as u8 + 1)
}

/// Allowed valences for one charge state of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValenceRule {
    pub charge: i8,
    pub valences: &'static [u8],
}
const fn rule(charge: i8, valences: &'static [u8]) -> ValenceRule {
    ValenceRule { charge, valences }
}

const HALOGEN: &[ValenceRule] = &[rule(0, &[1, 3, 5, 7]), rule(-1, &[0]), rule(1, &[2])];
const ALKALI: &[ValenceRule] = &[rule(0, &[1]), rule(1, &[0])];
const ALKALINE_EARTH: &[ValenceRule] = &[rule(0, &[2]), rule(2, &[0])];

/// Valence rules, or `None` for elements the table doesn't constrain.
pub fn valence_rules(protons: u8) -> Option<&'static [ValenceRule]> {
    Some(match protons {
        1 => const { &[rule(0, &[1]), rule(1, &[0]), rule(-1, &[0])] },
        3 | 11 | 19 | 37 | 55 => ALKALI,
        4 | 12 | 20 | 38 | 56 => ALKALINE_EARTH,
        5 => const { &[rule(0, &[3]), rule(-1, &[4])] },
        6 => const { &[rule(0, &[4]), rule(1, &[3]), rule(-1, &[3])] },
        7 => const { &[rule(0, &[3]), rule(1, &[4]), rule(-1, &[2])] },
        8 => const { &[rule(0, &[2]), rule(1, &[3]), rule(-1, &[1])] },
        9 => const { &[rule(0, &[1]), rule(-1, &[0])] },
        13 => const { &[rule(0, &[3]), rule(3, &[0]), rule(-1, &[4])] },
        14 => const { &[rule(0, &[4])] },
        15 => const { &[rule(0, &[3, 5]), rule(1, &[4]), rule(-1, &[2])] },
        16 => const { &[rule(0, &[2, 4, 6]), rule(1, &[3]), rule(-1, &[1])] },
        17 | 35 | 53 => HALOGEN,
        33 => const { &[rule(0, &[3, 5])] },
        34 => const { &[rule(0, &[2, 4, 6])] },
        _ => return None,
    })
}

/// Charges accepted for elements without valence rules.
pub const FREE_CHARGE: std::ops::RangeInclusive<i8> = -4..=8;

/// Smallest allowed valence at or above `used`, if the table knows the element.
///
/// The outer `None` means the element isn't constrained, the inner one that nothing fits.
pub fn fitting_valence(protons: u8, charge: i8, used: u8) -> Option<Option<u8>> {
    let rules = valence_rules(protons)?;
    Some(
        rules
            .iter()
            .filter(|r| r.charge == charge)
            .flat_map(|r| r.valences.iter().copied())
            .filter(|&v| v >= used)
            .min(),
    )
}
