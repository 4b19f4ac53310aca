//! Atoms and bonds of molecule and reaction graphs
// Every attribute a pattern can constrain is an `Attr`, concrete graphs only hold `Fixed` values.

use crate::atom_info::{protons_of, SYMBOLS};
use crate::error::DataError;
use c_enum::*;
use modular_bitfield::prelude::*;
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::ops::Sub;
use std::str::FromStr;

/// Map number of an atom, unique within its graph
pub type AtomId = u32;

/// Index of the reagent state in `states`
pub const REAGENT: usize = 0;
/// Index of the product state in `states`, only present on reaction graphs
pub const PRODUCT: usize = 1;

/// A chemical element, stored as its atomic number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Element(u8);
impl Element {
    pub const H: Self = Self(1);
    pub const C: Self = Self(6);
    pub const N: Self = Self(7);
    pub const O: Self = Self(8);
    pub const F: Self = Self(9);
    pub const CL: Self = Self(17);
    pub const BR: Self = Self(35);

    pub fn from_protons(protons: u8) -> Option<Self> {
        (protons != 0 && (protons as usize) < SYMBOLS.len()).then_some(Self(protons))
    }
    pub fn protons(self) -> u8 {
        self.0
    }
    pub fn symbol(self) -> &'static str {
        SYMBOLS[self.0 as usize]
    }
}
impl FromStr for Element {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, DataError> {
        protons_of(s)
            .map(Self)
            .ok_or_else(|| DataError::UnknownElement(s.to_string()))
    }
}
impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The value of a matchable attribute.
///
/// Concrete molecules only use `Fixed`. Patterns may leave an attribute unset (`Any`) or allow
/// several values (`OneOf`), and patches can impose a value depending on what the pattern
/// matched (`Conditional`, keyed by the matched value).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attr<T> {
    Any,
    Fixed(T),
    OneOf(Vec<T>),
    Conditional(BTreeMap<T, T>),
}
impl<T> Default for Attr<T> {
    fn default() -> Self {
        Self::Any
    }
}
impl<T> From<T> for Attr<T> {
    fn from(value: T) -> Self {
        Self::Fixed(value)
    }
}
impl<T> Attr<T> {
    pub fn fixed(&self) -> Option<&T> {
        if let Self::Fixed(v) = self {
            Some(v)
        } else {
            None
        }
    }
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
    pub fn is_variable(&self) -> bool {
        matches!(self, Self::OneOf(_))
    }
}
impl<T: PartialEq> Attr<T> {
    /// Check if a concrete value satisfies this attribute when used in a pattern.
    pub fn accepts(&self, value: &T) -> bool {
        match self {
            Self::Any => true,
            Self::Fixed(v) => v == value,
            Self::OneOf(vs) => vs.contains(value),
            Self::Conditional(map) => map.iter().any(|(k, _)| k == value),
        }
    }
}

c_enum! {
    /// Bond order on one side of a bond
    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub enum BondOrder: u8 {
        /// No bond on this side
        Absent,
        Single,
        Double,
        Triple,
        Aromatic,
        /// Query bond, matches anything when used in a pattern
        Any,
    }
}
impl BondOrder {
    pub fn is_valid(self) -> bool {
        matches!(
            self,
            Self::Absent | Self::Single | Self::Double | Self::Triple | Self::Aromatic | Self::Any
        )
    }
    pub fn is_present(self) -> bool {
        self != Self::Absent
    }
    /// Bond valence in half-bond units, so aromatic bonds stay integral.
    pub fn half_units(self) -> u8 {
        match self {
            Self::Single | Self::Any => 2,
            Self::Double => 4,
            Self::Triple => 6,
            Self::Aromatic => 3,
            _ => 0,
        }
    }
    pub fn as_static_str(self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Single => "single",
            Self::Double => "double",
            Self::Triple => "triple",
            Self::Aromatic => "aromatic",
            Self::Any => "any",
            _ => "invalid",
        }
    }
}
impl Display for BondOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_static_str())
    }
}

c_enum! {
    /// Radical state of an atom, numbered like the MDL radical codes
    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub enum Radical: u8 {
        None,
        /// Divalent, singlet
        Singlet,
        /// Monovalent
        Doublet,
        /// Divalent, triplet
        Triplet,
    }
}
impl Radical {
    pub fn is_valid(self) -> bool {
        matches!(
            self,
            Self::None | Self::Singlet | Self::Doublet | Self::Triplet
        )
    }
    /// Number of bonding positions taken by unpaired electrons.
    pub fn electrons(self) -> u8 {
        match self {
            Self::Doublet => 1,
            Self::Singlet | Self::Triplet => 2,
            _ => 0,
        }
    }
}

c_enum! {
    /// Tetrahedral configuration, looking down from the lowest-numbered neighbor
    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[repr(transparent)]
    pub enum Chirality: u8 {
        None,
        Ccw,
        Cw,
    }
}
impl Chirality {
    pub fn is_chiral(self) -> bool {
        self != Self::None
    }
}

c_enum! {
    /// Wedge drawn on a bond, pointing away from the stereocenter
    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub enum Wedge: u8 {
        None,
        Up,
        Down,
    }
}
impl Wedge {
    /// Height given to the wedged neighbor when perceiving the configuration.
    pub fn lift(self) -> f64 {
        match self {
            Self::Up => 1.0,
            Self::Down => -1.0,
            _ => 0.0,
        }
    }
}

/// Hybridization class used by query marks
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, BitfieldSpecifier)]
pub enum Hybridization {
    #[default]
    Sp3,
    Sp2,
    Sp,
    Aromatic,
}
impl Hybridization {
    /// The conventional 1 (sp3) to 4 (aromatic) code.
    pub fn code(self) -> u8 {
        self as u8 + 1
    }
}

/// Query marks of one side of an atom
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideMarks {
    pub hybridization: Hybridization,
    /// Heavy (non-hydrogen) neighbors, saturating at 63
    pub neighbors: B6,
}

/// Query marks for every side of an atom
pub type QueryMarks<const N: usize> = [SideMarks; N];

/// A label as seen across both sides of a reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combined<T> {
    Same(T),
    Changed(T, T),
}
impl<T: PartialEq + Copy> Combined<T> {
    pub fn of(values: &[T]) -> Option<Self> {
        match *values {
            [a, b] if a != b => Some(Self::Changed(a, b)),
            [a, ..] => Some(Self::Same(a)),
            [] => None,
        }
    }
}

/// Atomic coordinates
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}
impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }
}
impl Sub for Point3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Everything about an atom that can differ between reagents and products
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AtomState {
    pub charge: Attr<i8>,
    pub radical: Attr<Radical>,
    pub stereo: Attr<Chirality>,
    /// Pattern constraint, compared against the computed query marks of the target
    pub hybridization: Attr<Hybridization>,
    /// Pattern constraint, compared against the computed query marks of the target
    pub neighbors: Attr<u8>,
    /// `None` if the coordinates are inherited from elsewhere, as in template patches
    pub xyz: Option<Point3>,
}
impl AtomState {
    /// A neutral, non-radical state at the origin.
    pub fn concrete(charge: i8) -> Self {
        Self {
            charge: Attr::Fixed(charge),
            radical: Attr::Fixed(Radical::None),
            stereo: Attr::Fixed(Chirality::None),
            hybridization: Attr::Any,
            neighbors: Attr::Any,
            xyz: Some(Point3::default()),
        }
    }
    pub fn radical(&self) -> Radical {
        self.radical.fixed().copied().unwrap_or(Radical::None)
    }
}

/// An atom with one state per side: `Atom<1>` for molecules, `Atom<2>` for reactions
#[derive(Debug, Clone, PartialEq)]
pub struct Atom<const N: usize> {
    pub element: Attr<Element>,
    /// 0 means natural abundance
    pub isotope: Attr<u16>,
    /// Free-form classification mark
    pub mark: String,
    pub states: [AtomState; N],
}
impl<const N: usize> Atom<N> {
    pub fn new(element: Element) -> Self {
        Self {
            element: Attr::Fixed(element),
            isotope: Attr::Fixed(0),
            mark: "0".to_string(),
            states: std::array::from_fn(|_| AtomState::concrete(0)),
        }
    }
    /// An atom with nothing constrained, for building patterns.
    pub fn query() -> Self {
        Self {
            element: Attr::Any,
            isotope: Attr::Any,
            mark: "0".to_string(),
            states: std::array::from_fn(|_| AtomState::default()),
        }
    }
    pub fn with_charge(mut self, charge: i8) -> Self {
        for s in &mut self.states {
            s.charge = Attr::Fixed(charge);
        }
        self
    }
    pub fn with_radical(mut self, radical: Radical) -> Self {
        for s in &mut self.states {
            s.radical = Attr::Fixed(radical);
        }
        self
    }
    pub fn with_isotope(mut self, isotope: u16) -> Self {
        self.isotope = Attr::Fixed(isotope);
        self
    }
    pub fn with_xyz(mut self, xyz: Point3) -> Self {
        for s in &mut self.states {
            s.xyz = Some(xyz);
        }
        self
    }
    pub fn element(&self) -> Option<Element> {
        self.element.fixed().copied()
    }
    pub fn is_hydrogen(&self) -> bool {
        self.element() == Some(Element::H)
    }
}
impl Atom<2> {
    pub fn with_charges(mut self, reagent: i8, product: i8) -> Self {
        self.states[REAGENT].charge = Attr::Fixed(reagent);
        self.states[PRODUCT].charge = Attr::Fixed(product);
        self
    }
    pub fn reagent(&self) -> &AtomState {
        &self.states[REAGENT]
    }
    pub fn product(&self) -> &AtomState {
        &self.states[PRODUCT]
    }
}
impl<const N: usize> Display for Atom<N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use fmtastic::Superscript;
        if let Some(&isotope) = self.isotope.fixed() {
            if isotope != 0 {
                write!(f, "{}", Superscript(isotope))?;
            }
        }
        match self.element() {
            Some(e) => f.write_str(e.symbol())?,
            None => f.write_str("*")?,
        }
        for (n, state) in self.states.iter().enumerate() {
            if n > 0 {
                f.write_str(">")?;
            }
            match state.charge.fixed() {
                None | Some(0) => {}
                Some(1) => f.write_str("⁺")?,
                Some(-1) => f.write_str("⁻")?,
                Some(&c) => write!(f, "{:+}", Superscript(c))?,
            }
        }
        Ok(())
    }
}

/// Everything about a bond that can differ between reagents and products
#[derive(Debug, Clone, PartialEq)]
pub struct BondState {
    pub order: Attr<BondOrder>,
    pub stereo: Attr<Wedge>,
}
impl BondState {
    pub fn concrete(order: BondOrder) -> Self {
        Self {
            order: Attr::Fixed(order),
            stereo: Attr::Fixed(Wedge::None),
        }
    }
    /// Whether the bond exists on this side. Unset and variable orders count as present.
    pub fn is_present(&self) -> bool {
        self.order.fixed() != Some(&BondOrder::Absent)
    }
}

/// A bond with one state per side
#[derive(Debug, Clone, PartialEq)]
pub struct Bond<const N: usize> {
    pub states: [BondState; N],
}
impl<const N: usize> Bond<N> {
    pub fn new(order: BondOrder) -> Self {
        Self {
            states: std::array::from_fn(|_| BondState::concrete(order)),
        }
    }
    /// The concrete order on a side, if fixed.
    pub fn order(&self, side: usize) -> Option<BondOrder> {
        self.states.get(side)?.order.fixed().copied()
    }
    /// A bond absent on every side shouldn't exist in a graph.
    pub fn is_empty(&self) -> bool {
        self.states.iter().all(|s| !s.is_present())
    }
}
impl Bond<2> {
    pub fn dual(reagent: BondOrder, product: BondOrder) -> Self {
        Self {
            states: [
                BondState::concrete(reagent),
                BondState::concrete(product),
            ],
        }
    }
    pub fn reagent(&self) -> &BondState {
        &self.states[REAGENT]
    }
    pub fn product(&self) -> &BondState {
        &self.states[PRODUCT]
    }
}
