use crate::core::{AtomId, BondOrder, Element, Radical};
use thiserror::Error;

/// Invalid atoms, bonds, or references to them
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("{0:?} is not a recognized element")]
    UnknownElement(String),
    #[error("charge {charge} with radical {radical:?} is impossible for {element}")]
    ImpossibleChargeRadical {
        element: Element,
        charge: i8,
        radical: Radical,
    },
    #[error("invalid radical {0:?}")]
    InvalidRadical(Radical),
    #[error("invalid bond order {0:?}")]
    InvalidBondOrder(BondOrder),
    #[error("atom {0} can't be bonded to itself")]
    SelfLoop(AtomId),
    #[error("a bond between {0} and {1} already exists")]
    DuplicateBond(AtomId, AtomId),
    #[error("the bond between {0} and {1} is absent on every side")]
    EmptyBond(AtomId, AtomId),
    #[error("bonding would exceed the valence of atom {0}")]
    Valence(AtomId),
    #[error("atom {0} not found")]
    AtomNotFound(AtomId),
    #[error("no bond between {0} and {1}")]
    BondNotFound(AtomId, AtomId),
    #[error("atom {0} already exists")]
    MapConflict(AtomId),
    #[error("atom numbers must be positive")]
    NonPositiveMap,
    #[error("no atom numbers left")]
    IdOverflow,
}
impl DataError {
    /// Referenced something that doesn't exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::AtomNotFound(_) | Self::BondNotFound(..))
    }
    /// Tried to reuse an atom number
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::MapConflict(_))
    }
}

/// A stereo mark that can't be placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StereoError {
    #[error("no stereo marks given")]
    NoMarks,
    #[error("atom {0} or its neighbors have 3D coordinates, wedges can't be used")]
    Has3d(AtomId),
    #[error("atom {0} has too many hydrogens to be a stereocenter")]
    TooManyHydrogens(AtomId),
    #[error("atom {0} isn't a tetrahedral center")]
    Unsupported(AtomId),
    #[error("atom {0} already has stereo")]
    AlreadySet(AtomId),
}

/// A template that can't be applied consistently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("new atom {0} can't be variable")]
    VariableNewAtom(AtomId),
    #[error("new bond between {0} and {1} can't be variable")]
    VariableNewBond(AtomId, AtomId),
    #[error("no patch value for the matched value of atom {0}")]
    UnresolvedCondition(AtomId),
    #[error("patch value on atom {0} is variable")]
    VariablePatch(AtomId),
}

/// A stored reactor configuration that doesn't fit
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid config: expected exactly the keys {expected:?}, found {found:?}")]
pub struct ConfigError {
    pub expected: Vec<&'static str>,
    pub found: Vec<String>,
}

/// Any error raised by the crate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CgrError {
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Stereo(#[from] StereoError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
