//! Everything needed to build graphs and run templates.

pub use crate::container::records::{AtomRecord, BondRecord, Records};
pub use crate::container::{CgrContainer, Container, Meta, MoleculeContainer, ValenceCheck};
pub use crate::core::*;
pub use crate::error::*;
pub use crate::reactor::{
    patcher, prepare_templates, Mapping, Match, RawTemplate, Reactor, ReactorConfig, Template,
};
