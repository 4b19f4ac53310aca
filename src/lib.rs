//! Condensed graphs of reaction: molecules and reactions as graphs, ring perception, and
//! template-based rewriting.

#[rustfmt::skip]
pub mod atom_info;
pub mod container;
pub mod core;
pub mod error;
pub mod graph;
pub mod prelude;
pub mod reactor;

#[cfg(test)]
mod tests;
