pub mod connect;
pub mod isomorphism;
pub mod sssr;

pub use connect::ConnectedGraphIter;
pub use isomorphism::*;
pub use sssr::{find_sssr, RingsIterator};
