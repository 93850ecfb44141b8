//! Static connection graph built from the catalogue.
//!
//! [`ConnectionIndex`] is the structure the search walks; [`Graph`] is a
//! detached, read-only view of it for debugging and visualisation.

mod index;
mod view;

pub use index::ConnectionIndex;
pub use view::{Graph, GraphConnection, GraphNode};
