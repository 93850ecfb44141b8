//! Goal-oriented action planning core.
//!
//! `goap-core` turns a static catalogue of actions into a connection graph and
//! resolves, per request, the cheapest ordered sequence of actions that makes a
//! goal's conditions true. The graph is built once; every request carries its
//! own [`RequestSnapshot`] of live data (executability, positions, costs and
//! facts that already hold), so any number of agents can plan concurrently
//! against the same [`GraphResolver`].
//!
//! Modules are organized by responsibility:
//! - [`action`] and [`key`] describe the catalogue and how facts are matched
//! - [`graph`] hosts the static [`ConnectionIndex`] and its debug [`Graph`] view
//! - [`snapshot`] holds the per-request data and its builders
//! - [`resolver`] runs the search and hands out [`ResolveHandle`]s
pub mod action;
pub mod config;
pub mod error;
pub mod graph;
pub mod key;
pub mod resolver;
pub mod snapshot;
pub mod types;

pub use action::{Action, Catalogue, Condition, Effect, WorldKey};
pub use config::ResolverConfig;
pub use error::{ErrorSeverity, ResolveError, Result};
pub use graph::{ConnectionIndex, Graph, GraphConnection, GraphNode};
pub use key::{FactKey, KeyResolver, WorldKeyResolver};
pub use resolver::{ActionPlan, GraphResolver, ResolveHandle};
pub use snapshot::{
    ConditionBuilder, CostBuilder, ExecutableBuilder, PositionBuilder, RequestSnapshot,
    SnapshotBuilder, SnapshotField,
};
pub use types::{ActionId, ConditionIndex, Position};
