//! Error types surfaced by the resolver.
//!
//! Only contract and lifetime violations are errors. An unsatisfiable goal is
//! a normal outcome and yields an empty [`ActionPlan`](crate::ActionPlan);
//! dead-end candidates are pruned inside the search and never surface here.

use thiserror::Error;

use crate::snapshot::SnapshotField;
use crate::types::{ActionId, Position};

pub type Result<T> = std::result::Result<T, ResolveError>;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ResolveError {
    #[error("root action {root} is out of range for a catalogue of {actions} actions")]
    RootOutOfRange { root: ActionId, actions: usize },

    #[error("snapshot {field} has {actual} entries but the graph expects {expected}")]
    SnapshotLength {
        field: SnapshotField,
        expected: usize,
        actual: usize,
    },

    #[error("action {action} has invalid cost {cost}")]
    InvalidCost { action: ActionId, cost: f32 },

    #[error("action {action} has non-finite position {position}")]
    InvalidPosition { action: ActionId, position: Position },

    #[error("resolver has been disposed")]
    Disposed,

    #[error("cannot dispose resolver while {count} resolve handles are outstanding")]
    HandlesOutstanding { count: usize },

    #[error("resolve worker dropped before producing a plan")]
    WorkerDropped,
}

impl ResolveError {
    pub const fn severity(&self) -> ErrorSeverity {
        match self {
            Self::RootOutOfRange { .. }
            | Self::SnapshotLength { .. }
            | Self::InvalidCost { .. }
            | Self::InvalidPosition { .. } => ErrorSeverity::Validation,
            Self::Disposed | Self::HandlesOutstanding { .. } => ErrorSeverity::Lifetime,
            Self::WorkerDropped => ErrorSeverity::Internal,
        }
    }
}

/// Classification of resolver errors.
///
/// - **Validation**: the caller handed in a malformed request
/// - **Lifetime**: the resolver was used after (or torn down during) its lifetime
/// - **Internal**: the search task vanished, which indicates a bug
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    Validation,
    Lifetime,
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Lifetime => "lifetime",
            Self::Internal => "internal",
        }
    }
}
