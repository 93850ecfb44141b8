//! Unified error types surfaced by the runner API.
//!
//! Wraps resolver contract and lifetime violations with the set and agent
//! that triggered them. Unsatisfiable goals are not errors; those agents simply
//! receive an empty plan.
use thiserror::Error;

use goap_core::ResolveError;

use super::AgentId;

pub type Result<T> = std::result::Result<T, RunnerError>;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("planner set '{0}' is not registered")]
    UnknownSet(String),

    #[error("planner set '{0}' is already registered")]
    DuplicateSet(String),

    #[error("agent {agent} in planner set '{set}' failed to resolve")]
    AgentResolve {
        set: String,
        agent: AgentId,
        #[source]
        source: ResolveError,
    },

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}
