//! Public runner API surface.
//!
//! Gathers the collaborator traits and error types consumers of the runner
//! crate implement against, so the orchestration modules stay focused.

pub mod agent;
pub mod errors;

pub use agent::{AgentId, PlanningAgent, TargetSensor, WorldSensor};
pub use errors::{Result, RunnerError};
