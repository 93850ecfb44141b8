//! Per-tick orchestration around the goap-core resolver.
//!
//! This crate wires planner sets (a resolver plus the sensors and agents that
//! use it) into a [`GoapRunner`] that a host loop drives once per tick: [`run`]
//! submits one resolve request per agent that needs a plan, [`complete`]
//! collects every outstanding handle and hands the plans back to the agents.
//!
//! Modules are organized by responsibility:
//! - [`api`] exposes the traits and errors host code implements against
//! - [`set`] groups a resolver with its sensors and agents
//! - [`runner`] hosts the tick orchestrator, its builder and config
//! - [`metrics`] keeps lock-free resolve statistics
//!
//! [`run`]: GoapRunner::run
//! [`complete`]: GoapRunner::complete
pub mod api;
pub mod metrics;
pub mod runner;
pub mod set;

pub use api::{AgentId, PlanningAgent, Result, RunnerError, TargetSensor, WorldSensor};
pub use metrics::{MetricsSnapshot, RunnerMetrics};
pub use runner::{GoapRunner, RunnerBuilder, RunnerConfig};
pub use set::{PlannerSet, PlannerSetBuilder};
