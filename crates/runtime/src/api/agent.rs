//! Collaborator traits: the agents that plan and the sensors that observe.
use std::fmt;

use goap_core::{ActionId, ActionPlan, ConnectionIndex, PositionBuilder, SnapshotBuilder};

/// Identifier of an agent within the host simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

/// An autonomous agent that requests plans and later executes them.
pub trait PlanningAgent: Send + Sync {
    fn id(&self) -> AgentId;

    /// Goal the agent currently pursues. `None` skips planning this tick.
    fn goal(&self) -> Option<ActionId>;

    /// Whether the agent wants a fresh plan this tick.
    fn needs_plan(&self) -> bool {
        true
    }

    /// Delivers the plan resolved for `goal`. An empty plan means the goal
    /// already holds or is currently unreachable.
    fn receive_plan(&mut self, goal: ActionId, plan: ActionPlan);
}

/// Describes the live world to the resolver for one agent.
///
/// Sensors run in registration order; later sensors overwrite earlier ones
/// for the same key.
pub trait WorldSensor: Send + Sync {
    fn sense(
        &self,
        agent: &dyn PlanningAgent,
        index: &ConnectionIndex,
        snapshot: &mut SnapshotBuilder,
    );
}

/// Places actions in space for one agent.
///
/// Target sensors run after every [`WorldSensor`] and only touch positions.
pub trait TargetSensor: Send + Sync {
    fn sense_targets(
        &self,
        agent: &dyn PlanningAgent,
        index: &ConnectionIndex,
        positions: &mut PositionBuilder,
    );
}
