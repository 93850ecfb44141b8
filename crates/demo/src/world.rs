//! Shared camp state and the sensors that describe it to the resolver.
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use goap_core::{
    Action, ConnectionIndex, Effect, FactKey, Position, PositionBuilder, SnapshotBuilder,
};
use goap_runtime::{AgentId, PlanningAgent, TargetSensor, WorldSensor};

/// Boolean facts about one agent's surroundings. Missing facts read as false.
#[derive(Debug, Clone, Default)]
pub struct Facts(HashMap<String, bool>);

impl Facts {
    pub fn with(mut self, key: impl Into<String>, value: bool) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: bool) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> bool {
        self.0.get(key).copied().unwrap_or(false)
    }

    pub fn holds(&self, key: &FactKey) -> bool {
        self.get(key.world_key().name()) == key.positive()
    }

    pub fn apply(&mut self, effect: &Effect) {
        self.set(effect.key.name(), effect.positive);
    }
}

#[derive(Debug, Clone)]
pub struct AgentState {
    pub position: Position,
    pub facts: Facts,
}

/// Per-agent facts plus the fixed locations where actions take place.
#[derive(Debug, Clone, Default)]
pub struct World {
    agents: Arc<RwLock<HashMap<AgentId, AgentState>>>,
    sites: Arc<HashMap<String, Position>>,
}

impl World {
    pub fn new(sites: HashMap<String, Position>) -> Self {
        Self {
            agents: Arc::default(),
            sites: Arc::new(sites),
        }
    }

    pub fn spawn(&self, id: AgentId, position: Position, facts: Facts) {
        self.agents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, AgentState { position, facts });
    }

    pub fn state(&self, id: AgentId) -> Option<AgentState> {
        self.agents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    pub fn site(&self, action: &str) -> Option<Position> {
        self.sites.get(action).copied()
    }

    /// Applies the effects of `action` and moves the agent to its site.
    pub fn perform(&self, id: AgentId, action: &Action) {
        let mut agents = self.agents.write().unwrap_or_else(PoisonError::into_inner);
        let Some(state) = agents.get_mut(&id) else {
            return;
        };
        for effect in action.effects() {
            state.facts.apply(effect);
        }
        if let Some(site) = self.site(action.name()) {
            state.position = site;
        }
    }
}

/// Fills condition and executable flags from the agent's facts.
///
/// An action is executable once every one of its conditions holds.
pub struct FactSensor {
    world: World,
}

impl FactSensor {
    pub fn new(world: World) -> Self {
        Self { world }
    }
}

impl WorldSensor for FactSensor {
    fn sense(
        &self,
        agent: &dyn PlanningAgent,
        index: &ConnectionIndex,
        snapshot: &mut SnapshotBuilder,
    ) {
        let Some(state) = self.world.state(agent.id()) else {
            return;
        };

        for (_, key) in index.keys() {
            snapshot
                .conditions
                .set_condition_met(key, state.facts.holds(key));
        }

        for (id, action) in index.catalogue().iter() {
            if action.is_goal() {
                continue;
            }
            let ready = index
                .conditions(id)
                .iter()
                .all(|&condition| state.facts.holds(index.key(condition)));
            snapshot.executable.set_executable(id, ready);
        }
    }
}

/// Places actions at their sites and the agent's goal at the agent.
pub struct SiteSensor {
    world: World,
}

impl SiteSensor {
    pub fn new(world: World) -> Self {
        Self { world }
    }
}

impl TargetSensor for SiteSensor {
    fn sense_targets(
        &self,
        agent: &dyn PlanningAgent,
        index: &ConnectionIndex,
        positions: &mut PositionBuilder,
    ) {
        for (id, action) in index.catalogue().iter() {
            if let Some(site) = self.world.site(action.name()) {
                positions.set_position(id, site);
            }
        }

        if let (Some(goal), Some(state)) = (agent.goal(), self.world.state(agent.id())) {
            positions.set_position(goal, state.position);
        }
    }
}
