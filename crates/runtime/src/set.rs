//! Planner sets: one resolver with the sensors and agents that use it.
use goap_core::{
    ActionId, Catalogue, GraphResolver, KeyResolver, RequestSnapshot, ResolveError,
    WorldKeyResolver,
};

use crate::api::{PlanningAgent, TargetSensor, WorldSensor};

/// A named catalogue with its resolver, sensors and agents.
///
/// Agents in a set share the resolver's connection index; every agent gets
/// its own snapshot per tick.
pub struct PlannerSet {
    name: String,
    pub(crate) resolver: GraphResolver,
    sensors: Vec<Box<dyn WorldSensor>>,
    target_sensors: Vec<Box<dyn TargetSensor>>,
    pub(crate) agents: Vec<Box<dyn PlanningAgent>>,
}

impl PlannerSet {
    pub fn builder(name: impl Into<String>) -> PlannerSetBuilder {
        PlannerSetBuilder::new(name.into())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resolver(&self) -> &GraphResolver {
        &self.resolver
    }

    pub fn agents(&self) -> &[Box<dyn PlanningAgent>] {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut [Box<dyn PlanningAgent>] {
        &mut self.agents
    }

    pub fn add_agent(&mut self, agent: impl PlanningAgent + 'static) {
        self.agents.push(Box::new(agent));
    }

    pub fn add_sensor(&mut self, sensor: impl WorldSensor + 'static) {
        self.sensors.push(Box::new(sensor));
    }

    pub fn add_target_sensor(&mut self, sensor: impl TargetSensor + 'static) {
        self.target_sensors.push(Box::new(sensor));
    }

    /// Runs every sensor for `agent` and builds the snapshot rooted at `goal`.
    pub fn snapshot_for(
        &self,
        agent: &dyn PlanningAgent,
        goal: ActionId,
    ) -> Result<RequestSnapshot, ResolveError> {
        let index = self.resolver.index()?;
        let mut builder = self.resolver.snapshot_builder()?;
        for sensor in &self.sensors {
            sensor.sense(agent, index, &mut builder);
        }
        for sensor in &self.target_sensors {
            sensor.sense_targets(agent, index, &mut builder.positions);
        }
        Ok(builder.build(goal))
    }
}

/// Builder for [`PlannerSet`].
pub struct PlannerSetBuilder {
    name: String,
    catalogue: Catalogue,
    key_resolver: Box<dyn KeyResolver>,
    sensors: Vec<Box<dyn WorldSensor>>,
    target_sensors: Vec<Box<dyn TargetSensor>>,
    agents: Vec<Box<dyn PlanningAgent>>,
}

impl PlannerSetBuilder {
    fn new(name: String) -> Self {
        Self {
            name,
            catalogue: Catalogue::new(),
            key_resolver: Box::new(WorldKeyResolver),
            sensors: Vec::new(),
            target_sensors: Vec::new(),
            agents: Vec::new(),
        }
    }

    pub fn catalogue(mut self, catalogue: Catalogue) -> Self {
        self.catalogue = catalogue;
        self
    }

    /// Overrides the default world-key + polarity matching.
    pub fn key_resolver(mut self, resolver: impl KeyResolver + 'static) -> Self {
        self.key_resolver = Box::new(resolver);
        self
    }

    pub fn sensor(mut self, sensor: impl WorldSensor + 'static) -> Self {
        self.sensors.push(Box::new(sensor));
        self
    }

    pub fn target_sensor(mut self, sensor: impl TargetSensor + 'static) -> Self {
        self.target_sensors.push(Box::new(sensor));
        self
    }

    pub fn agent(mut self, agent: impl PlanningAgent + 'static) -> Self {
        self.agents.push(Box::new(agent));
        self
    }

    /// Builds the connection index and the set.
    pub fn build(self) -> PlannerSet {
        let resolver = GraphResolver::new(self.catalogue, self.key_resolver.as_ref());
        tracing::info!(
            set = %self.name,
            agents = self.agents.len(),
            sensors = self.sensors.len() + self.target_sensors.len(),
            "planner set built"
        );

        PlannerSet {
            name: self.name,
            resolver,
            sensors: self.sensors,
            target_sensors: self.target_sensors,
            agents: self.agents,
        }
    }
}
