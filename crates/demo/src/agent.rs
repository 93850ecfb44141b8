//! Camp worker: picks a goal from its needs and performs one step per plan.
use std::sync::Arc;

use goap_core::{ActionId, ActionPlan, Catalogue};
use goap_runtime::{AgentId, PlanningAgent};
use tracing::info;

use crate::catalogue::{created, goals, holding};
use crate::world::World;

pub struct Worker {
    id: AgentId,
    catalogue: Arc<Catalogue>,
    world: World,
}

impl Worker {
    pub fn new(id: AgentId, catalogue: Arc<Catalogue>, world: World) -> Self {
        Self {
            id,
            catalogue,
            world,
        }
    }

    /// Highest-priority unmet need, falling back to wandering.
    fn pick_goal(&self) -> &'static str {
        let Some(state) = self.world.state(self.id) else {
            return goals::WANDER;
        };
        let facts = &state.facts;

        if facts.get("hungry") {
            goals::FIX_HUNGER
        } else if facts.get("items_on_floor") {
            goals::CLEAN_ITEMS
        } else if !facts.get(&created("axe")) {
            goals::CREATE_AXE
        } else if !facts.get(&created("pickaxe")) {
            goals::CREATE_PICKAXE
        } else if !facts.get(&holding("wood")) {
            goals::GATHER_WOOD
        } else if !facts.get(&holding("iron")) {
            goals::GATHER_IRON
        } else {
            goals::WANDER
        }
    }
}

impl PlanningAgent for Worker {
    fn id(&self) -> AgentId {
        self.id
    }

    fn goal(&self) -> Option<ActionId> {
        self.catalogue.find(self.pick_goal())
    }

    fn receive_plan(&mut self, goal: ActionId, plan: ActionPlan) {
        let goal_name = self.catalogue[goal].name();
        let steps = plan
            .iter()
            .map(|id| self.catalogue[id].name())
            .collect::<Vec<_>>();

        let Some(next) = plan.first() else {
            info!(agent = %self.id, goal = goal_name, "nothing to do");
            return;
        };

        info!(agent = %self.id, goal = goal_name, plan = ?steps, "plan received");
        self.world.perform(self.id, &self.catalogue[next]);
    }
}
