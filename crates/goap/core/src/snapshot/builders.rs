//! Write-only accumulators for snapshot arrays.
//!
//! Each builder starts from the defaults (not executable, origin, cost 1,
//! condition not met), accepts overrides keyed by action or fact key, and
//! produces the dense array on [`build`](ExecutableBuilder::build). The last
//! write for a key wins. Writing an action or fact key the graph does not know
//! is a caller bug and panics, the same way indexing the array would.

use std::sync::Arc;

use super::{DEFAULT_COST, RequestSnapshot};
use crate::action::Condition;
use crate::graph::ConnectionIndex;
use crate::key::FactKey;
use crate::types::{ActionId, Position};

#[derive(Clone, Debug)]
pub struct ExecutableBuilder {
    values: Vec<bool>,
}

impl ExecutableBuilder {
    pub(crate) fn new(actions: usize) -> Self {
        Self {
            values: vec![false; actions],
        }
    }

    /// # Panics
    ///
    /// Panics if `action` is outside the catalogue.
    pub fn set_executable(&mut self, action: ActionId, executable: bool) -> &mut Self {
        *slot(&mut self.values, action) = executable;
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.values.fill(false);
        self
    }

    pub fn build(&self) -> Vec<bool> {
        self.values.clone()
    }
}

#[derive(Clone, Debug)]
pub struct PositionBuilder {
    values: Vec<Position>,
}

impl PositionBuilder {
    pub(crate) fn new(actions: usize) -> Self {
        Self {
            values: vec![Position::ORIGIN; actions],
        }
    }

    /// # Panics
    ///
    /// Panics if `action` is outside the catalogue.
    pub fn set_position(&mut self, action: ActionId, position: Position) -> &mut Self {
        *slot(&mut self.values, action) = position;
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.values.fill(Position::ORIGIN);
        self
    }

    pub fn build(&self) -> Vec<Position> {
        self.values.clone()
    }
}

#[derive(Clone, Debug)]
pub struct CostBuilder {
    values: Vec<f32>,
}

impl CostBuilder {
    pub(crate) fn new(actions: usize) -> Self {
        Self {
            values: vec![DEFAULT_COST; actions],
        }
    }

    /// # Panics
    ///
    /// Panics if `action` is outside the catalogue.
    pub fn set_cost(&mut self, action: ActionId, cost: f32) -> &mut Self {
        *slot(&mut self.values, action) = cost;
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.values.fill(DEFAULT_COST);
        self
    }

    pub fn build(&self) -> Vec<f32> {
        self.values.clone()
    }
}

/// Accumulates which condition keys already hold in the live world.
#[derive(Clone, Debug)]
pub struct ConditionBuilder {
    index: Arc<ConnectionIndex>,
    values: Vec<bool>,
}

impl ConditionBuilder {
    pub(crate) fn new(index: Arc<ConnectionIndex>) -> Self {
        let values = vec![false; index.key_count()];
        Self { index, values }
    }

    /// # Panics
    ///
    /// Panics if no action in the catalogue requires `key`.
    pub fn set_condition_met(&mut self, key: &FactKey, met: bool) -> &mut Self {
        let Some(condition) = self.index.lookup(key) else {
            panic!("fact key {key} is not a condition of any catalogue action");
        };
        self.values[condition.index()] = met;
        self
    }

    /// Marks every catalogue condition equal to `condition`, keyed the way the
    /// graph keyed it (including custom [`KeyResolver`](crate::KeyResolver)s).
    ///
    /// # Panics
    ///
    /// Panics if no action in the catalogue declares `condition`.
    pub fn set_condition(&mut self, condition: &Condition, met: bool) -> &mut Self {
        let mut found = false;
        for slot in self.index.condition_slots(condition) {
            self.values[slot.index()] = met;
            found = true;
        }
        assert!(
            found,
            "condition {}{} is not declared by any catalogue action",
            if condition.positive { "" } else { "!" },
            condition.key
        );
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.values.fill(false);
        self
    }

    pub fn build(&self) -> Vec<bool> {
        self.values.clone()
    }
}

fn slot<T>(values: &mut [T], action: ActionId) -> &mut T {
    let actions = values.len();
    match values.get_mut(action.index()) {
        Some(slot) => slot,
        None => panic!("action {action} is out of range for a catalogue of {actions} actions"),
    }
}

/// All four builders, handed to sensors while they describe the live world.
#[derive(Clone, Debug)]
pub struct SnapshotBuilder {
    pub executable: ExecutableBuilder,
    pub positions: PositionBuilder,
    pub costs: CostBuilder,
    pub conditions: ConditionBuilder,
}

impl SnapshotBuilder {
    pub(crate) fn new(index: Arc<ConnectionIndex>) -> Self {
        let actions = index.action_count();
        Self {
            executable: ExecutableBuilder::new(actions),
            positions: PositionBuilder::new(actions),
            costs: CostBuilder::new(actions),
            conditions: ConditionBuilder::new(index),
        }
    }

    pub fn build(&self, root: ActionId) -> RequestSnapshot {
        RequestSnapshot {
            root,
            executable: self.executable.build(),
            positions: self.positions.build(),
            costs: self.costs.build(),
            conditions_met: self.conditions.build(),
        }
    }

    pub fn clear(&mut self) -> &mut Self {
        self.executable.clear();
        self.positions.clear();
        self.costs.clear();
        self.conditions.clear();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Action, Catalogue, Effect};
    use crate::key::{KeyResolver, WorldKeyResolver};

    fn index() -> Arc<ConnectionIndex> {
        let mut catalogue = Catalogue::new();
        catalogue.push(
            Action::goal("goal")
                .with_condition(Condition::is("a"))
                .with_condition(Condition::is_not("b")),
        );
        catalogue.push(Action::new("make_a").with_effect(Effect::is("a")));
        Arc::new(ConnectionIndex::build(catalogue, &WorldKeyResolver))
    }

    #[test]
    fn unset_entries_use_defaults() {
        let builder = SnapshotBuilder::new(index());
        let snapshot = builder.build(ActionId(0));

        assert_eq!(snapshot.executable, vec![false, false]);
        assert_eq!(snapshot.positions, vec![Position::ORIGIN; 2]);
        assert_eq!(snapshot.costs, vec![1.0, 1.0]);
        assert_eq!(snapshot.conditions_met, vec![false, false]);
    }

    #[test]
    fn last_write_wins() {
        let mut costs = CostBuilder::new(2);
        costs.set_cost(ActionId(1), 5.0).set_cost(ActionId(1), 2.5);

        let mut executable = ExecutableBuilder::new(2);
        executable
            .set_executable(ActionId(0), true)
            .set_executable(ActionId(0), false)
            .set_executable(ActionId(1), true);

        assert_eq!(costs.build(), vec![1.0, 2.5]);
        assert_eq!(executable.build(), vec![false, true]);
    }

    #[test]
    #[should_panic(expected = "action #9 is out of range for a catalogue of 2 actions")]
    fn out_of_range_action_panics() {
        let mut executable = ExecutableBuilder::new(2);
        executable.set_executable(ActionId(9), true);
    }

    #[test]
    #[should_panic(expected = "action #1 is out of range for a catalogue of 1 actions")]
    fn out_of_range_position_panics() {
        let mut positions = PositionBuilder::new(1);
        positions.set_position(ActionId(1), Position::new(1.0, 2.0, 3.0));
    }

    #[test]
    #[should_panic(expected = "fact key missing_true is not a condition of any catalogue action")]
    fn unknown_fact_key_panics() {
        let mut conditions = ConditionBuilder::new(index());
        conditions.set_condition_met(&FactKey::new("missing", true), true);
    }

    #[test]
    #[should_panic(expected = "is not declared by any catalogue action")]
    fn undeclared_condition_panics() {
        let mut conditions = ConditionBuilder::new(index());
        conditions.set_condition(&Condition::is("b"), true);
    }

    #[test]
    fn set_condition_follows_the_index_key_resolver() {
        /// Scopes every fact to the action that declares or produces it.
        struct PerAction;

        impl KeyResolver for PerAction {
            fn condition_key(&self, action: &Action, condition: &Condition) -> FactKey {
                FactKey::new(format!("{}.{}", action.name(), condition.key), condition.positive)
            }

            fn effect_key(&self, action: &Action, effect: &Effect) -> FactKey {
                FactKey::new(format!("{}.{}", action.name(), effect.key), effect.positive)
            }
        }

        let mut catalogue = Catalogue::new();
        catalogue.push(Action::goal("goal").with_condition(Condition::is("a")));
        catalogue.push(Action::new("other").with_condition(Condition::is("a")));
        let index = Arc::new(ConnectionIndex::build(catalogue, &PerAction));

        let mut conditions = ConditionBuilder::new(index);
        conditions.set_condition(&Condition::is("a"), true);

        assert_eq!(conditions.build(), vec![true, true]);
    }

    #[test]
    fn clear_restores_defaults() {
        let mut builder = SnapshotBuilder::new(index());
        builder.executable.set_executable(ActionId(1), true);
        builder.costs.set_cost(ActionId(1), 9.0);
        builder.conditions.set_condition(&Condition::is("a"), true);

        builder.clear();
        let snapshot = builder.build(ActionId(0));

        assert_eq!(snapshot.executable, vec![false, false]);
        assert_eq!(snapshot.costs, vec![1.0, 1.0]);
        assert_eq!(snapshot.conditions_met, vec![false, false]);
    }
}
