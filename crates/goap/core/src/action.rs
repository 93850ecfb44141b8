//! Catalogue types: world keys, conditions, effects and actions.
//!
//! A catalogue is assembled once (usually by a factory or builder outside this
//! crate) and is immutable afterwards. Goals are plain [`Action`]s that only
//! carry conditions; they live in the catalogue next to regular actions and
//! are picked as the search root per request.

use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use crate::types::ActionId;

/// Name of a boolean proposition about the world (e.g. `is_holding_axe`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldKey(Arc<str>);

impl WorldKey {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WorldKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for WorldKey {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for WorldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fact an action requires before it can run.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Condition {
    pub key: WorldKey,
    pub positive: bool,
}

impl Condition {
    pub fn new(key: impl Into<WorldKey>, positive: bool) -> Self {
        Self {
            key: key.into(),
            positive,
        }
    }

    /// Requires `key` to be true.
    pub fn is(key: impl Into<WorldKey>) -> Self {
        Self::new(key, true)
    }

    /// Requires `key` to be false.
    pub fn is_not(key: impl Into<WorldKey>) -> Self {
        Self::new(key, false)
    }
}

/// A fact an action guarantees once it completes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Effect {
    pub key: WorldKey,
    pub positive: bool,
}

impl Effect {
    pub fn new(key: impl Into<WorldKey>, positive: bool) -> Self {
        Self {
            key: key.into(),
            positive,
        }
    }

    /// Makes `key` true.
    pub fn is(key: impl Into<WorldKey>) -> Self {
        Self::new(key, true)
    }

    /// Makes `key` false.
    pub fn is_not(key: impl Into<WorldKey>) -> Self {
        Self::new(key, false)
    }
}

/// A catalogue entry: something an agent can do, or a goal it can pursue.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Action {
    name: String,
    conditions: Vec<Condition>,
    effects: Vec<Effect>,
}

impl Action {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            conditions: Vec::new(),
            effects: Vec::new(),
        }
    }

    /// Creates a goal. Goals are actions with conditions and no effects.
    pub fn goal(name: impl Into<String>) -> Self {
        Self::new(name)
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Returns true if this entry has no effects, i.e. it can only be a root.
    pub fn is_goal(&self) -> bool {
        self.effects.is_empty()
    }
}

/// Ordered, append-only list of actions and goals.
///
/// The position of an action in the catalogue is its [`ActionId`]; catalogue
/// order is also the tie-break order between equally cheap candidates.
#[derive(Clone, Debug, Default)]
pub struct Catalogue {
    actions: Vec<Action>,
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an action and returns its handle.
    pub fn push(&mut self, action: Action) -> ActionId {
        let id = ActionId::from_index(self.actions.len());
        self.actions.push(action);
        id
    }

    pub fn get(&self, id: ActionId) -> Option<&Action> {
        self.actions.get(id.index())
    }

    /// Finds the first action with the given name.
    pub fn find(&self, name: &str) -> Option<ActionId> {
        self.actions
            .iter()
            .position(|action| action.name == name)
            .map(ActionId::from_index)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActionId, &Action)> {
        self.actions
            .iter()
            .enumerate()
            .map(|(index, action)| (ActionId::from_index(index), action))
    }
}

impl Index<ActionId> for Catalogue {
    type Output = Action;

    fn index(&self, id: ActionId) -> &Action {
        &self.actions[id.index()]
    }
}

impl FromIterator<Action> for Catalogue {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}
