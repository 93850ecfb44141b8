use crate::types::ActionId;

/// Ordered actions produced by a resolve call, deepest prerequisite first.
///
/// Executing the plan front to back runs every action only after everything it
/// depends on. An empty plan means the goal already holds or cannot be reached.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionPlan {
    actions: Vec<ActionId>,
}

impl ActionPlan {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a plan from flattened branch output, keeping the first
    /// occurrence of every action.
    pub(crate) fn from_branch(actions: Vec<ActionId>, action_count: usize) -> Self {
        let mut seen = vec![false; action_count];
        let actions = actions
            .into_iter()
            .filter(|id| !std::mem::replace(&mut seen[id.index()], true))
            .collect();
        Self { actions }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// The action to perform first.
    pub fn first(&self) -> Option<ActionId> {
        self.actions.first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = ActionId> + '_ {
        self.actions.iter().copied()
    }

    pub fn as_slice(&self) -> &[ActionId] {
        &self.actions
    }

    pub fn into_vec(self) -> Vec<ActionId> {
        self.actions
    }
}

impl IntoIterator for ActionPlan {
    type Item = ActionId;
    type IntoIter = std::vec::IntoIter<ActionId>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.into_iter()
    }
}
