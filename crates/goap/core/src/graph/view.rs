use crate::graph::ConnectionIndex;
use crate::types::ActionId;

/// Detached snapshot of the connection graph, one node per catalogue entry.
///
/// Intended for debugging tools and visualisers; the search never reads it.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphNode {
    pub id: ActionId,
    pub name: String,
    pub goal: bool,
    pub effects: Vec<String>,
    pub conditions: Vec<GraphConnection>,
}

/// A condition of a node together with every action able to satisfy it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphConnection {
    pub key: String,
    pub producers: Vec<ActionId>,
}

impl Graph {
    pub fn from_index(index: &ConnectionIndex) -> Self {
        let nodes = index
            .catalogue()
            .iter()
            .map(|(id, action)| GraphNode {
                id,
                name: action.name().to_owned(),
                goal: action.is_goal(),
                effects: index.effects(id).iter().map(ToString::to_string).collect(),
                conditions: index
                    .conditions(id)
                    .iter()
                    .map(|&key| GraphConnection {
                        key: index.key(key).to_string(),
                        producers: index.producers(key).to_vec(),
                    })
                    .collect(),
            })
            .collect();

        Self { nodes }
    }

    pub fn node(&self, id: ActionId) -> Option<&GraphNode> {
        self.nodes.get(id.index())
    }

    pub fn goals(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|node| node.goal)
    }

    /// Condition keys no action in the catalogue can produce.
    pub fn unsatisfiable_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .nodes
            .iter()
            .flat_map(|node| node.conditions.iter())
            .filter(|connection| connection.producers.is_empty())
            .map(|connection| connection.key.as_str())
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }
}
