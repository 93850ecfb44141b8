use std::collections::HashMap;

use crate::action::{Action, Catalogue, Condition};
use crate::key::{FactKey, KeyResolver};
use crate::types::{ActionId, ConditionIndex};

/// Maps every condition fact key to the actions whose effects produce it.
///
/// # Invariants
///
/// - Every fact key that appears as a condition anywhere in the catalogue has
///   an entry, even when no action produces it.
/// - Producer lists keep catalogue order and hold each action at most once.
/// - The index never changes after construction; a new catalogue means a new
///   index.
#[derive(Debug)]
pub struct ConnectionIndex {
    catalogue: Catalogue,
    /// Condition keys by [`ConditionIndex`].
    keys: Vec<FactKey>,
    lookup: HashMap<FactKey, ConditionIndex>,
    /// Producer actions by [`ConditionIndex`].
    producers: Vec<Vec<ActionId>>,
    /// Condition keys required by each action, by [`ActionId`].
    conditions: Vec<Vec<ConditionIndex>>,
    /// Effect keys of each action, by [`ActionId`].
    effects: Vec<Vec<FactKey>>,
}

impl ConnectionIndex {
    pub fn build(catalogue: Catalogue, resolver: &dyn KeyResolver) -> Self {
        let mut keys = Vec::new();
        let mut lookup = HashMap::new();
        let mut conditions = Vec::with_capacity(catalogue.len());

        for (_, action) in catalogue.iter() {
            let required = action
                .conditions()
                .iter()
                .map(|condition| {
                    let key = resolver.condition_key(action, condition);
                    *lookup.entry(key.clone()).or_insert_with(|| {
                        keys.push(key);
                        ConditionIndex::from_index(keys.len() - 1)
                    })
                })
                .collect::<Vec<_>>();
            conditions.push(required);
        }

        let mut producers = vec![Vec::new(); keys.len()];
        let mut effects = Vec::with_capacity(catalogue.len());

        for (id, action) in catalogue.iter() {
            let produced = effect_keys(action, resolver);
            for key in &produced {
                let Some(&index) = lookup.get(key) else {
                    continue;
                };
                let list: &mut Vec<ActionId> = &mut producers[index.index()];
                if list.last() != Some(&id) {
                    list.push(id);
                }
            }
            effects.push(produced);
        }

        tracing::debug!(
            actions = catalogue.len(),
            connections = keys.len(),
            "connection index built"
        );

        Self {
            catalogue,
            keys,
            lookup,
            producers,
            conditions,
            effects,
        }
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn action_count(&self) -> usize {
        self.catalogue.len()
    }

    /// Number of distinct condition keys.
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub fn key(&self, index: ConditionIndex) -> &FactKey {
        &self.keys[index.index()]
    }

    pub fn keys(&self) -> impl Iterator<Item = (ConditionIndex, &FactKey)> {
        self.keys
            .iter()
            .enumerate()
            .map(|(index, key)| (ConditionIndex::from_index(index), key))
    }

    /// Returns the dense index of a condition key, if any action requires it.
    pub fn lookup(&self, key: &FactKey) -> Option<ConditionIndex> {
        self.lookup.get(key).copied()
    }

    /// Actions producing the given key, in catalogue order.
    pub fn producers(&self, key: ConditionIndex) -> &[ActionId] {
        &self.producers[key.index()]
    }

    /// Condition keys the given action requires, in declaration order.
    pub fn conditions(&self, action: ActionId) -> &[ConditionIndex] {
        &self.conditions[action.index()]
    }

    pub fn effects(&self, action: ActionId) -> &[FactKey] {
        &self.effects[action.index()]
    }

    /// Dense indices of every catalogue condition equal to `condition`, keyed
    /// through the resolver that built this index. May repeat an index.
    pub fn condition_slots<'a>(
        &'a self,
        condition: &'a Condition,
    ) -> impl Iterator<Item = ConditionIndex> + 'a {
        self.catalogue.iter().flat_map(move |(id, action)| {
            action
                .conditions()
                .iter()
                .zip(self.conditions(id))
                .filter(move |(declared, _)| *declared == condition)
                .map(|(_, &slot)| slot)
        })
    }
}

fn effect_keys(action: &Action, resolver: &dyn KeyResolver) -> Vec<FactKey> {
    action
        .effects()
        .iter()
        .map(|effect| resolver.effect_key(action, effect))
        .collect()
}
