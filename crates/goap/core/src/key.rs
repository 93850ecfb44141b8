//! Fact keys and the strategy that derives them.
//!
//! Effects and conditions are matched by a derived [`FactKey`] rather than by
//! object identity, so actions authored independently still connect whenever
//! they talk about the same world key with the same polarity.

use std::fmt;

use crate::action::{Action, Condition, Effect, WorldKey};

/// Canonical identity of a (world key, polarity) pair.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FactKey {
    world_key: WorldKey,
    positive: bool,
}

impl FactKey {
    pub fn new(world_key: impl Into<WorldKey>, positive: bool) -> Self {
        Self {
            world_key: world_key.into(),
            positive,
        }
    }

    pub fn world_key(&self) -> &WorldKey {
        &self.world_key
    }

    pub fn positive(&self) -> bool {
        self.positive
    }
}

impl From<&Condition> for FactKey {
    fn from(condition: &Condition) -> Self {
        Self::new(condition.key.clone(), condition.positive)
    }
}

impl From<&Effect> for FactKey {
    fn from(effect: &Effect) -> Self {
        Self::new(effect.key.clone(), effect.positive)
    }
}

impl fmt::Display for FactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = if self.positive { "_true" } else { "_false" };
        write!(f, "{}{}", self.world_key, suffix)
    }
}

/// Derives the fact key used to match an action's conditions and effects.
///
/// Implementations may fold the owning action into the key (e.g. to scope a
/// fact per target type); the graph only ever compares the resulting keys.
pub trait KeyResolver: Send + Sync {
    fn condition_key(&self, action: &Action, condition: &Condition) -> FactKey;

    fn effect_key(&self, action: &Action, effect: &Effect) -> FactKey;
}

/// Default resolver: the key is the world key name plus its polarity.
#[derive(Clone, Copy, Debug, Default)]
pub struct WorldKeyResolver;

impl KeyResolver for WorldKeyResolver {
    fn condition_key(&self, _action: &Action, condition: &Condition) -> FactKey {
        FactKey::from(condition)
    }

    fn effect_key(&self, _action: &Action, effect: &Effect) -> FactKey {
        FactKey::from(effect)
    }
}
