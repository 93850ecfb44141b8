//! Per-request live data.
//!
//! A [`RequestSnapshot`] is created fresh for every resolve call and moved into
//! the search, so it can never change while a handle is outstanding. The
//! builders in [`builders`] fill its arrays with defaults for anything a
//! sensor did not set.

mod builders;

pub use builders::{
    ConditionBuilder, CostBuilder, ExecutableBuilder, PositionBuilder, SnapshotBuilder,
};

use strum::Display;

use crate::error::{ResolveError, Result};
use crate::graph::ConnectionIndex;
use crate::types::{ActionId, ConditionIndex, Position};

/// Cost assumed for actions the snapshot has no entry for.
pub const DEFAULT_COST: f32 = 1.0;

/// Names of the snapshot arrays, used in error reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SnapshotField {
    Executable,
    Positions,
    Costs,
    ConditionsMet,
}

/// Live data for one resolve call.
///
/// Per-action arrays are indexed by [`ActionId`]; `conditions_met` is indexed by
/// [`ConditionIndex`].
#[derive(Clone, Debug, PartialEq)]
pub struct RequestSnapshot {
    /// Goal (or any action) whose conditions should be satisfied.
    pub root: ActionId,
    /// Actions that can run right now without satisfying their conditions.
    pub executable: Vec<bool>,
    /// Where each action takes place. Missing entries default to the origin.
    pub positions: Vec<Position>,
    /// Intrinsic cost of each action. Missing entries default to [`DEFAULT_COST`].
    pub costs: Vec<f32>,
    /// Condition keys that already hold in the live world.
    pub conditions_met: Vec<bool>,
}

impl RequestSnapshot {
    /// Checks the snapshot against the graph it is about to be resolved on.
    pub(crate) fn validate(&self, index: &ConnectionIndex) -> Result<()> {
        let actions = index.action_count();

        if self.root.index() >= actions {
            return Err(ResolveError::RootOutOfRange {
                root: self.root,
                actions,
            });
        }

        expect_len(SnapshotField::Executable, self.executable.len(), actions, false)?;
        expect_len(SnapshotField::Positions, self.positions.len(), actions, true)?;
        expect_len(SnapshotField::Costs, self.costs.len(), actions, true)?;
        expect_len(
            SnapshotField::ConditionsMet,
            self.conditions_met.len(),
            index.key_count(),
            false,
        )?;

        if let Some((index, &cost)) = self
            .costs
            .iter()
            .enumerate()
            .find(|(_, cost)| !cost.is_finite() || **cost < 0.0)
        {
            return Err(ResolveError::InvalidCost {
                action: ActionId::from_index(index),
                cost,
            });
        }

        if let Some((index, &position)) = self
            .positions
            .iter()
            .enumerate()
            .find(|(_, position)| !position.is_finite())
        {
            return Err(ResolveError::InvalidPosition {
                action: ActionId::from_index(index),
                position,
            });
        }

        Ok(())
    }

    #[inline]
    pub(crate) fn is_executable(&self, action: ActionId) -> bool {
        self.executable[action.index()]
    }

    #[inline]
    pub(crate) fn position(&self, action: ActionId) -> Position {
        self.positions
            .get(action.index())
            .copied()
            .unwrap_or(Position::ORIGIN)
    }

    #[inline]
    pub(crate) fn cost(&self, action: ActionId) -> f32 {
        self.costs
            .get(action.index())
            .copied()
            .unwrap_or(DEFAULT_COST)
    }

    #[inline]
    pub(crate) fn is_met(&self, key: ConditionIndex) -> bool {
        self.conditions_met[key.index()]
    }
}

/// Arrays may never be longer than the graph; only `positions` and `costs`
/// may be shorter.
fn expect_len(
    field: SnapshotField,
    actual: usize,
    expected: usize,
    allow_short: bool,
) -> Result<()> {
    if actual > expected || (!allow_short && actual < expected) {
        return Err(ResolveError::SnapshotLength {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}
