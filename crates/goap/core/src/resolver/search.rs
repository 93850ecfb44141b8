//! Backward cost search over the connection graph.
//!
//! Every condition of an action must hold (AND); every condition key can be
//! satisfied by any one of its producers (OR). For each key the search costs
//! every producer's full subtree and keeps the cheapest one, so a nearby
//! chain of cheap actions can beat a distant or expensive executable action.
//!
//! Branch cost of a producer `p` reached from a node at position `origin`:
//!
//! ```text
//! cost(p) + distance(origin, position(p)) + Σ cost of p's resolved conditions
//! ```
//!
//! where `p`'s conditions are resolved with `position(p)` as their origin.
//! Executable producers end the branch; non-executable producers without
//! conditions are dead ends.
//!
//! The outcome of expanding an action is memoised per call. An entry is only
//! recorded when its subtree was never cut by the cycle guard or the depth
//! bound, and only reused when none of the candidates it evaluated are on the
//! current path and the request is no deeper than when it was recorded. Under
//! those conditions a fresh expansion would produce the same branch, so shared
//! prerequisites are solved once instead of once per consumer.

use tracing::trace;

use crate::graph::ConnectionIndex;
use crate::snapshot::RequestSnapshot;
use crate::types::{ActionId, ConditionIndex, Position};

use super::ActionPlan;

/// Outcome of resolving an action's conditions or a single key.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Branch {
    /// Satisfiable; `actions` are in execution order and may contain repeats.
    Resolved { cost: f32, actions: Vec<ActionId> },
    Unsatisfiable,
}

impl Branch {
    fn free() -> Self {
        Branch::Resolved {
            cost: 0.0,
            actions: Vec::new(),
        }
    }
}

/// A recorded expansion, reusable while its preconditions hold.
struct Memo {
    depth: usize,
    /// Every candidate evaluated below the expanded action, deduplicated.
    touched: Vec<ActionId>,
    branch: Branch,
}

/// Scratch state of one resolve call. Dropped together with the call.
pub(crate) struct Search<'a> {
    index: &'a ConnectionIndex,
    snapshot: &'a RequestSnapshot,
    max_depth: usize,
    /// Actions currently being expanded; guards against catalogue cycles.
    on_path: Vec<bool>,
    /// Expansion results by [`ActionId`].
    memo: Vec<Option<Memo>>,
    /// Candidates evaluated so far, in evaluation order.
    touched: Vec<ActionId>,
    /// Candidates rejected by the cycle guard or the depth bound.
    cuts: usize,
    expansions: usize,
}

impl<'a> Search<'a> {
    pub(crate) fn new(
        index: &'a ConnectionIndex,
        snapshot: &'a RequestSnapshot,
        max_depth: usize,
    ) -> Self {
        Self {
            index,
            snapshot,
            max_depth,
            on_path: vec![false; index.action_count()],
            memo: std::iter::repeat_with(|| None)
                .take(index.action_count())
                .collect(),
            touched: Vec::new(),
            cuts: 0,
            expansions: 0,
        }
    }

    /// Resolves the snapshot's root. The root itself is never part of the plan.
    pub(crate) fn run(mut self) -> ActionPlan {
        let root = self.snapshot.root;
        match self.expand(root, 0) {
            Branch::Resolved { cost, actions } => {
                trace!(%root, cost, expansions = self.expansions, "root resolved");
                ActionPlan::from_branch(actions, self.index.action_count())
            }
            Branch::Unsatisfiable => {
                trace!(%root, expansions = self.expansions, "root unsatisfiable");
                ActionPlan::empty()
            }
        }
    }

    /// Resolves every condition of `action`, using its position as origin.
    fn expand(&mut self, action: ActionId, depth: usize) -> Branch {
        self.expansions += 1;
        self.on_path[action.index()] = true;

        let origin = self.snapshot.position(action);
        let mut total = 0.0;
        let mut actions = Vec::new();
        let mut outcome = None;

        for &key in self.index.conditions(action) {
            match self.resolve_key(key, origin, depth) {
                Branch::Resolved { cost, actions: sub } => {
                    total += cost;
                    actions.extend(sub);
                }
                Branch::Unsatisfiable => {
                    outcome = Some(Branch::Unsatisfiable);
                    break;
                }
            }
        }

        self.on_path[action.index()] = false;
        outcome.unwrap_or(Branch::Resolved {
            cost: total,
            actions,
        })
    }

    /// [`expand`](Self::expand) through the per-call memo.
    fn expand_memoised(&mut self, action: ActionId, depth: usize) -> Branch {
        if let Some(memo) = &self.memo[action.index()] {
            let reusable = depth <= memo.depth
                && memo.touched.iter().all(|id| !self.on_path[id.index()]);
            if reusable {
                self.touched.extend_from_slice(&memo.touched);
                return memo.branch.clone();
            }
        }

        let cuts = self.cuts;
        let start = self.touched.len();
        let branch = self.expand(action, depth);

        if self.cuts == cuts {
            let mut touched = self.touched[start..].to_vec();
            touched.sort_unstable();
            touched.dedup();
            self.touched.truncate(start);
            self.touched.extend_from_slice(&touched);
            self.memo[action.index()] = Some(Memo {
                depth,
                touched,
                branch: branch.clone(),
            });
        }

        branch
    }

    /// Picks the cheapest producer of `key`. Ties keep the earlier candidate.
    fn resolve_key(&mut self, key: ConditionIndex, origin: Position, depth: usize) -> Branch {
        if self.snapshot.is_met(key) {
            return Branch::free();
        }

        let mut best: Option<(f32, Vec<ActionId>)> = None;

        for &candidate in self.index.producers(key) {
            let branch = self.resolve_candidate(candidate, origin, depth);
            let Branch::Resolved { cost, actions } = branch else {
                continue;
            };

            let cheaper = best.as_ref().is_none_or(|(best_cost, _)| cost < *best_cost);
            if cheaper {
                best = Some((cost, actions));
            }
        }

        match best {
            Some((cost, actions)) => Branch::Resolved { cost, actions },
            None => {
                trace!(key = %self.index.key(key), "no viable producer");
                Branch::Unsatisfiable
            }
        }
    }

    fn resolve_candidate(&mut self, candidate: ActionId, origin: Position, depth: usize) -> Branch {
        self.touched.push(candidate);

        if self.on_path[candidate.index()] {
            self.cuts += 1;
            return Branch::Unsatisfiable;
        }

        let step = self.snapshot.cost(candidate)
            + origin.distance(self.snapshot.position(candidate));

        if self.snapshot.is_executable(candidate) {
            return Branch::Resolved {
                cost: step,
                actions: vec![candidate],
            };
        }

        if self.index.conditions(candidate).is_empty() {
            trace!(%candidate, "dead end");
            return Branch::Unsatisfiable;
        }

        if depth >= self.max_depth {
            trace!(%candidate, depth, "max depth reached");
            self.cuts += 1;
            return Branch::Unsatisfiable;
        }

        match self.expand_memoised(candidate, depth + 1) {
            Branch::Resolved { cost, mut actions } => {
                actions.push(candidate);
                Branch::Resolved {
                    cost: step + cost,
                    actions,
                }
            }
            Branch::Unsatisfiable => Branch::Unsatisfiable,
        }
    }
}
