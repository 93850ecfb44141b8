//! Graph resolver: owns the connection index and runs resolve requests.
//!
//! The resolver is the only long-lived piece of state. Each call to
//! [`GraphResolver::start_resolve`] moves its snapshot into an independent
//! search that shares nothing with other searches except the read-only
//! [`ConnectionIndex`], so many agents can plan at once without locks.

mod handle;
mod plan;
mod search;

pub use handle::ResolveHandle;
pub use plan::ActionPlan;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::runtime::Handle as RuntimeHandle;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::action::{Action, Catalogue};
use crate::config::ResolverConfig;
use crate::error::{ResolveError, Result};
use crate::graph::{ConnectionIndex, Graph};
use crate::key::KeyResolver;
use crate::snapshot::{
    ConditionBuilder, CostBuilder, ExecutableBuilder, PositionBuilder, RequestSnapshot,
    SnapshotBuilder,
};
use crate::types::ActionId;

use handle::Lease;
use search::Search;

/// Resolves goals against a fixed catalogue.
///
/// # Dispatch
///
/// When bound to a tokio runtime (see [`on_runtime`](Self::on_runtime)) every
/// search runs on that runtime's blocking pool and `start_resolve` returns
/// immediately. Without a runtime the search runs on the calling thread and
/// the returned handle is already complete.
///
/// # Lifetime
///
/// [`dispose`](Self::dispose) releases the index. It is refused while handles
/// are outstanding, and every later request fails with
/// [`ResolveError::Disposed`].
#[derive(Debug)]
pub struct GraphResolver {
    index: Option<Arc<ConnectionIndex>>,
    config: ResolverConfig,
    runtime: Option<RuntimeHandle>,
    outstanding: Arc<AtomicUsize>,
}

impl GraphResolver {
    pub fn new(catalogue: Catalogue, keys: &dyn KeyResolver) -> Self {
        Self {
            index: Some(Arc::new(ConnectionIndex::build(catalogue, keys))),
            config: ResolverConfig::default(),
            runtime: None,
            outstanding: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.set_config(config);
        self
    }

    /// Applies to requests started after this call.
    pub fn set_config(&mut self, config: ResolverConfig) {
        self.config = config;
    }

    /// Runs searches on the blocking pool of the given runtime.
    pub fn on_runtime(mut self, runtime: RuntimeHandle) -> Self {
        self.set_runtime(Some(runtime));
        self
    }

    /// Rebinds (or unbinds) the runtime searches are dispatched to.
    pub fn set_runtime(&mut self, runtime: Option<RuntimeHandle>) {
        self.runtime = runtime;
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Submits a resolve request and returns its handle without waiting.
    ///
    /// Fails immediately on contract violations (out-of-range root, arrays that
    /// do not match the graph, invalid costs) or after disposal.
    pub fn start_resolve(&self, snapshot: RequestSnapshot) -> Result<ResolveHandle> {
        let index = Arc::clone(self.index()?);
        let root = snapshot.root;
        let (reply_tx, reply_rx) = oneshot::channel();

        if index.action_count() == 0 {
            debug!("empty catalogue, returning empty plan");
            let _ = reply_tx.send(ActionPlan::empty());
            return Ok(ResolveHandle::new(
                root,
                reply_rx,
                Lease::acquire(&self.outstanding),
            ));
        }

        snapshot.validate(&index)?;

        let lease = Lease::acquire(&self.outstanding);
        let max_depth = self.config.max_depth;
        let job = move || {
            let plan = Search::new(&index, &snapshot, max_depth).run();
            debug!(%root, steps = plan.len(), "resolve finished");
            // The handle may have been dropped; the result is discarded then.
            let _ = reply_tx.send(plan);
        };

        match &self.runtime {
            Some(runtime) => {
                runtime.spawn_blocking(job);
            }
            None => job(),
        }

        Ok(ResolveHandle::new(root, reply_rx, lease))
    }

    /// Resolves on the calling thread, bypassing any bound runtime.
    pub fn resolve(&self, snapshot: RequestSnapshot) -> Result<ActionPlan> {
        let index = self.index()?;
        if index.action_count() == 0 {
            return Ok(ActionPlan::empty());
        }
        snapshot.validate(index)?;
        Ok(Search::new(index, &snapshot, self.config.max_depth).run())
    }

    /// Number of handles that have been started but not yet completed or dropped.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }

    /// Releases the connection index.
    ///
    /// Disposing twice is a no-op.
    pub fn dispose(&mut self) -> Result<()> {
        let count = self.outstanding();
        if count > 0 {
            return Err(ResolveError::HandlesOutstanding { count });
        }
        if self.index.take().is_some() {
            info!("graph resolver disposed");
        }
        Ok(())
    }

    pub fn is_disposed(&self) -> bool {
        self.index.is_none()
    }

    pub fn index(&self) -> Result<&Arc<ConnectionIndex>> {
        self.index.as_ref().ok_or(ResolveError::Disposed)
    }

    pub fn action(&self, id: ActionId) -> Option<&Action> {
        self.index.as_ref()?.catalogue().get(id)
    }

    /// Number of actions in the catalogue; zero once disposed.
    pub fn actions(&self) -> usize {
        self.index.as_ref().map_or(0, |index| index.action_count())
    }

    /// Number of distinct condition keys; zero once disposed.
    pub fn connection_count(&self) -> usize {
        self.index.as_ref().map_or(0, |index| index.key_count())
    }

    /// Finds an action by name.
    pub fn find(&self, name: &str) -> Option<ActionId> {
        self.index.as_ref()?.catalogue().find(name)
    }

    /// Detached view of the connection graph.
    pub fn graph(&self) -> Result<Graph> {
        Ok(Graph::from_index(self.index()?))
    }

    pub fn executable_builder(&self) -> Result<ExecutableBuilder> {
        Ok(ExecutableBuilder::new(self.index()?.action_count()))
    }

    pub fn position_builder(&self) -> Result<PositionBuilder> {
        Ok(PositionBuilder::new(self.index()?.action_count()))
    }

    pub fn cost_builder(&self) -> Result<CostBuilder> {
        Ok(CostBuilder::new(self.index()?.action_count()))
    }

    pub fn condition_builder(&self) -> Result<ConditionBuilder> {
        Ok(ConditionBuilder::new(Arc::clone(self.index()?)))
    }

    pub fn snapshot_builder(&self) -> Result<SnapshotBuilder> {
        Ok(SnapshotBuilder::new(Arc::clone(self.index()?)))
    }
}

impl Drop for GraphResolver {
    fn drop(&mut self) {
        let count = self.outstanding();
        if count > 0 {
            warn!(count, "graph resolver dropped with outstanding resolve handles");
        }
    }
}
