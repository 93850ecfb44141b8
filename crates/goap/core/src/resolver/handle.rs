use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::oneshot;

use super::ActionPlan;
use crate::error::{ResolveError, Result};
use crate::types::ActionId;

/// One in-flight resolution.
///
/// Returned by [`GraphResolver::start_resolve`](super::GraphResolver::start_resolve)
/// without waiting for the search. Collect the plan with [`complete`](Self::complete)
/// from synchronous code or [`wait`](Self::wait) from async code. Dropping a
/// handle discards its result; the search itself always runs to completion.
#[derive(Debug)]
pub struct ResolveHandle {
    root: ActionId,
    receiver: oneshot::Receiver<ActionPlan>,
    _lease: Lease,
}

impl ResolveHandle {
    pub(crate) fn new(
        root: ActionId,
        receiver: oneshot::Receiver<ActionPlan>,
        lease: Lease,
    ) -> Self {
        Self {
            root,
            receiver,
            _lease: lease,
        }
    }

    /// Root action this handle is resolving.
    pub fn root(&self) -> ActionId {
        self.root
    }

    /// Blocks the calling thread until the plan is ready.
    ///
    /// # Panics
    ///
    /// Panics if called from within an async execution context; use
    /// [`wait`](Self::wait) there instead.
    pub fn complete(self) -> Result<ActionPlan> {
        self.receiver
            .blocking_recv()
            .map_err(|_| ResolveError::WorkerDropped)
    }

    /// Waits for the plan without blocking the executor.
    pub async fn wait(self) -> Result<ActionPlan> {
        self.receiver.await.map_err(|_| ResolveError::WorkerDropped)
    }

    /// Returns the plan if the search has already finished.
    ///
    /// Once this has returned a plan the handle is spent; later calls report
    /// [`ResolveError::WorkerDropped`].
    pub fn try_complete(&mut self) -> Result<Option<ActionPlan>> {
        match self.receiver.try_recv() {
            Ok(plan) => Ok(Some(plan)),
            Err(oneshot::error::TryRecvError::Empty) => Ok(None),
            Err(oneshot::error::TryRecvError::Closed) => Err(ResolveError::WorkerDropped),
        }
    }
}

/// Counts a handle as outstanding on its resolver until dropped.
#[derive(Debug)]
pub(crate) struct Lease(Arc<AtomicUsize>);

impl Lease {
    pub(crate) fn acquire(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self(Arc::clone(counter))
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}
