//! Tick orchestrator.
//!
//! The runner owns every planner set, submits resolve requests for agents
//! that need a plan and hands the finished plans back on the next collect.

use std::env;
use std::mem;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use goap_core::{ActionId, Graph, ResolveHandle, ResolverConfig};

use crate::api::{AgentId, PlanningAgent, Result, RunnerError};
use crate::metrics::RunnerMetrics;
use crate::set::PlannerSet;

/// Runner configuration shared by every registered set.
#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    pub resolver: ResolverConfig,
    /// Resolve on the calling thread instead of the blocking pool (default: false)
    pub inline_resolve: bool,
}

impl RunnerConfig {
    /// Loads configuration from environment variables.
    ///
    /// Variables: `GOAP_MAX_DEPTH` (search depth bound), `GOAP_INLINE_RESOLVE`
    /// (`true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`; anything else keeps
    /// the default).
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(depth) = read_env::<usize>("GOAP_MAX_DEPTH") {
            config.resolver.max_depth = depth.max(1);
        }

        if let Some(inline) = read_env_bool("GOAP_INLINE_RESOLVE") {
            config.inline_resolve = inline;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// A request submitted by [`GoapRunner::run`] and not yet collected.
struct PendingResolve {
    set: usize,
    agent: usize,
    agent_id: AgentId,
    goal: ActionId,
    handle: ResolveHandle,
    submitted_at: Instant,
}

/// Drives planner sets once per tick.
///
/// Design: `run` never blocks, so the host can keep simulating while searches
/// execute on the blocking pool; `complete` is the only await point.
pub struct GoapRunner {
    config: RunnerConfig,
    runtime: Option<Handle>,
    sets: Vec<PlannerSet>,
    pending: Vec<PendingResolve>,
    metrics: Arc<RunnerMetrics>,
    run_time: Duration,
    complete_time: Duration,
}

impl GoapRunner {
    pub fn builder() -> RunnerBuilder {
        RunnerBuilder::new()
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Adds a set and binds its resolver to the runner's dispatch mode.
    pub fn register(&mut self, mut set: PlannerSet) -> Result<()> {
        if self.knows(set.name()) {
            return Err(RunnerError::DuplicateSet(set.name().to_string()));
        }

        set.resolver.set_runtime(self.runtime.clone());
        set.resolver.set_config(self.config.resolver.clone());

        info!(set = set.name(), "planner set registered");
        self.sets.push(set);
        Ok(())
    }

    pub fn knows(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn set(&self, name: &str) -> Result<&PlannerSet> {
        self.position(name)
            .map(|i| &self.sets[i])
            .ok_or_else(|| RunnerError::UnknownSet(name.to_string()))
    }

    pub fn set_mut(&mut self, name: &str) -> Result<&mut PlannerSet> {
        match self.position(name) {
            Some(i) => Ok(&mut self.sets[i]),
            None => Err(RunnerError::UnknownSet(name.to_string())),
        }
    }

    /// Submits one resolve request per agent that has a goal and needs a plan.
    ///
    /// Returns the number of requests submitted. A rejected request aborts the
    /// pass; requests already submitted stay pending.
    pub fn run(&mut self) -> Result<usize> {
        let started = Instant::now();
        let mut submitted = 0;

        for (set_index, set) in self.sets.iter().enumerate() {
            for (agent_index, agent) in set.agents.iter().enumerate() {
                if !agent.needs_plan() {
                    continue;
                }
                let Some(goal) = agent.goal() else {
                    continue;
                };

                let agent_id = agent.id();
                let request = set
                    .snapshot_for(agent.as_ref(), goal)
                    .and_then(|snapshot| set.resolver.start_resolve(snapshot));

                let handle = match request {
                    Ok(handle) => handle,
                    Err(source) => {
                        self.metrics.record_rejected();
                        self.run_time = started.elapsed();
                        return Err(RunnerError::AgentResolve {
                            set: set.name().to_string(),
                            agent: agent_id,
                            source,
                        });
                    }
                };

                self.metrics.record_submitted();
                self.pending.push(PendingResolve {
                    set: set_index,
                    agent: agent_index,
                    agent_id,
                    goal,
                    handle,
                    submitted_at: Instant::now(),
                });
                submitted += 1;
            }
        }

        self.run_time = started.elapsed();
        debug!(submitted, pending = self.pending.len(), "run pass finished");
        Ok(submitted)
    }

    /// Waits for every pending request and delivers the plans to their agents.
    ///
    /// Returns the number of plans delivered. Requests whose search vanished
    /// are logged and counted as failures.
    pub async fn complete(&mut self) -> usize {
        let started = Instant::now();
        let pending = mem::take(&mut self.pending);
        let mut delivered = 0;

        for request in pending {
            let plan = match request.handle.wait().await {
                Ok(plan) => plan,
                Err(error) => {
                    warn!(agent = %request.agent_id, %error, "resolve result lost");
                    self.metrics.record_lost();
                    continue;
                }
            };

            self.metrics
                .record_completed(plan.len(), request.submitted_at.elapsed());

            let Some(agent) = self.recipient(request.set, request.agent, &request.agent_id) else {
                warn!(agent = %request.agent_id, "agent left its set, plan dropped");
                continue;
            };

            debug!(
                agent = %request.agent_id,
                goal = %request.goal,
                steps = plan.len(),
                "plan delivered"
            );
            agent.receive_plan(request.goal, plan);
            delivered += 1;
        }

        self.complete_time = started.elapsed();
        delivered
    }

    /// One `run` followed by one `complete`.
    pub async fn tick(&mut self) -> Result<usize> {
        self.run()?;
        Ok(self.complete().await)
    }

    /// Duration of the last `run` pass.
    pub fn run_time(&self) -> Duration {
        self.run_time
    }

    /// Duration of the last `complete` pass.
    pub fn complete_time(&self) -> Duration {
        self.complete_time
    }

    pub fn graph(&self, name: &str) -> Result<Graph> {
        Ok(self.set(name)?.resolver().graph()?)
    }

    pub fn agents(&self, name: &str) -> Result<&[Box<dyn PlanningAgent>]> {
        Ok(self.set(name)?.agents())
    }

    pub fn metrics(&self) -> Arc<RunnerMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Collects pending requests, then disposes every resolver.
    pub async fn shutdown(mut self) -> Result<()> {
        self.complete().await;
        for set in &mut self.sets {
            set.resolver.dispose()?;
        }

        let metrics = self.metrics.snapshot();
        info!(
            submitted = metrics.submitted,
            resolved = metrics.resolved,
            empty = metrics.empty,
            failed = metrics.failed,
            "runner shut down"
        );
        Ok(())
    }

    /// The agent a request was submitted for, found by id if the set's
    /// agents were reordered since `run`.
    fn recipient(
        &mut self,
        set: usize,
        slot: usize,
        agent_id: &AgentId,
    ) -> Option<&mut Box<dyn PlanningAgent>> {
        let agents = &mut self.sets.get_mut(set)?.agents;
        let index = match agents.get(slot) {
            Some(agent) if agent.id() == *agent_id => slot,
            _ => agents
                .iter()
                .position(|agent| agent.id() == *agent_id)?,
        };
        agents.get_mut(index)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.sets.iter().position(|set| set.name() == name)
    }
}

/// Builder for [`GoapRunner`].
pub struct RunnerBuilder {
    config: RunnerConfig,
    runtime: Option<Handle>,
    sets: Vec<PlannerSet>,
}

impl RunnerBuilder {
    fn new() -> Self {
        Self {
            config: RunnerConfig::default(),
            runtime: None,
            sets: Vec::new(),
        }
    }

    pub fn config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    /// Dispatches searches to this runtime instead of the ambient one.
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn register(mut self, set: PlannerSet) -> Self {
        self.sets.push(set);
        self
    }

    /// Builds the runner.
    ///
    /// Without an explicit runtime the ambient tokio runtime is used; outside
    /// one, or with `inline_resolve`, searches run on the calling thread.
    pub fn build(self) -> Result<GoapRunner> {
        let runtime = if self.config.inline_resolve {
            None
        } else {
            self.runtime.or_else(|| Handle::try_current().ok())
        };

        if runtime.is_none() && !self.config.inline_resolve {
            warn!("no tokio runtime available, resolving inline");
        }

        let mut runner = GoapRunner {
            config: self.config,
            runtime,
            sets: Vec::new(),
            pending: Vec::new(),
            metrics: Arc::new(RunnerMetrics::new()),
            run_time: Duration::ZERO,
            complete_time: Duration::ZERO,
        };

        for set in self.sets {
            runner.register(set)?;
        }

        Ok(runner)
    }
}
