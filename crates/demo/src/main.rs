//! Crafting-camp demo: a handful of workers plan against one shared catalogue.
mod agent;
mod catalogue;
mod world;

use std::collections::HashMap;
use std::env;
use std::sync::Arc;

use anyhow::Result;
use goap_core::Position;
use goap_runtime::{AgentId, GoapRunner, PlannerSet, RunnerConfig};
use tracing::info;

use agent::Worker;
use catalogue::{holding, in_world};
use world::{Facts, FactSensor, SiteSensor, World};

const TICKS: usize = 6;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();

    let config = RunnerConfig::from_env();
    let catalogue = Arc::new(catalogue::build());
    let world = World::new(sites());

    let mut set = PlannerSet::builder(catalogue::SET_NAME)
        .catalogue(catalogue.as_ref().clone())
        .sensor(FactSensor::new(world.clone()))
        .target_sensor(SiteSensor::new(world.clone()))
        .build();

    for (id, position, facts) in workers() {
        world.spawn(id, position, facts);
        set.add_agent(Worker::new(id, Arc::clone(&catalogue), world.clone()));
    }

    let mut runner = GoapRunner::builder().config(config).register(set).build()?;

    if print_graph() {
        let graph = runner.graph(catalogue::SET_NAME)?;
        println!("{}", serde_json::to_string_pretty(&graph)?);
    }

    for tick in 0..TICKS {
        let delivered = runner.tick().await?;
        info!(
            tick,
            delivered,
            run = ?runner.run_time(),
            complete = ?runner.complete_time(),
            "tick finished"
        );
    }

    let metrics = runner.metrics().snapshot();
    info!(
        resolved = metrics.resolved,
        empty = metrics.empty,
        peak_in_flight = metrics.peak_in_flight,
        avg_resolve_time = ?metrics.avg_resolve_time,
        "demo finished"
    );

    runner.shutdown().await?;
    Ok(())
}

/// Setup logging to stderr
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_graph() -> bool {
    matches!(
        env::var("GOAP_PRINT_GRAPH").as_deref(),
        Ok("1") | Ok("true")
    )
}

fn sites() -> HashMap<String, Position> {
    [
        ("pickup_wood", Position::new(8.0, 0.0, 0.0)),
        ("pickup_iron", Position::new(-6.0, 0.0, 3.0)),
        ("pickup_food", Position::new(0.0, 0.0, -4.0)),
        ("pickup_axe", Position::new(2.0, 0.0, 2.0)),
        ("pickup_pickaxe", Position::new(2.0, 0.0, 2.0)),
        ("gather_wood", Position::new(12.0, 0.0, 5.0)),
        ("gather_iron", Position::new(-10.0, 0.0, 8.0)),
        ("create_axe", Position::new(2.0, 0.0, 2.0)),
        ("create_pickaxe", Position::new(2.0, 0.0, 2.0)),
        ("haul_item", Position::new(-1.0, 0.0, 1.0)),
        ("eat", Position::new(0.0, 0.0, -3.0)),
    ]
    .into_iter()
    .map(|(name, position)| (name.to_string(), position))
    .collect()
}

fn workers() -> Vec<(AgentId, Position, Facts)> {
    let stocked = Facts::default()
        .with(in_world("wood"), true)
        .with(in_world("iron"), true)
        .with(in_world("food"), true);

    vec![
        (
            AgentId(0),
            Position::ORIGIN,
            stocked.clone().with("hungry", true),
        ),
        (
            AgentId(1),
            Position::new(5.0, 0.0, 0.0),
            stocked.clone().with("items_on_floor", true),
        ),
        (
            AgentId(2),
            Position::new(-3.0, 0.0, 4.0),
            stocked.clone().with(holding("wood"), true),
        ),
        (AgentId(3), Position::new(10.0, 0.0, -2.0), Facts::default()),
    ]
}
