use goap_core::{
    Action, ActionId, ActionPlan, Catalogue, Condition, Effect, GraphResolver, Position,
    RequestSnapshot, ResolveError, SnapshotBuilder, WorldKeyResolver,
};

fn condition(name: &str) -> Condition {
    Condition::is(name)
}

fn effect(name: &str) -> Effect {
    Effect::is(name)
}

fn resolve(resolver: &GraphResolver, builder: &SnapshotBuilder, root: ActionId) -> ActionPlan {
    resolver
        .start_resolve(builder.build(root))
        .unwrap()
        .complete()
        .unwrap()
}

/// goal <- connection <- {action1 <- connection1 <- action11 <- connection2 <- action111,
///                        action2 <- connection2}
struct Chains {
    resolver: GraphResolver,
    goal: ActionId,
    action1: ActionId,
    action2: ActionId,
    action11: ActionId,
    action111: ActionId,
}

fn chains() -> Chains {
    let mut catalogue = Catalogue::new();
    let goal = catalogue.push(Action::goal("goal").with_condition(condition("connection")));
    let action1 = catalogue.push(
        Action::new("action1")
            .with_effect(effect("connection"))
            .with_condition(condition("connection1")),
    );
    let action2 = catalogue.push(
        Action::new("action2")
            .with_effect(effect("connection"))
            .with_condition(condition("connection2")),
    );
    let action11 = catalogue.push(
        Action::new("action11")
            .with_effect(effect("connection1"))
            .with_condition(condition("connection2")),
    );
    let action111 = catalogue.push(Action::new("action111").with_effect(effect("connection2")));

    Chains {
        resolver: GraphResolver::new(catalogue, &WorldKeyResolver),
        goal,
        action1,
        action2,
        action11,
        action111,
    }
}

#[test]
fn resolve_with_no_actions_returns_empty_plan() {
    let mut resolver = GraphResolver::new(Catalogue::new(), &WorldKeyResolver);

    let handle = resolver
        .start_resolve(RequestSnapshot {
            root: ActionId(0),
            executable: vec![false],
            positions: vec![Position::ORIGIN],
            costs: vec![1.0],
            conditions_met: vec![false],
        })
        .unwrap();
    let plan = handle.complete().unwrap();

    resolver.dispose().unwrap();
    assert!(plan.is_empty());
}

#[test]
fn resolve_with_one_executable_connection_returns_action() {
    let mut catalogue = Catalogue::new();
    let goal = catalogue.push(Action::goal("goal").with_condition(condition("connection")));
    let action = catalogue.push(Action::new("action").with_effect(effect("connection")));
    let resolver = GraphResolver::new(catalogue, &WorldKeyResolver);

    let plan = resolver
        .start_resolve(RequestSnapshot {
            root: goal,
            executable: vec![false, true],
            positions: vec![Position::ORIGIN; 2],
            costs: vec![1.0, 1.0],
            conditions_met: vec![false],
        })
        .unwrap()
        .complete()
        .unwrap();

    assert_eq!(plan.as_slice(), &[action]);
}

#[test]
fn resolve_with_multiple_connections_returns_executable_action() {
    let mut catalogue = Catalogue::new();
    let goal = catalogue.push(Action::goal("goal").with_condition(condition("connection")));
    catalogue.push(Action::new("action1").with_effect(effect("connection")));
    catalogue.push(Action::new("action2").with_effect(effect("connection")));
    let third = catalogue.push(Action::new("action3").with_effect(effect("connection")));
    let resolver = GraphResolver::new(catalogue, &WorldKeyResolver);

    let mut builder = resolver.snapshot_builder().unwrap();
    builder.executable.set_executable(third, true);

    assert_eq!(resolve(&resolver, &builder, goal).as_slice(), &[third]);
}

#[test]
fn resolve_with_nested_connections_discards_dead_end() {
    let mut catalogue = Catalogue::new();
    let goal = catalogue.push(Action::goal("goal").with_condition(condition("connection")));
    let action1 = catalogue.push(
        Action::new("action1")
            .with_effect(effect("connection"))
            .with_condition(condition("connection2")),
    );
    let action2 = catalogue.push(
        Action::new("action2")
            .with_effect(effect("connection"))
            .with_condition(condition("connection3")),
    );
    let action11 = catalogue.push(Action::new("action11").with_effect(effect("connection2")));
    let action22 = catalogue.push(Action::new("action22").with_effect(effect("connection3")));
    let mut resolver = GraphResolver::new(catalogue, &WorldKeyResolver);

    let mut executable = resolver.executable_builder().unwrap();
    executable.set_executable(action11, true);
    let conditions = resolver.condition_builder().unwrap();

    let plan = resolver
        .start_resolve(RequestSnapshot {
            root: goal,
            executable: executable.build(),
            positions: resolver.position_builder().unwrap().build(),
            costs: resolver.cost_builder().unwrap().build(),
            conditions_met: conditions.build(),
        })
        .unwrap()
        .complete()
        .unwrap();

    resolver.dispose().unwrap();
    assert_eq!(plan.as_slice(), &[action11, action1]);
    assert!(!plan.as_slice().contains(&action2));
    assert!(!plan.as_slice().contains(&action22));
}

#[test]
fn resolve_includes_location_heuristics() {
    let chains = chains();
    let mut builder = chains.resolver.snapshot_builder().unwrap();
    builder
        .executable
        .set_executable(chains.action111, true)
        .set_executable(chains.action2, true);
    builder
        .positions
        .set_position(chains.goal, Position::new(1.0, 0.0, 0.0))
        .set_position(chains.action1, Position::new(2.0, 0.0, 0.0))
        .set_position(chains.action11, Position::new(3.0, 0.0, 0.0))
        .set_position(chains.action111, Position::new(4.0, 0.0, 0.0))
        // far away from the goal
        .set_position(chains.action2, Position::new(10.0, 0.0, 0.0));

    let plan = resolve(&chains.resolver, &builder, chains.goal);

    assert_eq!(
        plan.as_slice(),
        &[chains.action111, chains.action11, chains.action1]
    );
}

#[test]
fn resolve_includes_cost_heuristics() {
    let chains = chains();
    let mut builder = chains.resolver.snapshot_builder().unwrap();
    builder
        .executable
        .set_executable(chains.action111, true)
        .set_executable(chains.action2, true);
    // action2 is directly executable but very expensive
    builder.costs.set_cost(chains.action2, 100.0);

    let plan = resolve(&chains.resolver, &builder, chains.goal);

    assert_eq!(
        plan.as_slice(),
        &[chains.action111, chains.action11, chains.action1]
    );
}

#[test]
fn cheap_executable_shortcut_beats_longer_chain() {
    let chains = chains();
    let mut builder = chains.resolver.snapshot_builder().unwrap();
    builder
        .executable
        .set_executable(chains.action111, true)
        .set_executable(chains.action2, true);

    let plan = resolve(&chains.resolver, &builder, chains.goal);

    assert_eq!(plan.as_slice(), &[chains.action2]);
}

#[test]
fn resolve_does_not_resolve_completed_condition() {
    let mut catalogue = Catalogue::new();
    let goal = catalogue.push(Action::goal("goal").with_condition(condition("root")));
    let root_action = catalogue.push(
        Action::new("action")
            .with_effect(effect("root"))
            .with_condition(condition("completed"))
            .with_condition(condition("incomplete")),
    );
    let completed = catalogue.push(Action::new("completedAction").with_effect(effect("completed")));
    let incomplete =
        catalogue.push(Action::new("incompleteAction").with_effect(effect("incomplete")));
    let resolver = GraphResolver::new(catalogue, &WorldKeyResolver);

    let mut builder = resolver.snapshot_builder().unwrap();
    builder
        .executable
        .set_executable(completed, true)
        .set_executable(incomplete, true);
    builder.conditions.set_condition(&condition("completed"), true);

    let plan = resolve(&resolver, &builder, goal);

    assert_eq!(plan.as_slice(), &[incomplete, root_action]);
}

#[test]
fn goal_with_every_condition_met_yields_empty_plan() {
    let chains = chains();
    let mut builder = chains.resolver.snapshot_builder().unwrap();
    builder.executable.set_executable(chains.action2, true);
    for name in ["connection", "connection1", "connection2"] {
        builder.conditions.set_condition(&condition(name), true);
    }

    assert!(resolve(&chains.resolver, &builder, chains.goal).is_empty());
}

#[test]
fn single_executable_candidate_is_the_whole_plan() {
    let chains = chains();
    let mut builder = chains.resolver.snapshot_builder().unwrap();
    builder.executable.set_executable(chains.action11, true);

    let plan = resolve(&chains.resolver, &builder, chains.goal);

    assert_eq!(plan.as_slice(), &[chains.action11, chains.action1]);
}

#[test]
fn unsatisfiable_goal_yields_empty_plan() {
    let chains = chains();
    let builder = chains.resolver.snapshot_builder().unwrap();

    // action111 is a non-executable leaf: every branch ends in a dead end
    assert!(resolve(&chains.resolver, &builder, chains.goal).is_empty());
}

#[test]
fn equal_cost_candidates_keep_catalogue_order() {
    let mut catalogue = Catalogue::new();
    let goal = catalogue.push(Action::goal("goal").with_condition(condition("connection")));
    let first = catalogue.push(Action::new("first").with_effect(effect("connection")));
    let second = catalogue.push(Action::new("second").with_effect(effect("connection")));
    let resolver = GraphResolver::new(catalogue, &WorldKeyResolver);

    let mut builder = resolver.snapshot_builder().unwrap();
    builder
        .executable
        .set_executable(second, true)
        .set_executable(first, true);

    assert_eq!(resolve(&resolver, &builder, goal).as_slice(), &[first]);
}

#[test]
fn resolving_twice_is_deterministic() {
    let chains = chains();
    let mut builder = chains.resolver.snapshot_builder().unwrap();
    builder
        .executable
        .set_executable(chains.action111, true)
        .set_executable(chains.action2, true);
    builder
        .positions
        .set_position(chains.action2, Position::new(0.0, 3.0, 4.0));

    let first = resolve(&chains.resolver, &builder, chains.goal);
    let second = resolve(&chains.resolver, &builder, chains.goal);

    assert_eq!(first, second);
}

#[test]
fn out_of_range_root_is_a_contract_violation() {
    let chains = chains();
    let builder = chains.resolver.snapshot_builder().unwrap();

    let err = chains
        .resolver
        .start_resolve(builder.build(ActionId(42)))
        .unwrap_err();

    assert_eq!(
        err,
        ResolveError::RootOutOfRange {
            root: ActionId(42),
            actions: 5
        }
    );
    assert_eq!(chains.resolver.outstanding(), 0);
}

#[test]
fn disposed_resolver_rejects_requests() {
    let mut chains = chains();
    let builder = chains.resolver.snapshot_builder().unwrap();

    chains.resolver.dispose().unwrap();

    assert!(chains.resolver.is_disposed());
    assert_eq!(
        chains.resolver.start_resolve(builder.build(chains.goal)).unwrap_err(),
        ResolveError::Disposed
    );
    assert!(chains.resolver.snapshot_builder().is_err());
    assert!(chains.resolver.action(chains.goal).is_none());
    assert_eq!(chains.resolver.dispose(), Ok(()));
}

#[test]
fn dispose_is_refused_while_handles_are_outstanding() {
    let mut chains = chains();
    let builder = chains.resolver.snapshot_builder().unwrap();

    let handle = chains.resolver.start_resolve(builder.build(chains.goal)).unwrap();
    assert_eq!(chains.resolver.outstanding(), 1);
    assert_eq!(
        chains.resolver.dispose(),
        Err(ResolveError::HandlesOutstanding { count: 1 })
    );

    handle.complete().unwrap();
    assert_eq!(chains.resolver.outstanding(), 0);
    assert_eq!(chains.resolver.dispose(), Ok(()));
}

#[test]
fn synchronous_resolve_matches_handle_result() {
    let chains = chains();
    let mut builder = chains.resolver.snapshot_builder().unwrap();
    builder.executable.set_executable(chains.action111, true);

    let direct = chains.resolver.resolve(builder.build(chains.goal)).unwrap();
    let handled = resolve(&chains.resolver, &builder, chains.goal);

    assert_eq!(direct, handled);
    assert_eq!(
        direct.as_slice(),
        &[chains.action111, chains.action11, chains.action1]
    );
}

#[test]
fn counts_and_lookups_go_dark_after_dispose() {
    let mut chains = chains();
    assert_eq!(chains.resolver.actions(), 5);
    assert_eq!(chains.resolver.connection_count(), 3);
    assert_eq!(chains.resolver.find("action11"), Some(chains.action11));
    assert_eq!(
        chains.resolver.action(chains.action2).map(Action::name),
        Some("action2")
    );

    chains.resolver.dispose().unwrap();

    assert_eq!(chains.resolver.actions(), 0);
    assert_eq!(chains.resolver.connection_count(), 0);
    assert_eq!(chains.resolver.find("action11"), None);
    assert_eq!(chains.resolver.graph(), Err(ResolveError::Disposed));
}

/// `layers` levels of two interchangeable producers, over one executable leaf.
fn layered(layers: usize) -> (GraphResolver, ActionId, ActionId) {
    let mut catalogue = Catalogue::new();
    let goal = catalogue.push(Action::goal("goal").with_condition(condition("k0")));
    let mut first = None;
    for level in 0..layers {
        for side in ["a", "b"] {
            let id = catalogue.push(
                Action::new(format!("{side}{level}"))
                    .with_condition(condition(&format!("k{}", level + 1)))
                    .with_effect(effect(&format!("k{level}"))),
            );
            if first.is_none() {
                first = Some(id);
            }
        }
    }
    let leaf = catalogue.push(Action::new("leaf").with_effect(effect(&format!("k{layers}"))));
    let resolver = GraphResolver::new(catalogue, &WorldKeyResolver);

    let mut builder = resolver.snapshot_builder().unwrap();
    builder.executable.set_executable(leaf, true);
    let plan = resolver.resolve(builder.build(goal)).unwrap();
    assert_eq!(plan.first(), Some(leaf));
    assert_eq!(plan.iter().last(), first);

    (resolver, goal, leaf)
}

#[test]
fn deep_layered_catalogue_resolves_quickly() {
    let started = std::time::Instant::now();
    let (resolver, goal, leaf) = layered(30);

    let mut builder = resolver.snapshot_builder().unwrap();
    builder.executable.set_executable(leaf, true);
    let plan = resolve(&resolver, &builder, goal);

    assert_eq!(plan.len(), 31);
    assert!(
        started.elapsed() < std::time::Duration::from_secs(2),
        "resolve took {:?}",
        started.elapsed()
    );
}

#[test]
fn non_finite_position_is_rejected() {
    let mut catalogue = Catalogue::new();
    let goal = catalogue.push(Action::goal("goal").with_condition(condition("connection")));
    let far = catalogue.push(Action::new("far").with_effect(effect("connection")));
    let near = catalogue.push(Action::new("near").with_effect(effect("connection")));
    let resolver = GraphResolver::new(catalogue, &WorldKeyResolver);

    let mut builder = resolver.snapshot_builder().unwrap();
    builder
        .executable
        .set_executable(far, true)
        .set_executable(near, true);
    builder
        .positions
        .set_position(far, Position::new(f32::NAN, 0.0, 0.0));

    match resolver.start_resolve(builder.build(goal)) {
        Err(ResolveError::InvalidPosition { action, .. }) => assert_eq!(action, far),
        other => panic!("expected InvalidPosition, got {other:?}"),
    }
    assert_eq!(resolver.outstanding(), 0);
}

#[test]
#[should_panic(expected = "out of range")]
fn builder_rejects_action_outside_catalogue() {
    let chains = chains();
    let mut builder = chains.resolver.snapshot_builder().unwrap();
    builder.executable.set_executable(ActionId(99), true);
}
