//! Crafting-camp catalogue: gather and craft tools, keep fed, keep the floor clean.
use goap_core::{Action, Catalogue, Condition, Effect};

pub const SET_NAME: &str = "camp";

pub mod goals {
    pub const WANDER: &str = "wander_goal";
    pub const CREATE_AXE: &str = "create_axe_goal";
    pub const CREATE_PICKAXE: &str = "create_pickaxe_goal";
    pub const CLEAN_ITEMS: &str = "clean_items_goal";
    pub const FIX_HUNGER: &str = "fix_hunger_goal";
    pub const GATHER_IRON: &str = "gather_iron_goal";
    pub const GATHER_WOOD: &str = "gather_wood_goal";
}

/// Items an agent can pick up from the world.
const ITEMS: [&str; 5] = ["wood", "iron", "pickaxe", "axe", "food"];

pub fn holding(item: &str) -> String {
    format!("holding_{item}")
}

pub fn in_world(item: &str) -> String {
    format!("{item}_in_world")
}

pub fn created(tool: &str) -> String {
    format!("created_{tool}")
}

pub fn build() -> Catalogue {
    let mut catalogue = Catalogue::new();

    // Goals
    catalogue.push(Action::goal(goals::WANDER).with_condition(Condition::is("wandering")));
    catalogue.push(Action::goal(goals::CREATE_AXE).with_condition(Condition::is(created("axe"))));
    catalogue.push(
        Action::goal(goals::CREATE_PICKAXE).with_condition(Condition::is(created("pickaxe"))),
    );
    catalogue.push(
        Action::goal(goals::CLEAN_ITEMS).with_condition(Condition::is_not("items_on_floor")),
    );
    catalogue.push(Action::goal(goals::FIX_HUNGER).with_condition(Condition::is_not("hungry")));
    catalogue.push(Action::goal(goals::GATHER_IRON).with_condition(Condition::is(holding("iron"))));
    catalogue.push(Action::goal(goals::GATHER_WOOD).with_condition(Condition::is(holding("wood"))));

    // Actions
    catalogue.push(Action::new("wander").with_effect(Effect::is("wandering")));

    for item in ITEMS {
        catalogue.push(
            Action::new(format!("pickup_{item}"))
                .with_condition(Condition::is(in_world(item)))
                .with_effect(Effect::is(holding(item))),
        );
    }

    for (resource, tool) in [("wood", "axe"), ("iron", "pickaxe")] {
        catalogue.push(
            Action::new(format!("gather_{resource}"))
                .with_condition(Condition::is(holding(tool)))
                .with_effect(Effect::is(holding(resource))),
        );
    }

    for tool in ["pickaxe", "axe"] {
        catalogue.push(
            Action::new(format!("create_{tool}"))
                .with_condition(Condition::is(holding("wood")))
                .with_condition(Condition::is(holding("iron")))
                .with_effect(Effect::is(created(tool)))
                .with_effect(Effect::is(in_world(tool))),
        );
    }

    catalogue.push(
        Action::new("haul_item")
            .with_condition(Condition::is("items_on_floor"))
            .with_effect(Effect::is_not("items_on_floor")),
    );

    catalogue.push(
        Action::new("eat")
            .with_condition(Condition::is(holding("food")))
            .with_effect(Effect::is_not("hungry")),
    );

    catalogue
}
