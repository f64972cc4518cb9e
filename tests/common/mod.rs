//! Shared fixtures for integration tests.

#![allow(dead_code)]

use factorio_calc::data::GameData;
use factorio_calc::models::{Belt, ItemAmount, Machine, Recipe};

pub fn recipe(
    id: &str,
    machine: &str,
    craft_time: f64,
    ingredients: &[(&str, f64)],
    products: &[(&str, f64)],
    allow_productivity: bool,
) -> Recipe {
    Recipe {
        id: id.to_string(),
        ingredients: ingredients.iter().map(|(i, a)| ItemAmount::new(*i, *a)).collect(),
        products: products.iter().map(|(p, a)| ItemAmount::new(*p, *a)).collect(),
        craft_time,
        preferred_machine: machine.to_string(),
        allow_productivity,
        category: vec!["Test".to_string()],
    }
}

pub fn machine(id: &str, speed: f64, productivity: f64) -> Machine {
    Machine {
        id: id.to_string(),
        name: format!("{}_machine", id),
        speed_multiplier: speed,
        productivity_bonus: productivity,
        module_slots: 0,
    }
}

pub fn belt(color: &str, rate: f64) -> Belt {
    Belt {
        color: color.to_string(),
        items_per_second: rate,
    }
}

pub fn belts() -> Vec<Belt> {
    vec![belt("yellow", 15.0), belt("red", 30.0), belt("blue", 45.0)]
}

pub fn sample_recipes() -> Vec<Recipe> {
    vec![
        recipe("copper_cable", "crafting", 0.5, &[("copper_plate", 1.0)], &[("copper_cable", 1.0)], false),
        recipe("copper_plate", "smelting", 3.2, &[("copper_ore", 1.0)], &[("copper_plate", 1.0)], true),
        recipe("iron_plate", "smelting", 3.2, &[("iron_ore", 1.0)], &[("iron_plate", 1.0)], true),
        recipe("iron_gear_wheel", "crafting", 0.5, &[("iron_plate", 2.0)], &[("iron_gear_wheel", 1.0)], true),
        recipe(
            "electronic_circuit",
            "electronics",
            0.5,
            &[("iron_plate", 1.0), ("copper_cable", 3.0)],
            &[("electronic_circuit", 1.0)],
            true,
        ),
        recipe(
            "transport_belt",
            "crafting",
            0.5,
            &[("iron_plate", 1.0), ("iron_gear_wheel", 1.0)],
            &[("transport_belt", 2.0)],
            false,
        ),
    ]
}

/// Machines: crafting (speed 1), smelting (speed 2), electronics (speed 1, +50%).
pub fn sample_machines(electronics_bonus: f64) -> Vec<Machine> {
    vec![
        machine("crafting", 1.0, 0.0),
        machine("smelting", 2.0, 0.0),
        machine("electronics", 1.0, electronics_bonus),
    ]
}

pub fn sample_data() -> GameData {
    GameData::new(sample_recipes(), sample_machines(0.5), belts()).expect("valid fixture")
}

pub fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-9 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}

pub const SAMPLE_JSON: &str = r#"{
    "belt_speeds": { "yellow": 15, "red": 30, "blue": 45 },
    "modules": { "speed_module": { "speed": 0.2, "productivity": 0.0 } },
    "machines": {
        "assembling_machine_1": { "crafting_speed": 0.5, "module_slots": 0, "categories": ["crafting"] },
        "assembling_machine_3": { "crafting_speed": 1.25, "module_slots": 4, "categories": ["crafting", "crafting_with_fluid"] },
        "stone_furnace": { "crafting_speed": 1, "module_slots": 0, "categories": ["smelting"] },
        "electromagnetic_plant": { "crafting_speed": 2, "module_slots": 5, "categories": ["electronics"], "base_productivity": 0.5 }
    },
    "recipes": {
        "iron_plate": {
            "preferred_machine": "smelting",
            "category": ["Intermediate products", "Smelting"],
            "time": 3.2,
            "ingredients": [{ "name": "iron_ore", "amount": 1 }],
            "products": [{ "name": "iron_plate", "amount": 1 }]
        },
        "iron_gear_wheel": {
            "preferred_machine": "crafting",
            "category": ["Intermediate products", "Components"],
            "time": 0.5,
            "ingredients": [{ "name": "iron_plate", "amount": 2 }],
            "products": [{ "name": "iron_gear_wheel", "amount": 1 }]
        },
        "transport_belt": {
            "preferred_machine": "crafting",
            "category": ["Logistics", "Belts"],
            "time": 0.5,
            "ingredients": [
                { "name": "iron_plate", "amount": 1 },
                { "name": "iron_gear_wheel", "amount": 1 }
            ],
            "products": [{ "name": "transport_belt", "amount": 2 }],
            "allow_productivity": false
        },
        "wooden_chest": {
            "category": "crafting",
            "time": 0.5,
            "ingredients": [{ "name": "wood", "amount": 2 }],
            "products": [{ "name": "wooden_chest", "amount": 1 }],
            "allow_productivity": false
        }
    }
}"#;
