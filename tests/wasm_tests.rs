//! Tests for the JSON-string API behind the WebAssembly bindings.

mod common;

use common::{assert_close, sample_data};
use factorio_calc::wasm::{calculate, calculate_json, get_version, list_recipes};

#[test]
fn test_calculate_with_belt() {
    let data = sample_data();
    let result = calculate_json(r#"{ "product": "copper_cable", "belt_color": "blue" }"#, &data);

    assert!(result.success, "error: {:?}", result.error);
    assert_eq!(result.product, "copper_cable");
    assert_eq!(result.target_rate, 45.0);
    assert_close(result.raw_totals["copper_ore"], 45.0);

    let tree = result.tree.expect("tree is present");
    assert_close(tree.as_crafted().unwrap().machine_count, 22.5);
    let rendered = result.rendered.unwrap();
    assert!(rendered.contains("Machines needed: 22.50"));
    assert!(!rendered.contains("Each machine produces"));
}

#[test]
fn test_explicit_rate_wins_over_belt() {
    let data = sample_data();
    let result = calculate_json(
        r#"{ "product": "iron_gear_wheel", "belt_color": "blue", "rate": 2, "verbose": true }"#,
        &data,
    );

    assert!(result.success);
    assert_eq!(result.target_rate, 2.0);
    assert!(result.rendered.unwrap().contains("Each machine produces 2.00 items/s"));
}

#[test]
fn test_calculate_reports_errors() {
    let data = sample_data();

    let unknown_belt = calculate_json(r#"{ "product": "copper_cable", "belt_color": "pink" }"#, &data);
    assert!(!unknown_belt.success);
    assert_eq!(unknown_belt.error.as_deref(), Some("Belt color 'pink' not found!"));
    assert!(unknown_belt.tree.is_none());

    let raw = calculate_json(r#"{ "product": "iron_ore", "rate": 10 }"#, &data);
    assert_eq!(raw.error.as_deref(), Some("Recipe 'iron_ore' not found!"));

    let bad_input = calculate_json("not json", &data);
    assert!(bad_input.error.unwrap().starts_with("Invalid input"));
}

#[test]
fn test_result_serializes_tree() {
    let data = sample_data();
    let result = calculate_json(r#"{ "product": "copper_cable", "rate": 4 }"#, &data);
    let json: serde_json::Value = serde_json::from_str(&serde_json::to_string(&result).unwrap()).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["tree"]["kind"], "crafted");
    assert_eq!(json["tree"]["machine"]["name"], "crafting_machine");
    assert_eq!(json["tree"]["children"][0]["children"][0]["kind"], "raw");
}

#[test]
fn test_embedded_data_entry_points() {
    let output: serde_json::Value = serde_json::from_str(&calculate(r#"{ "product": "transport_belt" }"#)).unwrap();
    assert_eq!(output["success"], true);
    assert_eq!(output["target_rate"], 60.0);

    let groups: serde_json::Value = serde_json::from_str(&list_recipes()).unwrap();
    assert!(groups["Logistics / Belts"]
        .as_array()
        .unwrap()
        .iter()
        .any(|id| id == "transport_belt"));
}

#[test]
fn test_get_version() {
    assert_eq!(get_version(), env!("CARGO_PKG_VERSION"));
}
