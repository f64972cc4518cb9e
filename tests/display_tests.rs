//! Tests for console rendering.

mod common;

use common::{belt, sample_data};
use factorio_calc::display::{
    format_name, format_percent, render_belt_choices, render_header, render_summary, render_tree, DisplayMode,
};
use factorio_calc::models::{ProductionNode, RawNode};
use factorio_calc::resolver::resolve_root;

#[test]
fn test_display_mode_from_verbose() {
    assert_eq!(DisplayMode::from_verbose(true), DisplayMode::Verbose);
    assert_eq!(DisplayMode::from_verbose(false), DisplayMode::Compact);
    assert_eq!(DisplayMode::default(), DisplayMode::Verbose);
    assert_eq!(DisplayMode::Compact.to_string(), "compact");
    assert!(DisplayMode::Verbose.is_verbose());
}

#[test]
fn test_format_helpers() {
    assert_eq!(format_name("electronic_circuit"), "Electronic Circuit");
    assert_eq!(format_name("iron__plate_"), "Iron Plate");
    assert_eq!(format_percent(0.5), "50%");
    assert_eq!(format_percent(0.0), "0%");
}

#[test]
fn test_header_with_belt_and_rate() {
    assert_eq!(
        render_header(Some("red"), 30.0),
        "=== Machine Calculation with Red Belt (30 items/s) ==="
    );
    assert_eq!(render_header(None, 12.5), "=== Machine Calculation at 12.5 items/s ===");
}

#[test]
fn test_compact_tree_layout() {
    let data = sample_data();
    let tree = resolve_root("copper_cable", 240.0, &data).unwrap();

    let expected = "\
└─ Product: Copper Cable
   Machine: Crafting Machine
   Target rate: 240.00 items/s
   Machines needed: 120.00
   Ingredients:
   └─ Copper Plate (240.00/s)
      └─ Product: Copper Plate
         Machine: Smelting Machine
         Target rate: 240.00 items/s
         Machines needed: 384.00
         Ingredients:
         └─ Copper Ore (240.00/s)
";
    assert_eq!(render_tree(&tree, DisplayMode::Compact), expected);
}

#[test]
fn test_verbose_tree_shows_machine_details() {
    let data = sample_data();
    let tree = resolve_root("electronic_circuit", 30.0, &data).unwrap();
    let rendered = render_tree(&tree, DisplayMode::Verbose);

    assert!(rendered.starts_with("└─ Product: Electronic Circuit\n"));
    assert!(rendered.contains("Machine: Electronics Machine (Speed: 1, Productivity: 50%)"));
    assert!(rendered.contains("Each machine produces 3.00 items/s"));
    assert!(rendered.contains("Machines needed: 10.00"));
    // Sibling ingredients use a continuing branch.
    assert!(rendered.contains("├─ Iron Plate (20.00/s)"));
    assert!(rendered.contains("└─ Copper Cable (60.00/s)"));
    assert!(rendered.contains("│  "));
}

#[test]
fn test_compact_tree_omits_speed_and_per_machine_rate() {
    let data = sample_data();
    let tree = resolve_root("electronic_circuit", 30.0, &data).unwrap();
    let rendered = render_tree(&tree, DisplayMode::Compact);

    assert!(rendered.contains("Machine: Electronics Machine\n"));
    assert!(!rendered.contains("Speed:"));
    assert!(!rendered.contains("Each machine produces"));
}

#[test]
fn test_raw_root_renders_single_line() {
    let node = ProductionNode::Raw(RawNode {
        product: "crude_oil".to_string(),
        rate: 100.0,
    });
    assert_eq!(render_tree(&node, DisplayMode::Verbose), "└─ Raw: Crude Oil (100.00/s)\n");
}

#[test]
fn test_summary_totals() {
    let data = sample_data();
    let tree = resolve_root("transport_belt", 15.0, &data).unwrap();
    let summary = render_summary(&tree);

    assert!(summary.starts_with("[RAW INPUTS]\n"));
    assert!(summary.contains("Iron Ore"));
    assert!(summary.contains("22.50/s"));
    assert!(summary.contains("[MACHINES]\n"));
    assert!(summary.contains("Crafting Machine"));
    assert!(summary.contains("Smelting Machine"));
}

#[test]
fn test_summary_for_raw_node_has_no_machines() {
    let node = ProductionNode::Raw(RawNode {
        product: "water".to_string(),
        rate: 1200.0,
    });
    let summary = render_summary(&node);

    assert!(summary.contains("Water"));
    assert!(summary.ends_with("[MACHINES]\n  (none)\n"));
}

#[test]
fn test_belt_choices_list_slowest_first() {
    let data = sample_data();
    assert_eq!(
        render_belt_choices(&data.belts()),
        "Yellow (15 items/s), Red (30 items/s), Blue (45 items/s)"
    );

    let lone = belt("turbo", 22.5);
    assert_eq!(render_belt_choices(&[&lone]), "Turbo (22.5 items/s)");
    assert_eq!(render_belt_choices(&[]), "");
}
