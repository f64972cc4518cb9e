//! Tests for report and CSV output.

mod common;

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use common::sample_data;
use factorio_calc::display::DisplayMode;
use factorio_calc::output::{generate_filename, render_report, save_calculation, save_csv, write_csv};
use factorio_calc::resolver::resolve_root;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("factorio_calc_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

#[test]
fn test_filename_with_belt() {
    let at = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap().and_hms_opt(9, 0, 0).unwrap();
    assert_eq!(
        generate_filename("transport_belt", Some("green"), 60.0, DisplayMode::Verbose, &at, "txt"),
        "transport_belt_green_belt_verbose_20250131_090000.txt"
    );
}

#[test]
fn test_filename_with_explicit_rate() {
    let at = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap().and_hms_opt(9, 0, 0).unwrap();
    assert_eq!(
        generate_filename("iron gear/wheel", None, 7.5, DisplayMode::Compact, &at, "csv"),
        "iron_gear_wheel_7p5ips_compact_20250131_090000.csv"
    );
}

#[test]
fn test_report_frame_and_metadata() {
    let data = sample_data();
    let tree = resolve_root("copper_cable", 30.0, &data).unwrap();
    let at = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(12, 30, 0).unwrap();

    let report = render_report(&tree, Some("red"), 30.0, DisplayMode::Compact, &at);

    assert!(report.starts_with(&"═".repeat(80)));
    assert!(report.contains("  FACTORIO PRODUCTION CALCULATOR\n"));
    assert!(report.contains("Recipe:      Copper Cable\n"));
    assert!(report.contains("Belt:        Red Belt (30 items/s)\n"));
    assert!(report.contains("Generated:   2024-06-01 12:30:00\n"));
    assert!(report.contains("Mode:        Compact\n"));
    assert!(report.contains("└── [Product] Copper Cable\n"));
    assert!(report.contains("Machine: Crafting Machine x15.00\n"));
    assert!(report.contains("└── [Crafted] Copper Plate (30.00/s)\n"));
    assert!(report.contains("└── [Raw] Copper Ore (30.00/s)\n"));
    assert!(report.contains("  End of calculation\n"));
}

#[test]
fn test_verbose_report_details() {
    let data = sample_data();
    let tree = resolve_root("electronic_circuit", 30.0, &data).unwrap();
    let at = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(12, 30, 0).unwrap();

    let report = render_report(&tree, None, 30.0, DisplayMode::Verbose, &at);

    assert!(report.contains("Rate:        30 items/s\n"));
    assert!(report.contains("Mode:        Verbose\n"));
    assert!(report.contains("┌─ Machine Configuration"));
    assert!(report.contains("Productivity: 50%"));
    assert!(report.contains("Per Machine:  3.00 items/s"));
    assert!(report.contains("└─ Required Ingredients (2)"));
    assert!(report.contains("├── [Crafted] Iron Plate (20.00/s)"));
}

#[test]
fn test_csv_rows_follow_tree() {
    let data = sample_data();
    let tree = resolve_root("transport_belt", 15.0, &data).unwrap();

    let mut buffer = Vec::new();
    write_csv(&mut buffer, &tree).unwrap();

    let mut reader = csv::Reader::from_reader(buffer.as_slice());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec![
            "depth",
            "path",
            "kind",
            "product",
            "recipe",
            "machine",
            "machine_count",
            "per_machine_rate",
            "target_rate"
        ]
    );

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), tree.node_count());

    let paths: Vec<&str> = rows.iter().map(|r| &r[1]).collect();
    assert_eq!(
        paths,
        vec![
            "transport_belt",
            "transport_belt/iron_plate",
            "transport_belt/iron_plate/iron_ore",
            "transport_belt/iron_gear_wheel",
            "transport_belt/iron_gear_wheel/iron_plate",
            "transport_belt/iron_gear_wheel/iron_plate/iron_ore",
        ]
    );

    let ore = &rows[2];
    assert_eq!(&ore[0], "2");
    assert_eq!(&ore[2], "raw");
    assert_eq!(&ore[5], "");
    assert_eq!(ore[8].parse::<f64>().unwrap(), 7.5);

    let root = &rows[0];
    assert_eq!(&root[2], "crafted");
    assert_eq!(&root[5], "crafting_machine");
    assert_eq!(root[6].parse::<f64>().unwrap(), 3.75);
}

#[test]
fn test_save_calculation_writes_report() {
    let data = sample_data();
    let tree = resolve_root("iron_gear_wheel", 15.0, &data).unwrap();
    let dir = scratch_dir("report");

    let path = save_calculation(&dir, &tree, Some("yellow"), 15.0, DisplayMode::Verbose).unwrap();

    assert!(path.starts_with(&dir));
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("iron_gear_wheel_yellow_belt_verbose_"));
    assert!(name.ends_with(".txt"));

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("[Product] Iron Gear Wheel"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_save_csv_creates_folder() {
    let data = sample_data();
    let tree = resolve_root("copper_cable", 10.0, &data).unwrap();
    let dir = scratch_dir("csv").join("nested");

    let path = save_csv(&dir, &tree, None, 10.0, DisplayMode::Compact).unwrap();

    assert!(dir.is_dir());
    assert_eq!(path.extension().unwrap(), "csv");
    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 1 + tree.node_count());

    let _ = fs::remove_dir_all(dir.parent().unwrap());
}
