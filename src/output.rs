//! File output for calculation results.
//!
//! Writes framed text reports of a production tree, and flat CSV exports with
//! one row per node, into an output folder. File names carry the product,
//! belt, display mode and a timestamp so repeated runs never collide.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tracing::info;

use crate::display::{format_name, format_percent, DisplayMode};
use crate::models::ProductionNode;

const RULE_WIDTH: usize = 80;

/// Errors that can occur while writing output files.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Creates `dir` (and parents) if needed and returns it.
pub fn ensure_output_folder(dir: &Path) -> Result<PathBuf, OutputError> {
    fs::create_dir_all(dir)?;
    Ok(dir.to_path_buf())
}

fn rate_label(belt_color: Option<&str>, rate: f64) -> String {
    match belt_color {
        Some(color) => format!("{}_belt", color),
        None => format!("{}ips", rate).replace('.', "p"),
    }
}

/// Builds a timestamped report file name.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use factorio_calc::display::DisplayMode;
/// use factorio_calc::output::generate_filename;
///
/// let at = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap().and_hms_opt(14, 5, 7).unwrap();
/// assert_eq!(
///     generate_filename("electronic_circuit", Some("red"), 30.0, DisplayMode::Compact, &at, "txt"),
///     "electronic_circuit_red_belt_compact_20240309_140507.txt"
/// );
/// ```
pub fn generate_filename(
    product: &str,
    belt_color: Option<&str>,
    rate: f64,
    mode: DisplayMode,
    timestamp: &NaiveDateTime,
    extension: &str,
) -> String {
    let safe_name = product.replace([' ', '/'], "_");
    format!(
        "{}_{}_{}_{}.{}",
        safe_name,
        rate_label(belt_color, rate),
        mode.as_str(),
        timestamp.format("%Y%m%d_%H%M%S"),
        extension
    )
}

/// Renders the framed text report written by [`save_calculation`].
pub fn render_report(
    node: &ProductionNode,
    belt_color: Option<&str>,
    rate: f64,
    mode: DisplayMode,
    generated: &NaiveDateTime,
) -> String {
    let rule = "═".repeat(RULE_WIDTH);
    let mut output = String::new();

    output.push_str(&format!("{}\n  FACTORIO PRODUCTION CALCULATOR\n{}\n\n", rule, rule));
    output.push_str(&format!("Recipe:      {}\n", format_name(node.product())));
    match belt_color {
        Some(color) => output.push_str(&format!("Belt:        {} Belt ({} items/s)\n", format_name(color), rate)),
        None => output.push_str(&format!("Rate:        {} items/s\n", rate)),
    }
    output.push_str(&format!("Generated:   {}\n", generated.format("%Y-%m-%d %H:%M:%S")));
    output.push_str(&format!(
        "Mode:        {}\n",
        if mode.is_verbose() { "Verbose" } else { "Compact" }
    ));
    output.push_str(&format!("\n{}\n\n", rule));

    write_report_node(&mut output, node, mode, "", true);

    output.push_str(&format!("\n{}\n  End of calculation\n{}\n", rule, rule));
    output
}

fn write_report_node(output: &mut String, node: &ProductionNode, mode: DisplayMode, prefix: &str, is_last: bool) {
    let branch = if is_last { "└── " } else { "├── " };
    let pipe = if is_last { "    " } else { "│   " };

    let crafted = match node {
        ProductionNode::Raw(raw) => {
            output.push_str(&format!(
                "{}{}[Raw] {} ({:.2}/s)\n",
                prefix,
                branch,
                format_name(&raw.product),
                raw.rate
            ));
            return;
        }
        ProductionNode::Crafted(crafted) => crafted,
    };

    output.push_str(&format!("{}{}[Product] {}\n", prefix, branch, format_name(&crafted.product)));
    let indent = format!("{}{}", prefix, pipe);
    let machine_name = format_name(&crafted.machine.name);

    if mode.is_verbose() {
        output.push_str(&format!("{}┌─ Machine Configuration\n", indent));
        output.push_str(&format!("{}│  Type:         {}\n", indent, machine_name));
        output.push_str(&format!("{}│  Speed:        {}x\n", indent, crafted.machine.speed_multiplier));
        output.push_str(&format!(
            "{}│  Productivity: {}\n",
            indent,
            format_percent(crafted.machine.productivity_bonus)
        ));
        output.push_str(&format!("{}│\n", indent));
        output.push_str(&format!("{}├─ Production Details\n", indent));
        output.push_str(&format!("{}│  Target Rate:  {:.2} items/s\n", indent, crafted.target_rate));
        output.push_str(&format!("{}│  Per Machine:  {:.2} items/s\n", indent, crafted.per_machine_rate));
        output.push_str(&format!("{}│  Machines:     {:.2}\n", indent, crafted.machine_count));
    } else {
        output.push_str(&format!("{}Machine: {} x{:.2}\n", indent, machine_name, crafted.machine_count));
        output.push_str(&format!("{}Target:  {:.2} items/s\n", indent, crafted.target_rate));
    }

    if crafted.children.is_empty() {
        return;
    }

    if mode.is_verbose() {
        output.push_str(&format!("{}│\n", indent));
        output.push_str(&format!(
            "{}└─ Required Ingredients ({})\n",
            indent,
            crafted.children.len()
        ));
    } else {
        output.push_str(&format!("{}\n", indent));
        output.push_str(&format!("{}Ingredients:\n", indent));
    }

    let count = crafted.children.len();
    for (i, child) in crafted.children.iter().enumerate() {
        let last = i == count - 1;
        let ing_branch = if last { "   └── " } else { "   ├── " };
        let ing_prefix = format!("{}{}", indent, if last { "       " } else { "   │   " });
        let tag = if child.is_raw() { "[Raw]" } else { "[Crafted]" };

        output.push_str(&format!(
            "{}{}{} {} ({:.2}/s)\n",
            indent,
            ing_branch,
            tag,
            format_name(child.product()),
            child.rate()
        ));

        if !child.is_raw() {
            write_report_node(output, child, mode, &ing_prefix, last);
        }
    }
}

/// Writes a text report for `node` into `dir` and returns the file path.
pub fn save_calculation(
    dir: &Path,
    node: &ProductionNode,
    belt_color: Option<&str>,
    rate: f64,
    mode: DisplayMode,
) -> Result<PathBuf, OutputError> {
    let folder = ensure_output_folder(dir)?;
    let now = Local::now().naive_local();
    let path = folder.join(generate_filename(node.product(), belt_color, rate, mode, &now, "txt"));

    info!("Saving calculation to: {}", path.display());
    fs::write(&path, render_report(node, belt_color, rate, mode, &now))?;
    info!("Calculation saved successfully to: {}", path.display());

    Ok(path)
}

/// One CSV row per tree node, in depth-first order.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    depth: usize,
    path: String,
    kind: &'static str,
    product: &'a str,
    recipe: Option<&'a str>,
    machine: Option<&'a str>,
    machine_count: Option<f64>,
    per_machine_rate: Option<f64>,
    target_rate: f64,
}

fn collect_rows<'a>(node: &'a ProductionNode, depth: usize, parent: &str, rows: &mut Vec<CsvRow<'a>>) {
    let path = if parent.is_empty() {
        node.product().to_string()
    } else {
        format!("{}/{}", parent, node.product())
    };

    match node {
        ProductionNode::Raw(raw) => rows.push(CsvRow {
            depth,
            path,
            kind: "raw",
            product: &raw.product,
            recipe: None,
            machine: None,
            machine_count: None,
            per_machine_rate: None,
            target_rate: raw.rate,
        }),
        ProductionNode::Crafted(crafted) => {
            rows.push(CsvRow {
                depth,
                path: path.clone(),
                kind: "crafted",
                product: &crafted.product,
                recipe: Some(&crafted.recipe),
                machine: Some(&crafted.machine.name),
                machine_count: Some(crafted.machine_count),
                per_machine_rate: Some(crafted.per_machine_rate),
                target_rate: crafted.target_rate,
            });
            for child in &crafted.children {
                collect_rows(child, depth + 1, &path, rows);
            }
        }
    }
}

/// Writes the tree as CSV, one row per node with a header line.
///
/// Rows follow depth-first order; `path` joins the product ids from the root
/// with `/`. Raw rows leave the machine columns empty.
pub fn write_csv<W: Write>(writer: W, node: &ProductionNode) -> Result<(), OutputError> {
    let mut rows = Vec::new();
    collect_rows(node, 0, "", &mut rows);

    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes a CSV export for `node` into `dir` and returns the file path.
pub fn save_csv(
    dir: &Path,
    node: &ProductionNode,
    belt_color: Option<&str>,
    rate: f64,
    mode: DisplayMode,
) -> Result<PathBuf, OutputError> {
    let folder = ensure_output_folder(dir)?;
    let now = Local::now().naive_local();
    let path = folder.join(generate_filename(node.product(), belt_color, rate, mode, &now, "csv"));

    let file = fs::File::create(&path)?;
    write_csv(file, node)?;
    info!("CSV export saved to: {}", path.display());

    Ok(path)
}
