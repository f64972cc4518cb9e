//! Display and formatting utilities for Factorio Calc.
//!
//! This module renders a resolved [`ProductionNode`] tree for the console.
//! Renderers return `String`s so the same text can be printed, logged or
//! embedded in other output; the `display_*` functions print them.

use std::fmt;

use crate::models::{Belt, CraftedNode, ProductionNode};

/// Level of detail for rendered trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Machine speed, productivity and per-machine output on every crafted node
    #[default]
    Verbose,
    /// Machine type, count and target rate only
    Compact,
}

impl DisplayMode {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            DisplayMode::Verbose
        } else {
            DisplayMode::Compact
        }
    }

    pub fn is_verbose(self) -> bool {
        self == DisplayMode::Verbose
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::Verbose => "verbose",
            DisplayMode::Compact => "compact",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formats an identifier for display.
///
/// Underscore-separated words become capitalized words.
///
/// # Example
///
/// ```
/// use factorio_calc::display::format_name;
///
/// assert_eq!(format_name("transport_belt"), "Transport Belt");
/// assert_eq!(format_name("assembling_machine_3"), "Assembling Machine 3");
/// assert_eq!(format_name("green"), "Green");
/// ```
pub fn format_name(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Formats a fractional bonus as a whole percentage (`0.1` -> `"10%"`).
pub fn format_percent(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}

/// Renders the banner line shown above a calculation.
///
/// # Example
///
/// ```
/// use factorio_calc::display::render_header;
///
/// assert_eq!(
///     render_header(Some("green"), 45.0),
///     "=== Machine Calculation with Green Belt (45 items/s) ==="
/// );
/// assert_eq!(render_header(None, 7.5), "=== Machine Calculation at 7.5 items/s ===");
/// ```
pub fn render_header(belt_color: Option<&str>, rate: f64) -> String {
    match belt_color {
        Some(color) => format!(
            "=== Machine Calculation with {} Belt ({} items/s) ===",
            format_name(color),
            rate
        ),
        None => format!("=== Machine Calculation at {} items/s ===", rate),
    }
}

/// Lists belt presets as `Yellow (15 items/s), Red (30 items/s)`.
///
/// # Example
///
/// ```
/// use factorio_calc::display::render_belt_choices;
/// use factorio_calc::models::Belt;
///
/// let yellow = Belt { color: "yellow".to_string(), items_per_second: 15.0 };
/// let red = Belt { color: "red".to_string(), items_per_second: 30.0 };
/// assert_eq!(render_belt_choices(&[&yellow, &red]), "Yellow (15 items/s), Red (30 items/s)");
/// ```
pub fn render_belt_choices(belts: &[&Belt]) -> String {
    belts
        .iter()
        .map(|belt| format!("{} ({} items/s)", format_name(&belt.color), belt.items_per_second))
        .collect::<Vec<String>>()
        .join(", ")
}

/// Renders a production tree as an ASCII tree.
///
/// Every crafted node lists its machine details (per `mode`) and then its
/// ingredients with their required rates; crafted ingredients expand into
/// nested subtrees.
pub fn render_tree(node: &ProductionNode, mode: DisplayMode) -> String {
    let mut output = String::new();
    write_node(&mut output, node, mode, "", true);
    output
}

fn write_node(output: &mut String, node: &ProductionNode, mode: DisplayMode, prefix: &str, is_last: bool) {
    let branch = if is_last { "└─" } else { "├─" };
    let pipe = if is_last { "   " } else { "│  " };

    let crafted = match node {
        ProductionNode::Raw(raw) => {
            output.push_str(&format!(
                "{}{} Raw: {} ({:.2}/s)\n",
                prefix,
                branch,
                format_name(&raw.product),
                raw.rate
            ));
            return;
        }
        ProductionNode::Crafted(crafted) => crafted,
    };

    output.push_str(&format!("{}{} Product: {}\n", prefix, branch, format_name(&crafted.product)));
    let indent = format!("{}{}", prefix, pipe);

    match mode {
        DisplayMode::Verbose => write_verbose_info(output, crafted, &indent),
        DisplayMode::Compact => write_compact_info(output, crafted, &indent),
    }

    if crafted.children.is_empty() {
        return;
    }

    output.push_str(&format!("{}Ingredients:\n", indent));
    let count = crafted.children.len();
    for (i, child) in crafted.children.iter().enumerate() {
        let last = i == count - 1;
        let ing_branch = if last { "└─" } else { "├─" };
        let ing_prefix = format!("{}{}", indent, if last { "   " } else { "│  " });

        output.push_str(&format!(
            "{}{} {} ({:.2}/s)\n",
            indent,
            ing_branch,
            format_name(child.product()),
            child.rate()
        ));

        if !child.is_raw() {
            write_node(output, child, mode, &ing_prefix, last);
        }
    }
}

fn write_verbose_info(output: &mut String, node: &CraftedNode, indent: &str) {
    output.push_str(&format!(
        "{}Machine: {} (Speed: {}, Productivity: {})\n",
        indent,
        format_name(&node.machine.name),
        node.machine.speed_multiplier,
        format_percent(node.machine.productivity_bonus)
    ));
    output.push_str(&format!("{}Target rate: {:.2} items/s\n", indent, node.target_rate));
    output.push_str(&format!(
        "{}Each machine produces {:.2} items/s\n",
        indent, node.per_machine_rate
    ));
    output.push_str(&format!("{}Machines needed: {:.2}\n", indent, node.machine_count));
}

fn write_compact_info(output: &mut String, node: &CraftedNode, indent: &str) {
    output.push_str(&format!("{}Machine: {}\n", indent, format_name(&node.machine.name)));
    output.push_str(&format!("{}Target rate: {:.2} items/s\n", indent, node.target_rate));
    output.push_str(&format!("{}Machines needed: {:.2}\n", indent, node.machine_count));
}

/// Renders totals across the whole tree: raw inputs and machines by type.
pub fn render_summary(node: &ProductionNode) -> String {
    let mut output = String::new();

    output.push_str("[RAW INPUTS]\n");
    let raw = node.raw_totals();
    if raw.is_empty() {
        output.push_str("  (none)\n");
    }
    for (item, rate) in &raw {
        output.push_str(&format!("  {:<28} {:>10.2}/s\n", format_name(item), rate));
    }

    output.push_str("[MACHINES]\n");
    let machines = node.machine_totals();
    if machines.is_empty() {
        output.push_str("  (none)\n");
    }
    for (machine, count) in &machines {
        output.push_str(&format!("  {:<28} {:>10.2}\n", format_name(machine), count));
    }

    output
}

/// Prints a calculation to stdout: header, tree and totals.
pub fn display_calculation(node: &ProductionNode, belt_color: Option<&str>, rate: f64, mode: DisplayMode) {
    println!();
    println!("{}", render_header(belt_color, rate));
    print!("{}", render_tree(node, mode));
    println!();
    print!("{}", render_summary(node));
}

/// Prints recipe ids grouped by display category.
pub fn display_recipe_list(groups: &std::collections::BTreeMap<String, Vec<&str>>) {
    for (category, ids) in groups {
        println!("{}", category);
        for id in ids {
            println!("  {:<32} {}", id, format_name(id));
        }
    }
}
