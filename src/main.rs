//! Factorio Calc - Command Line Interface
//!
//! This is the main entry point for the production chain calculator.
//! Run with `--help` to see all available options.

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use tracing::{error, info, warn};

use factorio_calc::{
    config::{load_settings, load_user_config},
    data::load_game_data,
    display::{display_calculation, display_recipe_list, render_belt_choices, render_header, DisplayMode},
    logging::init_logging,
    output::{save_calculation, save_csv},
    resolver::{resolve_root, target_rate_for_belt},
};

/// Command-line arguments for Factorio Calc.
#[derive(Parser, Debug)]
#[command(name = "factorio-calc")]
#[command(author, version, about = "Calculate machines and input rates for a Factorio production chain", long_about = None)]
struct Args {
    /// Product to calculate (defaults to Config.json, then transport_belt)
    #[arg(short, long)]
    product: Option<String>,

    /// Belt color whose throughput is the target rate
    #[arg(short, long)]
    belt: Option<String>,

    /// Explicit target rate in items/s (overrides the belt)
    #[arg(short, long)]
    rate: Option<f64>,

    /// Show machine speed, productivity and per-machine output
    #[arg(long, conflicts_with = "compact")]
    verbose: bool,

    /// Show machine type, count and rate only
    #[arg(long)]
    compact: bool,

    /// Game data file (defaults to BASE_JSON or data/base.json)
    #[arg(long)]
    data: Option<PathBuf>,

    /// User config file (defaults to CONFIG_JSON or data/Config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Do not write a report to the output folder
    #[arg(long, default_value = "false")]
    no_save: bool,

    /// Also write a CSV export next to the report
    #[arg(long, default_value = "false")]
    csv: bool,

    /// List available recipes by category and exit
    #[arg(long, default_value = "false")]
    list: bool,

    /// Mirror log output to stderr
    #[arg(long, default_value = "false")]
    console_log: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let settings = load_settings()?;
    let config_path = args.config.clone().unwrap_or_else(|| settings.config_json.clone());
    let run = load_user_config(&config_path)?.resolve(&settings);

    let log_file = init_logging(&settings.log_dir, args.console_log || run.console_logging)?;

    info!("{}", "=".repeat(60));
    info!("Factorio Calc v{} starting", env!("CARGO_PKG_VERSION"));
    info!("{}", "=".repeat(60));

    let data_path = args.data.clone().unwrap_or_else(|| settings.base_json.clone());
    let data = match load_game_data(&data_path) {
        Ok(data) => data,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if args.list {
        display_recipe_list(&data.recipes_by_category());
        return Ok(());
    }

    let product = args.product.clone().unwrap_or(run.product);
    let mode = if args.compact {
        DisplayMode::Compact
    } else if args.verbose {
        DisplayMode::Verbose
    } else {
        DisplayMode::from_verbose(run.verbose)
    };

    // An explicit rate replaces the belt entirely.
    let (belt, rate) = match args.rate {
        Some(rate) => (None, rate),
        None => {
            let color = args.belt.clone().unwrap_or(run.belt_color);
            match target_rate_for_belt(&color, &data) {
                Ok(rate) => (Some(color), rate),
                Err(e) => {
                    warn!("{}", e);
                    println!();
                    println!("{}", render_header(Some(&color), 0.0));
                    println!("{}", e);
                    println!("Available belts: {}", render_belt_choices(&data.belts()));
                    std::process::exit(1);
                }
            }
        }
    };

    info!(
        "Configuration: product={}, belt={:?}, rate={}, mode={}",
        product, belt, rate, mode
    );

    info!("Starting calculation for {} at {} items/s", product, rate);
    let tree = match resolve_root(&product, rate, &data) {
        Ok(tree) => tree,
        Err(e) => {
            warn!("Calculation aborted: {}", e);
            println!();
            println!("{}", render_header(belt.as_deref(), rate));
            println!("{}", e);
            std::process::exit(1);
        }
    };

    display_calculation(&tree, belt.as_deref(), rate, mode);

    if !args.no_save {
        let path = save_calculation(&settings.output_folder, &tree, belt.as_deref(), rate, mode)?;
        println!();
        println!("Calculation saved to: {}", path.display());
    }
    if args.csv {
        let path = save_csv(&settings.output_folder, &tree, belt.as_deref(), rate, mode)?;
        println!("CSV export saved to: {}", path.display());
    }

    info!("Calculation completed successfully");
    info!("{}", "=".repeat(60));
    println!("Log file saved to: {}", log_file.display());

    Ok(())
}
