//! # Factorio Calc
//!
//! A command-line tool and library for planning Factorio production chains.
//!
//! Given an end product and a target throughput (usually the capacity of a
//! belt), the calculator works out how many machines of which type are
//! needed and how fast every ingredient must be supplied, recursively down to
//! raw resources.
//!
//! - Recipes with several ingredients and products
//! - Machine crafting speed and productivity bonuses
//! - Belt presets as target rates
//! - Cycle detection in the recipe graph
//!
//! ## Modules
//!
//! - [`models`] - Recipes, machines, belts and the production tree
//! - [`data`] - Game data loading and the lookup store
//! - [`resolver`] - Production chain resolution
//! - [`display`] - Console rendering of production trees
//! - [`output`] - Text report and CSV file output
//! - [`config`] - Environment settings and `Config.json`
//! - [`logging`] - Subscriber setup for binaries
//! - [`error`] - Error types
//! - [`wasm`] - WebAssembly bindings over embedded data
//!
//! ## Example Usage
//!
//! ```no_run
//! use factorio_calc::{
//!     data::load_game_data,
//!     display::{display_calculation, DisplayMode},
//!     resolver::{resolve_root, target_rate_for_belt},
//! };
//! use std::path::Path;
//!
//! let data = load_game_data(Path::new("data/base.json")).unwrap();
//!
//! // A full red belt of electronic circuits
//! let rate = target_rate_for_belt("red", &data).unwrap();
//! let tree = resolve_root("electronic_circuit", rate, &data).unwrap();
//!
//! display_calculation(&tree, Some("red"), rate, DisplayMode::Compact);
//! ```
//!
//! ## Numbers
//!
//! Machine counts and rates are exact `f64` values. Nothing is rounded up to
//! whole machines; that is left to whoever reads the plan.

pub mod config;
pub mod data;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod resolver;
pub mod wasm;

pub use data::GameData;
pub use error::{DataError, ResolveError};
pub use models::ProductionNode;
pub use resolver::{resolve, resolve_root};
