//! WebAssembly bindings for Factorio Calc.
//!
//! This module provides JavaScript-accessible functions over the game data
//! embedded at build time. Inputs and outputs are JSON strings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::data::{parse_game_data, GameData};
use crate::display::{render_tree, DisplayMode};
use crate::models::ProductionNode;
use crate::resolver::{resolve_root, target_rate_for_belt};

const EMBEDDED_DATA: &str = include_str!("../data/base.json");

/// JavaScript-friendly input for a calculation.
#[derive(Debug, Clone, Deserialize)]
pub struct JsCalculateInput {
    pub product: String,
    /// Belt preset; ignored when `rate` is given
    #[serde(default)]
    pub belt_color: Option<String>,
    /// Explicit target rate in items/s
    #[serde(default)]
    pub rate: Option<f64>,
    #[serde(default)]
    pub verbose: bool,
}

/// JavaScript-friendly calculation result.
#[derive(Debug, Clone, Serialize)]
pub struct JsCalculateResult {
    pub success: bool,
    pub error: Option<String>,
    pub product: String,
    pub target_rate: f64,
    pub tree: Option<ProductionNode>,
    pub rendered: Option<String>,
    pub raw_totals: BTreeMap<String, f64>,
}

impl JsCalculateResult {
    fn failure(product: String, error: String) -> Self {
        JsCalculateResult {
            success: false,
            error: Some(error),
            product,
            target_rate: 0.0,
            tree: None,
            rendered: None,
            raw_totals: BTreeMap::new(),
        }
    }
}

fn log_error(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    tracing::warn!("{}", message);
}

fn embedded_data() -> Result<GameData, String> {
    parse_game_data(EMBEDDED_DATA, "<embedded>").map_err(|e| e.to_string())
}

/// Runs a calculation described by `input_json` and returns a JSON result.
pub fn calculate_json(input_json: &str, data: &GameData) -> JsCalculateResult {
    let input: JsCalculateInput = match serde_json::from_str(input_json) {
        Ok(i) => i,
        Err(e) => return JsCalculateResult::failure(String::new(), format!("Invalid input: {}", e)),
    };

    let rate = match (input.rate, input.belt_color.as_deref()) {
        (Some(rate), _) => Ok(rate),
        (None, Some(color)) => target_rate_for_belt(color, data),
        (None, None) => target_rate_for_belt("green", data),
    };
    let rate = match rate {
        Ok(rate) => rate,
        Err(e) => return JsCalculateResult::failure(input.product, e.to_string()),
    };

    match resolve_root(&input.product, rate, data) {
        Ok(tree) => JsCalculateResult {
            success: true,
            error: None,
            product: input.product,
            target_rate: rate,
            rendered: Some(render_tree(&tree, DisplayMode::from_verbose(input.verbose))),
            raw_totals: tree.raw_totals(),
            tree: Some(tree),
        },
        Err(e) => JsCalculateResult::failure(input.product, e.to_string()),
    }
}

/// Run a calculation against the embedded game data.
///
/// Takes a JSON string input and returns a JSON string result.
#[wasm_bindgen]
pub fn calculate(input_json: &str) -> String {
    let result = match embedded_data() {
        Ok(data) => calculate_json(input_json, &data),
        Err(e) => JsCalculateResult::failure(String::new(), e),
    };
    if let Some(ref error) = result.error {
        log_error(error);
    }
    serde_json::to_string(&result).unwrap_or_default()
}

/// Get the list of recipes grouped by display category.
/// Returns a JSON object mapping category paths to recipe ids.
#[wasm_bindgen]
pub fn list_recipes() -> String {
    match embedded_data() {
        Ok(data) => serde_json::to_string(&data.recipes_by_category()).unwrap_or_default(),
        Err(e) => {
            log_error(&e);
            "{}".to_string()
        }
    }
}

/// Get the version of the calculator.
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
