//! Game data loading and lookup for Factorio Calc.
//!
//! The data file (`base.json`) holds four sections: `recipes`, `machines`,
//! `belt_speeds` and `modules`. Records are deserialized one at a time so a
//! failure can name the offending entry, then normalized into the strict
//! [`Recipe`], [`Machine`] and [`Belt`] shapes. Nothing is stored unless every
//! record passes.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::DataError;
use crate::models::{Belt, CategoryField, ItemAmount, Machine, MachineRecord, Recipe, RecipeRecord};

/// Machine category used when a recipe names none.
pub const DEFAULT_MACHINE_CATEGORY: &str = "crafting";

/// Display category for recipes without a grouping path.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Immutable lookup tables for recipes, machines and belts.
///
/// Built once per process and shared by reference; every lookup is a hash
/// probe and never mutates state.
#[derive(Debug, Clone, Default)]
pub struct GameData {
    recipes: HashMap<String, Recipe>,
    /// Product id -> id of the recipe chosen to make it
    producers: HashMap<String, String>,
    machines: HashMap<String, Machine>,
    belts: HashMap<String, Belt>,
}

impl GameData {
    /// Builds a store from already-normalized records, validating every value.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::InvalidRecord`] for the first record with a
    /// duplicate id or a non-positive time, amount, speed or belt rate.
    pub fn new(recipes: Vec<Recipe>, machines: Vec<Machine>, belts: Vec<Belt>) -> Result<Self, DataError> {
        let mut data = GameData::default();

        for recipe in recipes {
            validate_recipe(&recipe)?;
            if data.recipes.contains_key(&recipe.id) {
                return Err(invalid("recipe", &recipe.id, "duplicate id"));
            }
            data.recipes.insert(recipe.id.clone(), recipe);
        }

        for machine in machines {
            validate_machine(&machine.id, machine.speed_multiplier, machine.productivity_bonus)?;
            if data.machines.contains_key(&machine.id) {
                return Err(invalid("machine", &machine.id, "duplicate id"));
            }
            data.machines.insert(machine.id.clone(), machine);
        }

        for belt in belts {
            if !is_positive(belt.items_per_second) {
                return Err(invalid(
                    "belt",
                    &belt.color,
                    format!("items_per_second must be positive, got {}", belt.items_per_second),
                ));
            }
            if data.belts.contains_key(&belt.color) {
                return Err(invalid("belt", &belt.color, "duplicate color"));
            }
            data.belts.insert(belt.color.clone(), belt);
        }

        // First recipe in id order wins for products with several producers.
        let mut ids: Vec<&String> = data.recipes.keys().collect();
        ids.sort();
        for id in ids {
            for product in &data.recipes[id].products {
                data.producers
                    .entry(product.item.clone())
                    .or_insert_with(|| id.clone());
            }
        }

        Ok(data)
    }

    /// Returns the recipe that makes `product`, if any.
    ///
    /// A recipe whose id equals the product id takes precedence over other
    /// recipes that list the product among their outputs.
    pub fn recipe_for(&self, product: &str) -> Option<&Recipe> {
        self.recipes.get(product).or_else(|| {
            self.producers
                .get(product)
                .and_then(|id| self.recipes.get(id))
        })
    }

    /// Returns the recipe with the given id.
    pub fn recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipes.get(id)
    }

    /// Returns the machine serving category `id`.
    pub fn machine(&self, id: &str) -> Option<&Machine> {
        self.machines.get(id)
    }

    /// Returns the belt preset for `color`.
    pub fn belt(&self, color: &str) -> Option<&Belt> {
        self.belts.get(color)
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    pub fn machine_count(&self) -> usize {
        self.machines.len()
    }

    pub fn belt_count(&self) -> usize {
        self.belts.len()
    }

    /// All belts, slowest first.
    pub fn belts(&self) -> Vec<&Belt> {
        let mut belts: Vec<&Belt> = self.belts.values().collect();
        belts.sort_by(|a, b| {
            a.items_per_second
                .partial_cmp(&b.items_per_second)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.color.cmp(&b.color))
        });
        belts
    }

    /// Recipe ids grouped by display category path (joined with `" / "`).
    ///
    /// Both the keys and the ids within a group are sorted.
    pub fn recipes_by_category(&self) -> BTreeMap<String, Vec<&str>> {
        let mut groups: BTreeMap<String, Vec<&str>> = BTreeMap::new();
        for recipe in self.recipes.values() {
            groups
                .entry(recipe.category.join(" / "))
                .or_default()
                .push(recipe.id.as_str());
        }
        for ids in groups.values_mut() {
            ids.sort_unstable();
        }
        groups
    }
}

fn invalid(kind: &'static str, id: &str, detail: impl Into<String>) -> DataError {
    DataError::InvalidRecord {
        kind,
        id: id.to_string(),
        detail: detail.into(),
    }
}

fn is_positive(value: f64) -> bool {
    value > 0.0 && value.is_finite()
}

fn validate_recipe(recipe: &Recipe) -> Result<(), DataError> {
    if !is_positive(recipe.craft_time) {
        return Err(invalid(
            "recipe",
            &recipe.id,
            format!("time must be positive, got {}", recipe.craft_time),
        ));
    }
    if recipe.products.is_empty() {
        return Err(invalid("recipe", &recipe.id, "no products"));
    }
    for entry in recipe.ingredients.iter().chain(&recipe.products) {
        if entry.item.is_empty() {
            return Err(invalid("recipe", &recipe.id, "entry with empty item name"));
        }
        if !is_positive(entry.amount) {
            return Err(invalid(
                "recipe",
                &recipe.id,
                format!("amount of '{}' must be positive, got {}", entry.item, entry.amount),
            ));
        }
    }
    Ok(())
}

fn validate_machine(id: &str, speed: f64, productivity: f64) -> Result<(), DataError> {
    if !is_positive(speed) {
        return Err(invalid(
            "machine",
            id,
            format!("crafting_speed must be positive, got {speed}"),
        ));
    }
    if productivity < 0.0 || !productivity.is_finite() {
        return Err(invalid(
            "machine",
            id,
            format!("base_productivity must not be negative, got {productivity}"),
        ));
    }
    Ok(())
}

// ============================================================================
// Record normalization
// ============================================================================

/// Converts a recipe record into a [`Recipe`], migrating legacy fields.
///
/// A single-string `category` is the old spelling of the machine category: it
/// becomes `preferred_machine` when none is given, and the recipe is filed
/// under [`UNCATEGORIZED`].
pub fn recipe_from_record(id: &str, record: RecipeRecord) -> Recipe {
    let mut preferred_machine = record.preferred_machine;
    let category = match record.category {
        Some(CategoryField::Path(path)) => path,
        Some(CategoryField::Legacy(machine)) => {
            debug!("Recipe '{}' uses legacy string category '{}'", id, machine);
            preferred_machine.get_or_insert(machine);
            vec![UNCATEGORIZED.to_string()]
        }
        None => record
            .display_category
            .unwrap_or_else(|| vec![UNCATEGORIZED.to_string()]),
    };

    Recipe {
        id: id.to_string(),
        ingredients: record
            .ingredients
            .into_iter()
            .map(|i| ItemAmount::new(i.name, i.amount))
            .collect(),
        products: record
            .products
            .into_iter()
            .map(|p| ItemAmount::new(p.name, p.amount))
            .collect(),
        craft_time: record.time,
        preferred_machine: preferred_machine.unwrap_or_else(|| DEFAULT_MACHINE_CATEGORY.to_string()),
        allow_productivity: record.allow_productivity,
        category,
    }
}

/// Expands machine records into one [`Machine`] per crafting category.
///
/// Records are taken in declaration order. Each category is served by the
/// machine with the highest base productivity; on a tie the machine declared
/// first keeps the category. A machine listing no categories serves a
/// category named after itself.
///
/// # Errors
///
/// Returns [`DataError::InvalidRecord`] naming the machine record whose speed
/// or productivity is out of range.
pub fn machines_from_records<I>(records: I) -> Result<Vec<Machine>, DataError>
where
    I: IntoIterator<Item = (String, MachineRecord)>,
{
    let mut by_category: BTreeMap<String, Machine> = BTreeMap::new();

    for (name, record) in records {
        validate_machine(&name, record.crafting_speed, record.base_productivity)?;

        let categories = if record.categories.is_empty() {
            vec![name.clone()]
        } else {
            record.categories.clone()
        };

        for category in categories {
            let candidate = Machine {
                id: category.clone(),
                name: name.clone(),
                speed_multiplier: record.crafting_speed,
                productivity_bonus: record.base_productivity,
                module_slots: record.module_slots,
            };
            let better = by_category
                .get(&category)
                .map_or(true, |current| candidate.productivity_bonus > current.productivity_bonus);
            if better {
                by_category.insert(category, candidate);
            }
        }
    }

    for machine in by_category.values() {
        debug!(
            "Category '{}' served by {} (speed: {}, productivity: {})",
            machine.id, machine.name, machine.speed_multiplier, machine.productivity_bonus
        );
    }

    Ok(by_category.into_values().collect())
}

fn section<'a>(root: &'a Map<String, Value>, name: &'static str, origin: &str) -> Result<&'a Value, DataError> {
    root.get(name).ok_or_else(|| DataError::MissingSection {
        origin: origin.to_string(),
        section: name,
    })
}

/// Deserializes every entry of an object section, naming the failing entry.
///
/// Entries come back in file order.
fn records<T: DeserializeOwned>(
    value: &Value,
    kind: &'static str,
    origin: &str,
) -> Result<Vec<(String, T)>, DataError> {
    let entries = value.as_object().ok_or_else(|| DataError::Parse {
        origin: origin.to_string(),
        detail: format!("section for {kind} entries must be an object"),
    })?;

    let mut parsed = Vec::with_capacity(entries.len());
    for (id, entry) in entries {
        let record = serde_json::from_value(entry.clone()).map_err(|e| invalid(kind, id, e.to_string()))?;
        parsed.push((id.clone(), record));
    }
    Ok(parsed)
}

/// Parses a complete game data document.
///
/// `origin` names the source in error messages (a file path, or
/// `"<embedded>"`).
///
/// # Example
///
/// ```
/// use factorio_calc::data::parse_game_data;
///
/// let json = r#"{
///     "belt_speeds": { "yellow": 15 },
///     "machines": { "assembling_machine_1": { "crafting_speed": 0.5, "categories": ["crafting"] } },
///     "recipes": {
///         "iron_gear_wheel": {
///             "category": ["Intermediate products"],
///             "time": 0.5,
///             "ingredients": [{ "name": "iron_plate", "amount": 2 }],
///             "products": [{ "name": "iron_gear_wheel", "amount": 1 }]
///         }
///     }
/// }"#;
///
/// let data = parse_game_data(json, "<doc>").unwrap();
/// assert_eq!(data.recipe_for("iron_gear_wheel").unwrap().preferred_machine, "crafting");
/// assert_eq!(data.machine("crafting").unwrap().name, "assembling_machine_1");
/// assert!(data.recipe_for("iron_plate").is_none());
/// ```
pub fn parse_game_data(json: &str, origin: &str) -> Result<GameData, DataError> {
    let root: Value = serde_json::from_str(json).map_err(|e| DataError::Parse {
        origin: origin.to_string(),
        detail: e.to_string(),
    })?;
    let root = root.as_object().ok_or_else(|| DataError::Parse {
        origin: origin.to_string(),
        detail: "top level must be an object".to_string(),
    })?;

    let belt_speeds: Vec<(String, f64)> = records(section(root, "belt_speeds", origin)?, "belt", origin)?;
    let machine_records: Vec<(String, MachineRecord)> =
        records(section(root, "machines", origin)?, "machine", origin)?;
    let recipe_records: Vec<(String, RecipeRecord)> =
        records(section(root, "recipes", origin)?, "recipe", origin)?;

    let module_count = root
        .get("modules")
        .and_then(Value::as_object)
        .map_or(0, |m| m.len());
    if module_count > 0 {
        debug!("Ignoring {} module definitions", module_count);
    }

    let recipes = recipe_records
        .into_iter()
        .map(|(id, record)| recipe_from_record(&id, record))
        .collect();
    let machines = machines_from_records(machine_records)?;
    let belts = belt_speeds
        .into_iter()
        .map(|(color, items_per_second)| Belt { color, items_per_second })
        .collect();

    let data = GameData::new(recipes, machines, belts)?;
    info!(
        "Loaded {} recipes, {} machine categories, {} belts from {}",
        data.recipe_count(),
        data.machine_count(),
        data.belt_count(),
        origin
    );
    Ok(data)
}

/// Loads the game data file at `path`.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use factorio_calc::data::load_game_data;
///
/// let data = load_game_data(Path::new("data/base.json")).unwrap();
/// println!("Loaded {} recipes", data.recipe_count());
/// ```
pub fn load_game_data(path: &Path) -> Result<GameData, DataError> {
    debug!("Loading game data from {}", path.display());
    let content = fs::read_to_string(path).map_err(|source| DataError::Io {
        file: path.to_path_buf(),
        source,
    })?;
    parse_game_data(&content, &path.display().to_string())
}
