//! Data models and structures for Factorio Calc.
//!
//! This module contains the game-data types held by the store (recipes,
//! machines, belts), the production tree produced by the resolver, and the
//! on-disk JSON record shapes that the loader normalizes into them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An item id paired with an amount per craft cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemAmount {
    /// Item identifier (e.g., "copper_plate")
    pub item: String,
    /// Amount consumed or produced per craft cycle, always positive
    pub amount: f64,
}

impl ItemAmount {
    pub fn new(item: impl Into<String>, amount: f64) -> Self {
        Self {
            item: item.into(),
            amount,
        }
    }
}

/// A named production rule.
///
/// # Example
///
/// ```
/// use factorio_calc::models::{ItemAmount, Recipe};
///
/// let cable = Recipe {
///     id: "copper_cable".to_string(),
///     ingredients: vec![ItemAmount::new("copper_plate", 1.0)],
///     products: vec![ItemAmount::new("copper_cable", 2.0)],
///     craft_time: 0.5,
///     preferred_machine: "crafting".to_string(),
///     allow_productivity: true,
///     category: vec!["Intermediate products".to_string()],
/// };
///
/// assert_eq!(cable.product("copper_cable").map(|p| p.amount), Some(2.0));
/// assert!(cable.product("iron_plate").is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    /// Unique recipe identifier
    pub id: String,
    /// Ingredients in declared order
    pub ingredients: Vec<ItemAmount>,
    /// Products in declared order; never empty
    pub products: Vec<ItemAmount>,
    /// Seconds per craft cycle at crafting speed 1
    pub craft_time: f64,
    /// Machine category that crafts this recipe
    pub preferred_machine: String,
    /// Whether a productivity bonus raises the output amount
    pub allow_productivity: bool,
    /// Display grouping path, used only for browsing
    pub category: Vec<String>,
}

impl Recipe {
    /// Returns the product entry for `item`, if this recipe lists it.
    pub fn product(&self, item: &str) -> Option<&ItemAmount> {
        self.products.iter().find(|p| p.item == item)
    }
}

/// A crafting-category definition.
///
/// `id` is the category key that recipes reference through
/// [`Recipe::preferred_machine`]; `name` is the concrete machine serving it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Machine {
    /// Category key (e.g., "crafting", "smelting")
    pub id: String,
    /// Concrete machine name (e.g., "assembling_machine_3")
    pub name: String,
    /// Crafting speed factor, always positive
    pub speed_multiplier: f64,
    /// Fractional output bonus, never negative
    pub productivity_bonus: f64,
    /// Module slots available (informational)
    pub module_slots: u32,
}

/// A belt throughput preset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Belt {
    pub color: String,
    pub items_per_second: f64,
}

// ============================================================================
// Production Tree
// ============================================================================

/// A crafted item: the machines needed for it and the ingredient subtrees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CraftedNode {
    /// Item this node produces
    pub product: String,
    /// Recipe used to craft it
    pub recipe: String,
    /// Machine serving the recipe's category, copied from the store
    pub machine: Machine,
    /// Seconds per craft cycle at crafting speed 1
    pub craft_time: f64,
    /// Base amount of `product` per craft cycle, before productivity
    pub product_amount: f64,
    /// Whether the machine's productivity bonus was applied
    pub allow_productivity: bool,
    /// Craft cycles per second for a single machine
    pub cycles_per_second: f64,
    /// Items per second a single machine delivers
    pub per_machine_rate: f64,
    /// Machines required; fractional, never rounded
    pub machine_count: f64,
    /// Items per second this node must deliver
    pub target_rate: f64,
    /// One child per recipe ingredient, in declared order
    pub children: Vec<ProductionNode>,
}

/// An item with no recipe, consumed as an external input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawNode {
    pub product: String,
    pub rate: f64,
}

/// A node of the production tree.
///
/// The tree is never deduplicated: an item reached through two branches
/// appears twice, each with the rate of its own branch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProductionNode {
    Crafted(CraftedNode),
    Raw(RawNode),
}

impl ProductionNode {
    /// Item id of this node.
    pub fn product(&self) -> &str {
        match self {
            ProductionNode::Crafted(node) => &node.product,
            ProductionNode::Raw(node) => &node.product,
        }
    }

    /// Items per second required of this node.
    pub fn rate(&self) -> f64 {
        match self {
            ProductionNode::Crafted(node) => node.target_rate,
            ProductionNode::Raw(node) => node.rate,
        }
    }

    /// Ingredient subtrees; empty for raw leaves.
    pub fn children(&self) -> &[ProductionNode] {
        match self {
            ProductionNode::Crafted(node) => &node.children,
            ProductionNode::Raw(_) => &[],
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, ProductionNode::Raw(_))
    }

    pub fn as_crafted(&self) -> Option<&CraftedNode> {
        match self {
            ProductionNode::Crafted(node) => Some(node),
            ProductionNode::Raw(_) => None,
        }
    }

    /// Total number of nodes in this subtree, including itself.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(|c| c.node_count()).sum::<usize>()
    }

    /// Number of levels in this subtree; a lone leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(|c| c.depth()).max().unwrap_or(0)
    }

    /// Sums the rate of every raw leaf per item.
    ///
    /// # Example
    ///
    /// ```
    /// use factorio_calc::models::{ProductionNode, RawNode};
    ///
    /// let ore = ProductionNode::Raw(RawNode { product: "iron_ore".into(), rate: 7.5 });
    /// assert_eq!(ore.raw_totals().get("iron_ore"), Some(&7.5));
    /// ```
    pub fn raw_totals(&self) -> BTreeMap<String, f64> {
        let mut totals = BTreeMap::new();
        self.accumulate_raw(&mut totals);
        totals
    }

    fn accumulate_raw(&self, totals: &mut BTreeMap<String, f64>) {
        match self {
            ProductionNode::Raw(node) => {
                *totals.entry(node.product.clone()).or_insert(0.0) += node.rate;
            }
            ProductionNode::Crafted(node) => {
                for child in &node.children {
                    child.accumulate_raw(totals);
                }
            }
        }
    }

    /// Sums machine counts per concrete machine name across crafted nodes.
    pub fn machine_totals(&self) -> BTreeMap<String, f64> {
        let mut totals = BTreeMap::new();
        self.accumulate_machines(&mut totals);
        totals
    }

    fn accumulate_machines(&self, totals: &mut BTreeMap<String, f64>) {
        if let ProductionNode::Crafted(node) = self {
            *totals.entry(node.machine.name.clone()).or_insert(0.0) += node.machine_count;
            for child in &node.children {
                child.accumulate_machines(totals);
            }
        }
    }
}

// ============================================================================
// JSON Record Structures
// ============================================================================

fn default_true() -> bool {
    true
}

/// An `{ "name": ..., "amount": ... }` entry in a recipe record.
#[derive(Debug, Clone, Deserialize)]
pub struct AmountRecord {
    pub name: String,
    pub amount: f64,
}

/// The `category` field of a recipe record.
///
/// Current data uses a display path; older files put the machine category
/// here as a single string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CategoryField {
    Path(Vec<String>),
    Legacy(String),
}

/// Recipe record as stored under `recipes.<id>`.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeRecord {
    #[serde(default)]
    pub preferred_machine: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryField>,
    #[serde(default)]
    pub display_category: Option<Vec<String>>,
    /// Crafting time in seconds
    pub time: f64,
    #[serde(default)]
    pub ingredients: Vec<AmountRecord>,
    pub products: Vec<AmountRecord>,
    #[serde(default = "default_true")]
    pub allow_productivity: bool,
}

/// Machine record as stored under `machines.<name>`.
#[derive(Debug, Clone, Deserialize)]
pub struct MachineRecord {
    pub crafting_speed: f64,
    #[serde(default)]
    pub module_slots: u32,
    /// Recipe categories served; empty means the machine serves its own name
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub base_productivity: f64,
}
