//! Production chain resolution.
//!
//! Given a product and a target rate, the resolver walks the recipe graph
//! and builds a [`ProductionNode`] tree: how many machines each crafted item
//! needs and how fast every ingredient must arrive, down to raw inputs.
//!
//! The computation is pure. It reads the [`GameData`] store, owns its own
//! per-call path stack, and returns either a complete tree or an error;
//! there are no partial results.

use tracing::debug;

use crate::data::GameData;
use crate::error::ResolveError;
use crate::models::{CraftedNode, ProductionNode, RawNode, Recipe};

/// Per-invocation state threaded through the recursion.
///
/// Holds the chain of product ids currently being resolved, from the root
/// down to the node being built. Sibling branches never see each other's
/// entries, so an item shared by two branches is not mistaken for a cycle.
#[derive(Debug, Default)]
pub(crate) struct ResolutionContext {
    path: Vec<String>,
}

impl ResolutionContext {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of ancestors of the node being resolved.
    pub(crate) fn depth(&self) -> usize {
        self.path.len()
    }

    /// Returns the cycle closed by resolving `product` next, if any.
    ///
    /// The cycle starts at the ancestor equal to `product` and ends with
    /// `product` itself, e.g. `[A, B, A]`.
    fn cycle_through(&self, product: &str) -> Option<Vec<String>> {
        let start = self.path.iter().position(|p| p == product)?;
        let mut cycle = self.path[start..].to_vec();
        cycle.push(product.to_string());
        Some(cycle)
    }

    fn push(&mut self, product: &str) {
        self.path.push(product.to_string());
    }

    fn pop(&mut self) {
        self.path.pop();
    }
}

fn check_rate(product: &str, rate: f64) -> Result<(), ResolveError> {
    if rate < 0.0 || !rate.is_finite() {
        return Err(ResolveError::InvalidTargetRate {
            product: product.to_string(),
            rate,
        });
    }
    Ok(())
}

/// Resolves the production tree for `product` at `target_rate` items/s.
///
/// An item without a recipe resolves to a [`ProductionNode::Raw`] leaf, at the
/// root as anywhere else. Use [`resolve_root`] when the root must be craftable.
///
/// # Errors
///
/// - [`ResolveError::InvalidTargetRate`] if `target_rate` is negative or not finite
/// - [`ResolveError::MachineNotFound`] if a recipe's machine category is undefined
/// - [`ResolveError::DegenerateRate`] if a machine would deliver nothing
/// - [`ResolveError::CyclicDependency`] if an ingredient requires one of its ancestors
///
/// # Example
///
/// ```
/// use factorio_calc::data::GameData;
/// use factorio_calc::models::{ItemAmount, Machine, Recipe};
/// use factorio_calc::resolver::resolve;
///
/// let cable = Recipe {
///     id: "copper_cable".to_string(),
///     ingredients: vec![ItemAmount::new("copper_plate", 1.0)],
///     products: vec![ItemAmount::new("copper_cable", 1.0)],
///     craft_time: 0.5,
///     preferred_machine: "crafting".to_string(),
///     allow_productivity: false,
///     category: vec![],
/// };
/// let assembler = Machine {
///     id: "crafting".to_string(),
///     name: "assembling_machine_1".to_string(),
///     speed_multiplier: 1.0,
///     productivity_bonus: 0.0,
///     module_slots: 0,
/// };
/// let data = GameData::new(vec![cable], vec![assembler], vec![]).unwrap();
///
/// let tree = resolve("copper_cable", 240.0, &data).unwrap();
/// let node = tree.as_crafted().unwrap();
/// assert_eq!(node.machine_count, 120.0);
/// assert_eq!(node.children[0].rate(), 240.0);
/// ```
pub fn resolve(product: &str, target_rate: f64, data: &GameData) -> Result<ProductionNode, ResolveError> {
    check_rate(product, target_rate)?;
    let mut ctx = ResolutionContext::new();
    resolve_with(product, target_rate, data, &mut ctx)
}

/// Resolves a calculation target, which must have a recipe.
///
/// # Errors
///
/// Returns [`ResolveError::RecipeNotFound`] when no recipe makes `product`,
/// plus everything [`resolve`] may return.
pub fn resolve_root(product: &str, target_rate: f64, data: &GameData) -> Result<ProductionNode, ResolveError> {
    check_rate(product, target_rate)?;
    if data.recipe_for(product).is_none() {
        return Err(ResolveError::RecipeNotFound {
            product: product.to_string(),
        });
    }
    resolve(product, target_rate, data)
}

/// Translates a belt color into its throughput in items/s.
///
/// # Errors
///
/// Returns [`ResolveError::BeltNotFound`] for an unknown color.
pub fn target_rate_for_belt(color: &str, data: &GameData) -> Result<f64, ResolveError> {
    data.belt(color)
        .map(|belt| belt.items_per_second)
        .ok_or_else(|| ResolveError::BeltNotFound {
            color: color.to_string(),
        })
}

/// Resolves several calculation targets against one shared store.
///
/// Each request is resolved with [`resolve_root`] independently; results are
/// returned in request order. With the `parallel` feature the requests run on
/// the rayon thread pool.
pub fn resolve_many<S>(requests: &[(S, f64)], data: &GameData) -> Vec<Result<ProductionNode, ResolveError>>
where
    S: AsRef<str> + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        requests
            .par_iter()
            .map(|(product, rate)| resolve_root(product.as_ref(), *rate, data))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        requests
            .iter()
            .map(|(product, rate)| resolve_root(product.as_ref(), *rate, data))
            .collect()
    }
}

/// Base and productivity-adjusted amount of `product` per craft cycle.
fn effective_output(recipe: &Recipe, product: &str, productivity_bonus: f64) -> (f64, f64) {
    // Looked up by recipe id, a recipe may not list the id among its products.
    let amount = recipe
        .product(product)
        .or_else(|| recipe.products.first())
        .map_or(0.0, |p| p.amount);
    let effective = if recipe.allow_productivity {
        amount * (1.0 + productivity_bonus)
    } else {
        amount
    };
    (amount, effective)
}

fn resolve_with(
    product: &str,
    target_rate: f64,
    data: &GameData,
    ctx: &mut ResolutionContext,
) -> Result<ProductionNode, ResolveError> {
    let indent = "  ".repeat(ctx.depth());

    let Some(recipe) = data.recipe_for(product) else {
        debug!("{}{} is raw at {:.2} items/s", indent, product, target_rate);
        return Ok(ProductionNode::Raw(RawNode {
            product: product.to_string(),
            rate: target_rate,
        }));
    };

    let machine = data
        .machine(&recipe.preferred_machine)
        .ok_or_else(|| ResolveError::MachineNotFound {
            recipe: recipe.id.clone(),
            machine: recipe.preferred_machine.clone(),
        })?;

    let (product_amount, output) = effective_output(recipe, product, machine.productivity_bonus);
    let cycles_per_second = machine.speed_multiplier / recipe.craft_time;
    let per_machine_rate = output * cycles_per_second;
    if !(per_machine_rate > 0.0 && per_machine_rate.is_finite()) {
        return Err(ResolveError::DegenerateRate {
            recipe: recipe.id.clone(),
            rate: per_machine_rate,
        });
    }

    let machine_count = target_rate / per_machine_rate;
    debug!(
        "{}{} via {} on {}: {:.2} items/s, {:.2} per machine, {:.2} machines",
        indent, product, recipe.id, machine.name, target_rate, per_machine_rate, machine_count
    );

    ctx.push(product);
    let children = resolve_ingredients(recipe, cycles_per_second, machine_count, data, ctx);
    ctx.pop();

    Ok(ProductionNode::Crafted(CraftedNode {
        product: product.to_string(),
        recipe: recipe.id.clone(),
        machine: machine.clone(),
        craft_time: recipe.craft_time,
        product_amount,
        allow_productivity: recipe.allow_productivity,
        cycles_per_second,
        per_machine_rate,
        machine_count,
        target_rate,
        children: children?,
    }))
}

/// Resolves every ingredient of `recipe` for `machine_count` machines.
///
/// Consumption depends only on craft cycles; productivity never changes it.
fn resolve_ingredients(
    recipe: &Recipe,
    cycles_per_second: f64,
    machine_count: f64,
    data: &GameData,
    ctx: &mut ResolutionContext,
) -> Result<Vec<ProductionNode>, ResolveError> {
    let mut children = Vec::with_capacity(recipe.ingredients.len());
    for ingredient in &recipe.ingredients {
        if let Some(cycle) = ctx.cycle_through(&ingredient.item) {
            return Err(ResolveError::CyclicDependency { cycle });
        }
        let rate = ingredient.amount * cycles_per_second * machine_count;
        children.push(resolve_with(&ingredient.item, rate, data, ctx)?);
    }
    Ok(children)
}
