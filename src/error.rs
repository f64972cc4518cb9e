//! Error types for game-data loading and production-chain resolution.

use std::path::PathBuf;

/// Errors raised while loading the game data file.
///
/// Loading is all-or-nothing: any of these leaves the caller without a store.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// An I/O error occurred while reading the data file.
    #[error("failed to read {file}: {source}")]
    Io {
        file: PathBuf,
        source: std::io::Error,
    },

    /// The file is not valid JSON, or its top level has the wrong shape.
    #[error("invalid JSON in {origin}: {detail}")]
    Parse { origin: String, detail: String },

    /// A required top-level section is absent.
    #[error("missing required section '{section}' in {origin}")]
    MissingSection {
        origin: String,
        section: &'static str,
    },

    /// A single record failed to deserialize or violates a value constraint.
    #[error("invalid {kind} '{id}': {detail}")]
    InvalidRecord {
        kind: &'static str,
        id: String,
        detail: String,
    },
}

/// Errors surfaced by the resolver and by belt-to-rate translation.
///
/// Every variant carries the identifiers needed to build a user-facing
/// message without re-deriving context.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    /// The root product was requested as a calculation target but has no recipe.
    #[error("Recipe '{product}' not found!")]
    RecipeNotFound { product: String },

    /// A recipe names a machine category the store does not define.
    #[error("machine '{machine}' required by recipe '{recipe}' not found")]
    MachineNotFound { recipe: String, machine: String },

    /// The requested belt color is not defined.
    #[error("Belt color '{color}' not found!")]
    BeltNotFound { color: String },

    /// An ingredient chain leads back to one of its own ancestors.
    #[error("cyclic dependency: {}", cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    /// A recipe/machine pair yields no positive output rate.
    #[error("recipe '{recipe}' yields a non-positive rate per machine ({rate})")]
    DegenerateRate { recipe: String, rate: f64 },

    /// The requested rate is negative or not a finite number.
    #[error("invalid target rate {rate} for '{product}'")]
    InvalidTargetRate { product: String, rate: f64 },
}
