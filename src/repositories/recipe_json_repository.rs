use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use tracing::info;

use crate::{domain::entities::recipe::Recipe, helper::error_chain_fmt};

/// A recipe record as found in the source JSON document.
#[derive(Debug, Deserialize)]
struct RawRecipe {
    title: String,
    ingredients: Vec<String>,
    instructions: String,
}

/// Loads and flattens the recipe dataset.
///
/// The document's top level must be an object mapping recipe ids to records
/// with `title`, `ingredients` (list of strings) and `instructions`. Entries
/// are kept in the order they appear in the document, and each ingredient
/// list is joined into a single ", "-separated string.
#[tracing::instrument(name = "Loading recipes from the JSON dataset")]
pub fn load_recipes(json_path: &Path) -> Result<Vec<Recipe>, RecipeJsonRepositoryError> {
    let data = std::fs::read_to_string(json_path)?;
    let recipes = parse_recipes(&data)?;

    info!("Loaded {} recipes from {}", recipes.len(), json_path.display());
    Ok(recipes)
}

pub fn parse_recipes(data: &str) -> Result<Vec<Recipe>, RecipeJsonRepositoryError> {
    // serde_json is built with `preserve_order`: entries keep document order
    let document: Map<String, JsonValue> = serde_json::from_str(data)?;

    document
        .into_iter()
        .map(|(recipe_id, record)| {
            let raw: RawRecipe = serde_json::from_value(record)
                .map_err(|error| RecipeJsonRepositoryError::InvalidRecord { recipe_id, error })?;

            Ok(Recipe {
                title: raw.title,
                ingredients: raw.ingredients.join(", "),
                instructions: raw.instructions,
            })
        })
        .collect()
}

#[derive(thiserror::Error)]
pub enum RecipeJsonRepositoryError {
    #[error("Could not read the dataset file")]
    IoError(#[from] std::io::Error),

    #[error("The dataset is not a valid JSON object")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid recipe record {recipe_id}: {error}")]
    InvalidRecord {
        recipe_id: String,
        #[source]
        error: serde_json::Error,
    },
}

impl std::fmt::Debug for RecipeJsonRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
