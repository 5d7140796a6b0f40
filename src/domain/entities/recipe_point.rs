use serde::{Deserialize, Serialize};

use crate::domain::entities::recipe::Recipe;

pub type Embeddings = Vec<f32>;

/// One point of the recipes collection: positional id, the embedding of the
/// recipe's ingredients, and the full recipe as payload.
///
/// Lifecycle bounded by the collection's: the collection is dropped and
/// rebuilt on every run, so no point survives across runs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecipePoint {
    pub id: u64,
    pub vector: Embeddings,
    pub payload: Recipe,
}
