use async_trait::async_trait;

use crate::{
    domain::entities::{
        recipe::Recipe,
        recipe_point::{Embeddings, RecipePoint},
    },
    helper::error_chain_fmt,
};

/// Persistence of recipe points in a vector store.
#[async_trait]
pub trait RecipePointRepository: Send + Sync {
    /// Upserts all points into the collection in a single batch.
    ///
    /// Postcondition: the collection holds one point per given recipe.
    async fn batch_save(&self, points: Vec<RecipePoint>)
        -> Result<(), RecipePointRepositoryError>;

    /// Returns the payloads of the `limit` points closest to `vector`,
    /// best match first.
    async fn search_nearest(
        &self,
        vector: &Embeddings,
        limit: u64,
    ) -> Result<Vec<Recipe>, RecipePointRepositoryError>;
}

#[derive(thiserror::Error)]
pub enum RecipePointRepositoryError {
    #[error("Error from the vector store: {0}")]
    StoreError(String),

    #[error("Invalid point payload: {0}")]
    InvalidPayload(String),
}

impl std::fmt::Debug for RecipePointRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
