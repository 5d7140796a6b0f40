use async_trait::async_trait;

use crate::{
    domain::entities::recipe::Recipe,
    helper::error_chain_fmt,
    ports::{
        embeddings_generator::EmbeddingsGeneratorError,
        recipe_point_repository::RecipePointRepositoryError,
    },
};

/// Resolves free-text user ingredients into matching recipes.
///
/// Modeled as a port so the agent can be exercised with a deterministic stub
/// instead of a live embedding model and vector store.
#[async_trait]
pub trait RecipeResolver: Send + Sync {
    /// Returns the `top_k` recipes closest to `user_ingredients`, best match
    /// first, or the single not-found sentinel when nothing matches.
    async fn find_recipes(
        &self,
        user_ingredients: &str,
        top_k: u64,
    ) -> Result<Vec<Recipe>, RecipeResolverError>;
}

#[derive(thiserror::Error)]
pub enum RecipeResolverError {
    #[error(transparent)]
    EmbeddingsError(#[from] EmbeddingsGeneratorError),

    #[error(transparent)]
    RepositoryError(#[from] RecipePointRepositoryError),
}

impl std::fmt::Debug for RecipeResolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
