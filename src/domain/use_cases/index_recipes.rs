use crate::{
    domain::entities::{recipe::Recipe, recipe_point::RecipePoint},
    helper::error_chain_fmt,
    ports::{
        embeddings_generator::{EmbeddingsGenerator, EmbeddingsGeneratorError},
        recipe_point_repository::{RecipePointRepository, RecipePointRepositoryError},
    },
};

/// Embeds every recipe's ingredient list and upserts the resulting points in
/// one batch.
///
/// Point ids are the positions of the recipes in the sampled sequence. There
/// is no delta indexing: re-running re-embeds the whole sequence into the
/// freshly recreated collection.
#[tracing::instrument(
    name = "Indexing recipes",
    skip_all,
    fields(nb_recipes = recipes.len())
)]
pub async fn index_recipes(
    embeddings_generator: &dyn EmbeddingsGenerator,
    repository: &dyn RecipePointRepository,
    recipes: &[Recipe],
) -> Result<(), IndexRecipesError> {
    let mut points = Vec::with_capacity(recipes.len());

    for (idx, recipe) in recipes.iter().enumerate() {
        let vector = embeddings_generator
            .generate_embeddings(&recipe.ingredients)
            .await?;
        points.push(RecipePoint {
            id: idx as u64,
            vector,
            payload: recipe.clone(),
        });
    }

    repository.batch_save(points).await?;

    Ok(())
}

#[derive(thiserror::Error)]
pub enum IndexRecipesError {
    #[error(transparent)]
    EmbeddingsError(#[from] EmbeddingsGeneratorError),

    #[error(transparent)]
    RepositoryError(#[from] RecipePointRepositoryError),
}

impl std::fmt::Debug for IndexRecipesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
