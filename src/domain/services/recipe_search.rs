use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::{
    domain::entities::recipe::Recipe,
    ports::{
        embeddings_generator::EmbeddingsGenerator,
        recipe_point_repository::RecipePointRepository,
        recipe_resolver::{RecipeResolver, RecipeResolverError},
    },
};

/// Query resolver: embeds free-text user ingredients with the same generator
/// used at index time and retrieves the closest recipes from the collection.
pub struct RecipeSearchService {
    embeddings_generator: Arc<dyn EmbeddingsGenerator>,
    repository: Arc<dyn RecipePointRepository>,
}

impl RecipeSearchService {
    pub fn new(
        embeddings_generator: Arc<dyn EmbeddingsGenerator>,
        repository: Arc<dyn RecipePointRepository>,
    ) -> Self {
        Self {
            embeddings_generator,
            repository,
        }
    }
}

#[async_trait]
impl RecipeResolver for RecipeSearchService {
    #[tracing::instrument(name = "Finding recipes", skip(self))]
    async fn find_recipes(
        &self,
        user_ingredients: &str,
        top_k: u64,
    ) -> Result<Vec<Recipe>, RecipeResolverError> {
        let query_vector = self
            .embeddings_generator
            .generate_embeddings(user_ingredients)
            .await?;

        let recipes = self.repository.search_nearest(&query_vector, top_k).await?;

        if recipes.is_empty() {
            // A miss is a normal outcome, reported with the sentinel record
            info!("No recipe matched the given ingredients");
            return Ok(vec![Recipe::not_found()]);
        }

        Ok(recipes)
    }
}
