use std::{path::Path, sync::Arc};

use qdrant_client::prelude::{QdrantClient, QdrantClientConfig};
use tracing::info;

use crate::{
    configuration::{QdrantSettings, Settings},
    domain::{
        services::{
            openai_chat::OpenAIChatService,
            openai_embeddings::OpenAIEmbeddingsService,
            recipe_agent::{RecipeAgent, RecipeAgentError},
            recipe_search::RecipeSearchService,
            sampling::keep_first_n,
        },
        use_cases::index_recipes::{index_recipes, IndexRecipesError},
    },
    helper::error_chain_fmt,
    repositories::{
        recipe_json_repository::{load_recipes, RecipeJsonRepositoryError},
        recipe_point_qdrant_repository::{
            RecipePointQdrantRepository, RecipePointQdrantRepositoryError,
        },
    },
};

/// The fully wired pipeline: dataset loaded and sampled, collection rebuilt
/// and indexed, agent ready to answer queries.
///
/// Owns the Qdrant connection through its repository: dropping the
/// application releases it on every exit path.
pub struct Application {
    agent: RecipeAgent,
}

impl Application {
    /// Builds the whole pipeline, sequentially. Any upstream failure aborts
    /// the build: nothing is indexed after a configuration or data error.
    #[tracing::instrument(name = "Building application", skip(settings))]
    pub async fn build(settings: Settings) -> Result<Self, ApplicationError> {
        let recipes = load_recipes(Path::new(&settings.dataset.json_path))?;
        let recipes = keep_first_n(settings.dataset.sample_size, recipes);
        info!("Kept {} recipes for indexing", recipes.len());

        let qdrant_client = get_qdrant_client(&settings.qdrant)?;
        let repository = Arc::new(
            RecipePointQdrantRepository::try_new(
                qdrant_client,
                &settings.qdrant.collection_name,
                &settings.qdrant.collection_distance,
                settings.qdrant.collection_vector_size,
            )
            .await?,
        );

        let embeddings_generator = Arc::new(OpenAIEmbeddingsService::new(&settings.openai));

        index_recipes(embeddings_generator.as_ref(), repository.as_ref(), &recipes).await?;

        let recipe_resolver = Arc::new(RecipeSearchService::new(embeddings_generator, repository));
        let chat_completion = Arc::new(OpenAIChatService::new(&settings.openai));

        let agent = RecipeAgent::new(
            chat_completion,
            recipe_resolver,
            settings.agent.top_k,
            settings.agent.max_steps,
        );

        Ok(Self { agent })
    }

    /// Answers one free-text ingredient query with the agent.
    pub async fn recommend(&self, user_query: &str) -> Result<String, ApplicationError> {
        Ok(self.agent.invoke(user_query).await?)
    }
}

/// Sets up a client to Qdrant
pub fn get_qdrant_client(config: &QdrantSettings) -> Result<QdrantClient, ApplicationError> {
    let qdrant_config = QdrantClientConfig::from_url(&config.get_grpc_base_url());
    QdrantClient::new(Some(qdrant_config)).map_err(|e| ApplicationError::QdrantError(e.to_string()))
}

#[derive(thiserror::Error)]
pub enum ApplicationError {
    #[error(transparent)]
    DatasetError(#[from] RecipeJsonRepositoryError),

    #[error("Error from Qdrant: {0}")]
    QdrantError(String),

    #[error(transparent)]
    CollectionError(#[from] RecipePointQdrantRepositoryError),

    #[error(transparent)]
    IndexingError(#[from] IndexRecipesError),

    #[error(transparent)]
    AgentError(#[from] RecipeAgentError),
}

impl std::fmt::Debug for ApplicationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
