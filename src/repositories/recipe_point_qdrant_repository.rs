use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::{
    prelude::QdrantClient,
    qdrant::{
        value::Kind, vectors_config::Config, CreateCollection, Distance, PointStruct,
        SearchPoints, Value, VectorParams, VectorsConfig,
    },
};
use tracing::info;

use crate::{
    domain::entities::{
        recipe::Recipe,
        recipe_point::{Embeddings, RecipePoint},
    },
    helper::error_chain_fmt,
    ports::recipe_point_repository::{RecipePointRepository, RecipePointRepositoryError},
};

/// Repository for recipe points persisted in a Qdrant collection.
///
/// Owns the client connection: dropping the repository releases it, on every
/// exit path.
pub struct RecipePointQdrantRepository {
    client: QdrantClient,
    collection_name: String,
}

impl RecipePointQdrantRepository {
    /// Initializes the collection destructively: a collection with the same
    /// name is deleted if present, then recreated with the given vector size
    /// and distance.
    ///
    /// Rebuilding from scratch keeps the indexing step idempotent and
    /// guarantees no stale point survives from a previous run.
    #[tracing::instrument(name = "Initializing the Qdrant recipes collection", skip(client))]
    pub async fn try_new(
        client: QdrantClient,
        collection_name: &str,
        collection_distance: &str,
        collection_vector_size: u64,
    ) -> Result<Self, RecipePointQdrantRepositoryError> {
        let collection_distance = Distance::from_str_name(collection_distance).ok_or(
            RecipePointQdrantRepositoryError::QdrantConfigurationError(format!(
                "Invalid Qdrant distance from configuration: {}",
                collection_distance
            )),
        )?;

        // Qdrant client only returns anyhow errors: a missing collection can
        // only be told apart from a real failure by its message
        if let Err(error) = client.delete_collection(collection_name).await {
            let message = error.to_string();
            if !message.contains("doesn't exist") && !message.contains("Not found") {
                return Err(RecipePointQdrantRepositoryError::QdrantError(message));
            }
        }

        client
            .create_collection(&CreateCollection {
                collection_name: collection_name.to_string(),
                vectors_config: Some(VectorsConfig {
                    config: Some(Config::Params(VectorParams {
                        size: collection_vector_size,
                        distance: collection_distance as i32,
                        ..Default::default()
                    })),
                }),
                ..Default::default()
            })
            .await
            .map_err(|e| RecipePointQdrantRepositoryError::QdrantError(e.to_string()))?;

        Ok(Self {
            client,
            collection_name: collection_name.to_string(),
        })
    }
}

#[async_trait]
impl RecipePointRepository for RecipePointQdrantRepository {
    #[tracing::instrument(name = "Saving recipe points to Qdrant", skip(self, points))]
    async fn batch_save(
        &self,
        points: Vec<RecipePoint>,
    ) -> Result<(), RecipePointRepositoryError> {
        let nb_points = points.len();

        self.client
            .upsert_points(
                &self.collection_name,
                points.into_iter().map(PointStruct::from).collect(),
                None,
            )
            .await
            .map_err(|e| RecipePointRepositoryError::StoreError(e.to_string()))?;

        info!("Indexed {} recipes in the vector store", nb_points);
        Ok(())
    }

    #[tracing::instrument(name = "Searching nearest recipe points", skip(self, vector))]
    async fn search_nearest(
        &self,
        vector: &Embeddings,
        limit: u64,
    ) -> Result<Vec<Recipe>, RecipePointRepositoryError> {
        let response = self
            .client
            .search_points(&SearchPoints {
                collection_name: self.collection_name.clone(),
                vector: vector.clone(),
                limit,
                with_payload: Some(true.into()),
                ..Default::default()
            })
            .await
            .map_err(|e| RecipePointRepositoryError::StoreError(e.to_string()))?;

        // Hits come back best match first
        response
            .result
            .into_iter()
            .map(|hit| recipe_from_payload(hit.payload))
            .collect()
    }
}

#[derive(thiserror::Error)]
pub enum RecipePointQdrantRepositoryError {
    #[error("Error from Qdrant: {0}")]
    QdrantError(String),

    #[error("Error from Qdrant config: {0}")]
    QdrantConfigurationError(String),
}

impl std::fmt::Debug for RecipePointQdrantRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<RecipePoint> for PointStruct {
    fn from(point: RecipePoint) -> Self {
        Self {
            id: Some(point.id.into()),
            vectors: Some(point.vector.into()),
            payload: HashMap::from([
                ("title".to_string(), Value::from(point.payload.title)),
                (
                    "ingredients".to_string(),
                    Value::from(point.payload.ingredients),
                ),
                (
                    "instructions".to_string(),
                    Value::from(point.payload.instructions),
                ),
            ]),
        }
    }
}

fn recipe_from_payload(
    payload: HashMap<String, Value>,
) -> Result<Recipe, RecipePointRepositoryError> {
    Ok(Recipe {
        title: string_field(&payload, "title")?,
        ingredients: string_field(&payload, "ingredients")?,
        instructions: string_field(&payload, "instructions")?,
    })
}

fn string_field(
    payload: &HashMap<String, Value>,
    field: &str,
) -> Result<String, RecipePointRepositoryError> {
    match payload.get(field).and_then(|value| value.kind.clone()) {
        Some(Kind::StringValue(value)) => Ok(value),
        _ => Err(RecipePointRepositoryError::InvalidPayload(format!(
            "missing or non-string field `{}`",
            field
        ))),
    }
}
