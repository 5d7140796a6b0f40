use async_trait::async_trait;

use crate::{domain::entities::recipe_point::Embeddings, helper::error_chain_fmt};

/// Generates a fixed-length embedding vector for a piece of text.
///
/// The same implementation must be used at index time and at query time,
/// otherwise distances between vectors are meaningless.
#[async_trait]
pub trait EmbeddingsGenerator: Send + Sync {
    async fn generate_embeddings(&self, text: &str)
        -> Result<Embeddings, EmbeddingsGeneratorError>;
}

#[derive(thiserror::Error)]
pub enum EmbeddingsGeneratorError {
    #[error("Error from the embeddings provider: {0}")]
    ProviderError(String),

    #[error("Invalid response from the embeddings provider: {0}")]
    InvalidResponse(String),
}

impl std::fmt::Debug for EmbeddingsGeneratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
