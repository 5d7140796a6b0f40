use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_json::json;

use crate::{
    configuration::OpenAISettings,
    domain::entities::recipe_point::Embeddings,
    ports::embeddings_generator::{EmbeddingsGenerator, EmbeddingsGeneratorError},
};

/// Embeddings generation backed by the OpenAI embeddings API.
///
/// The one configured model serves both the indexing and the querying path:
/// vectors produced at both times live in the same space.
pub struct OpenAIEmbeddingsService {
    http_client: reqwest::Client,
    api_key: Secret<String>,
    base_url: String,
    model: String,
}

impl OpenAIEmbeddingsService {
    pub fn new(settings: &OpenAISettings) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.clone(),
            model: settings.embeddings_model.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingsData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsData {
    embedding: Embeddings,
}

#[async_trait]
impl EmbeddingsGenerator for OpenAIEmbeddingsService {
    #[tracing::instrument(name = "Generating embeddings", skip(self, text))]
    async fn generate_embeddings(
        &self,
        text: &str,
    ) -> Result<Embeddings, EmbeddingsGeneratorError> {
        let response = self
            .http_client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&json!({ "model": self.model, "input": text }))
            .send()
            .await
            .map_err(|e| EmbeddingsGeneratorError::ProviderError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingsGeneratorError::ProviderError(format!(
                "{}: {}",
                status, body
            )));
        }

        let mut parsed: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingsGeneratorError::InvalidResponse(e.to_string()))?;

        // One input text, so exactly one embedding is expected back
        match parsed.data.pop() {
            Some(data) if parsed.data.is_empty() => Ok(data.embedding),
            _ => Err(EmbeddingsGeneratorError::InvalidResponse(
                "expected exactly one embedding in the response".into(),
            )),
        }
    }
}
