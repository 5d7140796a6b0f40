use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use async_trait::async_trait;
use fake::{faker::lorem::en::Sentence, Fake};
use recipe_recommendation_service::{
    domain::entities::{
        recipe::Recipe,
        recipe_point::{Embeddings, RecipePoint},
    },
    ports::{
        chat_completion::{
            ChatCompletionError, ChatCompletionPort, ChatMessage, FunctionCall, ToolCall,
            ToolDefinition,
        },
        embeddings_generator::{EmbeddingsGenerator, EmbeddingsGeneratorError},
        recipe_point_repository::{RecipePointRepository, RecipePointRepositoryError},
        recipe_resolver::{RecipeResolver, RecipeResolverError},
    },
};
use tokio::sync::Mutex;

/// Deterministic embeddings: a small dense vector built from the hashes of
/// the words of the text. Identical texts map to identical vectors, and texts
/// sharing words land closer than unrelated ones.
pub struct StubEmbeddingsGenerator {
    dimension: usize,
}

impl StubEmbeddingsGenerator {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    pub fn embed(&self, text: &str) -> Embeddings {
        let mut vector = vec![0.0f32; self.dimension];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            word.to_lowercase().hash(&mut hasher);
            let bucket = (hasher.finish() as usize) % self.dimension;
            vector[bucket] += 1.0;
        }
        vector
    }
}

#[async_trait]
impl EmbeddingsGenerator for StubEmbeddingsGenerator {
    async fn generate_embeddings(
        &self,
        text: &str,
    ) -> Result<Embeddings, EmbeddingsGeneratorError> {
        Ok(self.embed(text))
    }
}

/// In-memory stand-in for the Qdrant repository, ranking by cosine similarity.
pub struct InMemoryRecipePointRepository {
    points: Mutex<Vec<RecipePoint>>,
}

impl InMemoryRecipePointRepository {
    pub fn new() -> Self {
        Self {
            points: Mutex::new(vec![]),
        }
    }

    pub async fn nb_points(&self) -> usize {
        self.points.lock().await.len()
    }

    pub async fn point_ids(&self) -> Vec<u64> {
        self.points.lock().await.iter().map(|p| p.id).collect()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl RecipePointRepository for InMemoryRecipePointRepository {
    async fn batch_save(
        &self,
        new_points: Vec<RecipePoint>,
    ) -> Result<(), RecipePointRepositoryError> {
        self.points.lock().await.extend(new_points);
        Ok(())
    }

    async fn search_nearest(
        &self,
        vector: &Embeddings,
        limit: u64,
    ) -> Result<Vec<Recipe>, RecipePointRepositoryError> {
        let points = self.points.lock().await;

        let mut scored: Vec<(f32, Recipe)> = points
            .iter()
            .map(|p| (cosine_similarity(&p.vector, vector), p.payload.clone()))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        Ok(scored
            .into_iter()
            .take(limit as usize)
            .map(|(_, recipe)| recipe)
            .collect())
    }
}

/// Chat completion stub replaying a fixed sequence of assistant messages.
pub struct ScriptedChatCompletion {
    responses: Mutex<Vec<ChatMessage>>,
}

impl ScriptedChatCompletion {
    pub fn new(responses: Vec<ChatMessage>) -> Self {
        Self {
            responses: Mutex::new(responses),
        }
    }
}

#[async_trait]
impl ChatCompletionPort for ScriptedChatCompletion {
    async fn complete(
        &self,
        _messages: &[ChatMessage],
        _tools: &[ToolDefinition],
    ) -> Result<ChatMessage, ChatCompletionError> {
        let mut responses = self.responses.lock().await;
        if responses.is_empty() {
            return Err(ChatCompletionError::ProviderError(
                "no scripted response left".into(),
            ));
        }
        Ok(responses.remove(0))
    }
}

/// Recipe resolver stub returning a fixed result and recording the queries.
pub struct StubRecipeResolver {
    pub recipes: Vec<Recipe>,
    pub requests: Mutex<Vec<String>>,
}

impl StubRecipeResolver {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes,
            requests: Mutex::new(vec![]),
        }
    }
}

#[async_trait]
impl RecipeResolver for StubRecipeResolver {
    async fn find_recipes(
        &self,
        user_ingredients: &str,
        _top_k: u64,
    ) -> Result<Vec<Recipe>, RecipeResolverError> {
        self.requests.lock().await.push(user_ingredients.to_string());
        Ok(self.recipes.clone())
    }
}

/// An assistant message requesting one `search_recipes` tool call.
pub fn assistant_tool_call(ingredients: &str) -> ChatMessage {
    ChatMessage {
        role: "assistant".into(),
        content: None,
        tool_calls: Some(vec![ToolCall {
            id: "call_1".into(),
            kind: "function".into(),
            function: FunctionCall {
                name: "search_recipes".into(),
                arguments: format!(r#"{{"ingredients": "{}"}}"#, ingredients),
            },
        }]),
        tool_call_id: None,
    }
}

pub fn recipe(title: &str, ingredients: &str) -> Recipe {
    Recipe {
        title: title.into(),
        ingredients: ingredients.into(),
        instructions: Sentence(3..8).fake(),
    }
}
