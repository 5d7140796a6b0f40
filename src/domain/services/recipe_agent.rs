use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::{
    helper::error_chain_fmt,
    ports::{
        chat_completion::{
            ChatCompletionError, ChatCompletionPort, ChatMessage, ToolCall, ToolDefinition,
        },
        recipe_resolver::{RecipeResolver, RecipeResolverError},
    },
};

const SEARCH_RECIPES_TOOL: &str = "search_recipes";

const SYSTEM_PROMPT: &str = "You are a recipe recommendation assistant. \
    When the user lists ingredients, you may call the search_recipes tool to \
    retrieve matching recipes, then answer with a helpful natural-language \
    recommendation based on the retrieved recipes.";

/// Tool-using agent producing the final natural-language recommendation.
///
/// The model decides on its own whether to invoke the single available tool;
/// this service only supplies the tool binding and drives the
/// completion / tool-result loop until the model emits a final answer.
pub struct RecipeAgent {
    chat_completion: Arc<dyn ChatCompletionPort>,
    recipe_resolver: Arc<dyn RecipeResolver>,
    top_k: u64,
    max_steps: usize,
}

/// Arguments of a `search_recipes` tool call, as emitted by the model.
#[derive(Debug, Deserialize)]
struct SearchRecipesArgs {
    ingredients: String,
}

impl RecipeAgent {
    pub fn new(
        chat_completion: Arc<dyn ChatCompletionPort>,
        recipe_resolver: Arc<dyn RecipeResolver>,
        top_k: u64,
        max_steps: usize,
    ) -> Self {
        Self {
            chat_completion,
            recipe_resolver,
            top_k,
            max_steps,
        }
    }

    fn tool_definitions() -> Vec<ToolDefinition> {
        vec![ToolDefinition {
            name: SEARCH_RECIPES_TOOL.to_string(),
            description: "Search recipes matching the ingredients supplied by the user"
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "ingredients": {
                        "type": "string",
                        "description": "The ingredients the user has, in free text"
                    }
                },
                "required": ["ingredients"]
            }),
        }]
    }

    /// Runs the completion loop for one user query and returns the model's
    /// final answer, tool-informed or not.
    #[tracing::instrument(name = "Invoking the recipe agent", skip(self))]
    pub async fn invoke(&self, user_query: &str) -> Result<String, RecipeAgentError> {
        let tools = Self::tool_definitions();
        let mut messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(user_query),
        ];

        for step in 1..=self.max_steps {
            debug!(step, "Requesting the next completion");
            let response = self.chat_completion.complete(&messages, &tools).await?;

            let tool_calls = response.tool_calls.clone().unwrap_or_default();
            if tool_calls.is_empty() {
                return response.content.ok_or_else(|| {
                    RecipeAgentError::InvalidCompletion(
                        "the final completion contained neither content nor tool calls".into(),
                    )
                });
            }

            messages.push(response);

            for tool_call in &tool_calls {
                let result = self.execute_tool_call(tool_call).await?;
                messages.push(ChatMessage::tool(tool_call.id.clone(), result));
            }
        }

        Err(RecipeAgentError::MaxStepsExceeded(self.max_steps))
    }

    async fn execute_tool_call(&self, tool_call: &ToolCall) -> Result<String, RecipeAgentError> {
        if tool_call.function.name != SEARCH_RECIPES_TOOL {
            // Only one tool was offered: report the hallucinated name back to
            // the model instead of failing the run
            return Ok(format!("Tool '{}' not found", tool_call.function.name));
        }

        let args: SearchRecipesArgs =
            serde_json::from_str(&tool_call.function.arguments).map_err(|error| {
                RecipeAgentError::InvalidToolArguments(error, tool_call.function.arguments.clone())
            })?;

        info!(ingredients = %args.ingredients, "Searching recipes for the agent");
        let recipes = self
            .recipe_resolver
            .find_recipes(&args.ingredients, self.top_k)
            .await?;

        serde_json::to_string(&recipes).map_err(RecipeAgentError::ToolResultSerialization)
    }
}

#[derive(thiserror::Error)]
pub enum RecipeAgentError {
    #[error(transparent)]
    ChatCompletionError(#[from] ChatCompletionError),

    #[error(transparent)]
    RecipeResolverError(#[from] RecipeResolverError),

    #[error("Invalid tool call arguments: {0}. Arguments: {1}")]
    InvalidToolArguments(serde_json::Error, String),

    #[error("Could not serialize the tool result to JSON")]
    ToolResultSerialization(#[source] serde_json::Error),

    #[error("Invalid completion from the model: {0}")]
    InvalidCompletion(String),

    #[error("The agent did not produce a final answer within {0} steps")]
    MaxStepsExceeded(usize),
}

impl std::fmt::Debug for RecipeAgentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
