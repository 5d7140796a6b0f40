use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::{
    configuration::OpenAISettings,
    ports::chat_completion::{
        ChatCompletionError, ChatCompletionPort, ChatMessage, ToolDefinition,
    },
};

/// Chat completions client speaking OpenAI's function-calling protocol.
pub struct OpenAIChatService {
    http_client: reqwest::Client,
    api_key: Secret<String>,
    base_url: String,
    model: String,
}

impl OpenAIChatService {
    pub fn new(settings: &OpenAISettings) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.clone(),
            model: settings.chat_model.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ToolPayload<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'a str>,
}

/// A tool definition wrapped the way the wire format expects it
#[derive(Debug, Serialize)]
struct ToolPayload<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    function: &'a ToolDefinition,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[async_trait]
impl ChatCompletionPort for OpenAIChatService {
    #[tracing::instrument(name = "Requesting a chat completion", skip(self, messages, tools))]
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<ChatMessage, ChatCompletionError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            tools: tools
                .iter()
                .map(|tool| ToolPayload {
                    kind: "function",
                    function: tool,
                })
                .collect(),
            // The model decides on its own whether to invoke a tool
            tool_choice: (!tools.is_empty()).then_some("auto"),
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatCompletionError::ProviderError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ChatCompletionError::ProviderError(format!(
                "{}: {}",
                status, body
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatCompletionError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| {
                ChatCompletionError::InvalidResponse("the response contained no choices".into())
            })
    }
}
