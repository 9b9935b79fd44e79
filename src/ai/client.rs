use async_trait::async_trait;
use openrouter_api::{
    models::provider_preferences::ProviderPreferences,
    models::provider_preferences::ProviderSort,
    types::chat::{ChatCompletionRequest, Message},
};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::config::EndpointConfig;
use crate::error::EvalError;

/// Result of one inference call. A failure carries the reason only; callers
/// decide how to degrade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    Success(String),
    Failure(String),
}

/// A single-turn, non-streaming chat completion.
///
/// Implementations are not required to be thread-safe; one call is awaited
/// before the next is issued.
#[async_trait(?Send)]
pub trait InferenceBackend {
    async fn generate(&self, prompt: &str) -> CallOutcome;

    fn model(&self) -> &str;
}

#[derive(Serialize)]
struct ChatPayload<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Any OpenAI-compatible chat-completions URL with bearer auth.
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    client: reqwest::Client,
    api_url: String,
    model: String,
}

impl HttpEndpoint {
    pub fn new(config: &EndpointConfig) -> Result<Self, EvalError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| EvalError::config("Invalid API key format"))?;
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| EvalError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait(?Send)]
impl InferenceBackend for HttpEndpoint {
    async fn generate(&self, prompt: &str) -> CallOutcome {
        let payload = ChatPayload {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        let response = match self.client.post(&self.api_url).json(&payload).send().await {
            Ok(response) => response,
            Err(e) => return CallOutcome::Failure(format!("request failed: {}", e)),
        };

        let status = response.status();
        if !status.is_success() {
            return CallOutcome::Failure(format!("endpoint returned {}", status));
        }

        match response.json::<ChatResponse>().await {
            Ok(body) => match body.choices.into_iter().next() {
                Some(choice) => CallOutcome::Success(choice.message.content),
                None => CallOutcome::Failure("No response choices received".to_string()),
            },
            Err(e) => CallOutcome::Failure(format!("malformed response body: {}", e)),
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// OpenRouter through `openrouter_api`; the key comes from `OPENROUTER_API_KEY`.
#[derive(Debug)]
pub struct OpenRouterBackend {
    client: openrouter_api::OpenRouterClient<openrouter_api::Ready>,
    model: String,
}

impl OpenRouterBackend {
    pub fn new(model: impl Into<String>) -> Result<Self, EvalError> {
        let client = openrouter_api::OpenRouterClient::quick()
            .map_err(|e| EvalError::config(format!("Failed to create OpenRouter client: {}", e)))?;

        Ok(Self {
            client,
            model: model.into(),
        })
    }

    fn request(&self, prompt: &str) -> ChatCompletionRequest {
        let provider = ProviderPreferences::new().with_sort(ProviderSort::Throughput);

        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![Message::text("user", prompt)],
            provider: Some(provider),
            stream: None,
            response_format: None,
            tools: None,
            tool_choice: None,
            models: None,
            transforms: None,
            route: None,
            user: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            top_k: None,
            frequency_penalty: None,
            presence_penalty: None,
            repetition_penalty: None,
            min_p: None,
            top_a: None,
            seed: None,
            stop: None,
            logit_bias: None,
            logprobs: None,
            top_logprobs: None,
            prediction: None,
            parallel_tool_calls: None,
            verbosity: None,
        }
    }
}

#[async_trait(?Send)]
impl InferenceBackend for OpenRouterBackend {
    async fn generate(&self, prompt: &str) -> CallOutcome {
        let chat = match self.client.chat() {
            Ok(chat) => chat,
            Err(e) => return CallOutcome::Failure(format!("OpenRouter API error: {}", e)),
        };

        let response = match chat.chat_completion(self.request(prompt)).await {
            Ok(response) => response,
            Err(e) => return CallOutcome::Failure(format!("OpenRouter API error: {}", e)),
        };

        match response.choices.first() {
            Some(choice) => match &choice.message.content {
                openrouter_api::MessageContent::Text(text) => CallOutcome::Success(text.clone()),
                openrouter_api::MessageContent::Parts(parts) => {
                    let text_parts: Vec<String> = parts
                        .iter()
                        .filter_map(|p| {
                            if let openrouter_api::ContentPart::Text(tc) = p {
                                Some(tc.text.clone())
                            } else {
                                None
                            }
                        })
                        .collect();
                    CallOutcome::Success(text_parts.join("\n"))
                }
            },
            None => CallOutcome::Failure("No response choices received".to_string()),
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}
