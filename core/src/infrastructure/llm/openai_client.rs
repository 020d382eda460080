use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::{
    common::{LLMConfig, entities::app_errors::CoreError},
    scan::{ports::LLMClient, value_objects::ScanImage},
};

/// Client for OpenAI-compatible chat completion endpoints with vision input.
#[derive(Debug, Clone)]
pub struct OpenAiLLMClient {
    api_key: String,
    model_name: String,
    base_url: String,
    max_tokens: u32,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseFormat {
    JsonSchema { json_schema: JsonSchemaFormat },
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    name: String,
    schema: serde_json::Value,
    strict: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiLLMClient {
    pub fn new(config: &LLMConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            model_name: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_tokens: config.max_tokens,
            client: Client::new(),
        }
    }

    async fn call_chat_completions(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<String, CoreError> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("OpenAI API request failed: {}", e);
                CoreError::ServiceError(format!("LLM API error: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("OpenAI API error: {} - {}", status, error_text);
            return Err(CoreError::ServiceError(format!(
                "LLM API returned error: {} - {}",
                status, error_text
            )));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse OpenAI response: {}", e);
            CoreError::ServiceError(format!("Failed to parse LLM response: {}", e))
        })?;

        completion.into_content()
    }
}

impl ChatCompletionResponse {
    /// Text of the first choice; a missing or blank message is an error.
    fn into_content(self) -> Result<String, CoreError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| CoreError::ServiceError("Empty response from LLM".to_string()))
    }
}

impl LLMClient for OpenAiLLMClient {
    async fn generate_with_image(
        &self,
        prompt: String,
        image: ScanImage,
        response_schema: serde_json::Value,
    ) -> Result<String, CoreError> {
        let data_url = format!("data:{};base64,{}", image.mime_type(), image.to_base64());

        let request = ChatCompletionRequest {
            model: self.model_name.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ContentPart::Text { text: prompt },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: data_url },
                    },
                ],
            }],
            response_format: ResponseFormat::JsonSchema {
                json_schema: JsonSchemaFormat {
                    name: "scan_analysis".to_string(),
                    schema: response_schema,
                    strict: false,
                },
            },
            max_tokens: self.max_tokens,
        };

        tracing::debug!(model = %self.model_name, "sending scan to LLM");
        self.call_chat_completions(request).await
    }
}
