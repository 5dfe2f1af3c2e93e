use crate::{
    error::RouterError,
    models::{LlmResponse, Message, OpenAIRequest, OpenAIResponse, TokenUsage},
    provider::{InvokeParams, LlmProvider},
};
use async_trait::async_trait;
use reqwest::Client;

use super::logging::{log_request, log_response};

/// OpenAI-compatible chat completions provider (Groq, OpenAI, vLLM, ...)
pub struct OpenAIProvider {
    client: Client,
    api_url: String,
}

impl OpenAIProvider {
    pub fn new(api_url: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    async fn invoke(&self, params: InvokeParams<'_>) -> Result<LlmResponse, RouterError> {
        let request = OpenAIRequest {
            model: params.model.to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: params.prompt.to_string(),
            }],
            max_tokens: params.max_tokens,
        };

        log_request(&request);

        let mut req = self
            .client
            .post(&self.api_url)
            .json(&request)
            .timeout(std::time::Duration::from_secs(params.timeout_secs));

        if let Some(key) = params.api_key {
            req = req.header("Authorization", format!("Bearer {key}"));
            log::debug!("Authorization header: Bearer [REDACTED]");
        }

        let response = req.send().await?;

        if !response.status().is_success() {
            let status = response.status();

            if status == 401 {
                return Err(RouterError::AuthenticationFailed(
                    "Invalid or missing API key".to_string(),
                ));
            }

            let error_body = response.text().await.unwrap_or_default();
            let error_msg = format!(
                "HTTP {} error: {}\nResponse from API: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error"),
                if error_body.is_empty() {
                    "No details provided"
                } else {
                    &error_body
                }
            );

            return Err(RouterError::InvalidResponse(error_msg));
        }

        let response_text = response.text().await?;
        log_response(&response_text);

        let openai_response: OpenAIResponse = serde_json::from_str(&response_text)
            .map_err(|e| RouterError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        let content = openai_response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| RouterError::InvalidResponse("No choices in response".to_string()))?;

        let usage: TokenUsage = openai_response
            .usage
            .map(TokenUsage::from)
            .ok_or_else(|| {
                RouterError::InvalidResponse("No token usage in response".to_string())
            })?;

        log::debug!(
            "Provider reported usage: prompt={}, completion={}",
            usage.input_tokens,
            usage.output_tokens
        );

        Ok(LlmResponse { content, usage })
    }

    fn name(&self) -> &str {
        "OpenAI"
    }
}
