use crate::{
    error::RouterError,
    models::LlmResponse,
    provider::{InvokeParams, LlmProvider},
    providers::OpenAIProvider,
};

/// Execution-layer entry point wrapping one provider
pub struct LlmClient {
    provider: Box<dyn LlmProvider>,
}

impl LlmClient {
    /// Client for an OpenAI-compatible endpoint
    pub fn new(api_url: String) -> Self {
        Self {
            provider: Box::new(OpenAIProvider::new(api_url)),
        }
    }

    /// Client around any provider implementation
    pub fn with_provider(provider: Box<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Invoke the model named in `params`
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use budget_llm_router::{LlmClient, InvokeParams};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = LlmClient::new("https://api.groq.com/openai/v1/chat/completions".to_string());
    ///
    /// let response = client
    ///     .invoke(InvokeParams {
    ///         model: "llama-3.1-8b-instant",
    ///         prompt: "Say hello",
    ///         max_tokens: 150,
    ///         api_key: Some("gsk-..."),
    ///         timeout_secs: 60,
    ///     })
    ///     .await?;
    /// println!("{} ({} tokens)", response.content, response.usage.total());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn invoke(&self, params: InvokeParams<'_>) -> Result<LlmResponse, RouterError> {
        self.provider.invoke(params).await
    }
}
