use crate::{error::RouterError, models::LlmResponse};
use async_trait::async_trait;

/// Parameters for one chat-completions call
///
/// # Example
///
/// ```ignore
/// let params = InvokeParams {
///     model: "llama-3.1-8b-instant",
///     prompt: "What is 2+2?",
///     max_tokens: 150,
///     api_key: Some("gsk-..."),
///     timeout_secs: 60,
/// };
/// ```
#[derive(Debug, Clone)]
pub struct InvokeParams<'a> {
    /// Model key chosen by the selector
    pub model: &'a str,

    /// User prompt, sent as the single user message
    pub prompt: &'a str,

    /// Output-token ceiling from the execution plan
    pub max_tokens: u32,

    /// Bearer token for the provider
    pub api_key: Option<&'a str>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Upstream model provider
///
/// Implementations return the generated content together with the provider's
/// own token counts, which feed the actual-cost calculation.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn invoke(&self, params: InvokeParams<'_>) -> Result<LlmResponse, RouterError>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
