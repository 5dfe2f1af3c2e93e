use budget_llm_router::{
    config_builder::ConfigBuilder, route_with_client, InvokeParams, LlmClient, LlmProvider,
    LlmResponse, RouterError, TaskType, TokenUsage, UsageLedger,
};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// Records every call and answers with fixed usage
struct MockProvider {
    calls: Arc<Mutex<Vec<(String, u32)>>>,
    usage: TokenUsage,
}

#[async_trait::async_trait]
impl LlmProvider for MockProvider {
    async fn invoke(&self, params: InvokeParams<'_>) -> Result<LlmResponse, RouterError> {
        self.calls
            .lock()
            .unwrap()
            .push((params.model.to_string(), params.max_tokens));
        Ok(LlmResponse {
            content: format!("echo: {}", params.prompt),
            usage: self.usage,
        })
    }

    fn name(&self) -> &str {
        "Mock"
    }
}

struct FailingProvider;

#[async_trait::async_trait]
impl LlmProvider for FailingProvider {
    async fn invoke(&self, _params: InvokeParams<'_>) -> Result<LlmResponse, RouterError> {
        Err(RouterError::InvalidResponse("upstream exploded".to_string()))
    }

    fn name(&self) -> &str {
        "Failing"
    }
}

#[tokio::test]
async fn test_mock_provider_receives_plan() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let client = LlmClient::with_provider(Box::new(MockProvider {
        calls: Arc::clone(&calls),
        usage: TokenUsage {
            input_tokens: 100,
            output_tokens: 300,
        },
    }));
    assert_eq!(client.provider_name(), "Mock");

    let dir = TempDir::new().unwrap();
    let prompt = "a(b);".repeat(60);
    let config = ConfigBuilder::new()
        .prompt(prompt.clone())
        .task_type(TaskType::Code)
        .budget(0.01)
        .api_key("unused")
        .ledger_path(dir.path().join("ledger.jsonl"))
        .build()
        .unwrap();
    let ledger_path = config.ledger_path.clone();

    let output = route_with_client(config, &client).await.unwrap();

    // code: 100 input tokens * 2.5 = 250, raised to the 300 floor
    let recorded = calls.lock().unwrap().clone();
    assert_eq!(
        recorded,
        vec![("llama-3.3-70b-versatile".to_string(), 300)]
    );

    let result = output.route.unwrap();
    assert_eq!(result.response, Some(format!("echo: {prompt}")));
    // 100 * 0.59e-6 + 300 * 0.79e-6
    assert!((result.actual_cost.unwrap() - 0.000296).abs() < 1e-12);
    assert_eq!(result.tokens_used, Some(400));

    let stats = UsageLedger::new(&ledger_path).stats().unwrap();
    assert_eq!(stats.total_requests, 1);
    assert_eq!(stats.model_usage.get("llama-3.3-70b-versatile"), Some(&1));
}

#[tokio::test]
async fn test_provider_error_propagates_without_ledger_entry() {
    let client = LlmClient::with_provider(Box::new(FailingProvider));

    let dir = TempDir::new().unwrap();
    let config = ConfigBuilder::new()
        .prompt("Hello")
        .budget(0.01)
        .api_key("unused")
        .ledger_path(dir.path().join("ledger.jsonl"))
        .build()
        .unwrap();
    let ledger_path = config.ledger_path.clone();

    let err = route_with_client(config, &client).await.unwrap_err();
    assert_eq!(err.code(), "INVALID_RESPONSE");
    assert!(err.to_string().contains("upstream exploded"));
    assert!(!ledger_path.exists());
}
