//! Budget-aware LLM router
//!
//! Picks the best-scoring model whose estimated cost fits a per-request budget,
//! calls it through an OpenAI-compatible endpoint, prices the call from the
//! provider-reported usage and records it in an append-only ledger.

pub mod budget_guard;
pub mod catalog;
mod client;
pub mod config;
pub mod config_builder;
pub mod constants;
pub mod cost;
mod error;
pub mod ledger;
mod models;
mod output;
mod provider;
pub mod providers;
mod request;
pub mod selector;
pub mod token_estimator;

pub use budget_guard::{is_affordable, Affordability};
pub use catalog::{load_catalog_file, CatalogFile, ModelCatalog, ModelDescriptor};
pub use client::LlmClient;
pub use config::{load_config_file, ConfigFileRequest};
pub use error::RouterError;
pub use ledger::{LedgerEntry, UsageLedger, UsageStats};
pub use models::*;
pub use output::{CliOutput, ErrorInfo, Metadata, RouteResult};
pub use provider::{InvokeParams, LlmProvider};
pub use providers::OpenAIProvider;
pub use request::{QualityTier, RoutingRequest, TaskType};
pub use selector::{ExecutionPlan, ModelSelector, RoutingDecision};
pub use token_estimator::{estimate_input_tokens, estimate_output_tokens, OutputProfile};

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};

/// Everything needed to route and execute one request
#[derive(Debug, Clone)]
pub struct RouteConfig {
    pub api_url: String,
    pub request: RoutingRequest,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub catalog: Arc<ModelCatalog>,
    pub ledger_path: PathBuf,
    /// Select and estimate only; no provider call, no ledger entry
    pub dry_run: bool,
    // Source tracking for metadata
    pub catalog_file: Option<PathBuf>,
    pub prompt_file: Option<PathBuf>,
}

fn create_metadata(config: &RouteConfig, latency_ms: u64) -> Metadata {
    Metadata {
        timestamp: chrono::Utc::now().to_rfc3339(),
        latency_ms,
        api_url: (!config.dry_run).then(|| config.api_url.clone()),
        task_type: Some(config.request.task_type().to_string()),
        quality: Some(config.request.quality().to_string()),
        budget: Some(config.request.budget()),
        dry_run: config.dry_run,
        catalog_file: config
            .catalog_file
            .as_ref()
            .map(|p| p.display().to_string()),
        ledger_path: (!config.dry_run).then(|| config.ledger_path.display().to_string()),
    }
}

fn route_result(decision: &RoutingDecision) -> RouteResult {
    RouteResult {
        model: decision.model_key.clone(),
        model_name: decision.model_name.clone(),
        response: None,
        estimated_cost: decision.estimated_cost,
        actual_cost: None,
        tokens_used: None,
        estimated_input_tokens: decision.estimated_input_tokens,
        estimated_output_tokens: decision.estimated_output_tokens,
        routing_reason: decision.reason.clone(),
        fallback: decision.fallback,
        score: decision.score,
    }
}

/// Route a request and call the chosen model through the configured endpoint
pub async fn route(config: RouteConfig) -> Result<CliOutput, RouterError> {
    let client = LlmClient::new(config.api_url.clone());
    route_with_client(config, &client).await
}

/// Route a request using a caller-supplied client
///
/// Steps: select a model, derive the execution plan, invoke the provider with
/// the plan's output-token ceiling, price the call from reported usage, append
/// one ledger entry. Provider failures are returned as-is and leave the ledger
/// untouched.
pub async fn route_with_client(
    config: RouteConfig,
    client: &LlmClient,
) -> Result<CliOutput, RouterError> {
    let start_time = Instant::now();

    let selector = ModelSelector::new(Arc::clone(&config.catalog));
    let decision = selector.select(&config.request)?;
    let plan = decision.execution_plan();

    if config.dry_run {
        log::info!(
            "Dry run: would call {} with max_tokens={}",
            plan.model_key,
            plan.max_output_tokens
        );
        let metadata = create_metadata(&config, start_time.elapsed().as_millis() as u64);
        return Ok(CliOutput::success_route(route_result(&decision), metadata));
    }

    log::info!(
        "Calling {} via {} (max_tokens={})",
        plan.model_key,
        client.provider_name(),
        plan.max_output_tokens
    );

    let response = client
        .invoke(InvokeParams {
            model: &plan.model_key,
            prompt: config.request.prompt(),
            max_tokens: plan.max_output_tokens,
            api_key: config.api_key.as_deref(),
            timeout_secs: config.timeout_secs,
        })
        .await?;

    let model = config.catalog.get(&plan.model_key).ok_or_else(|| {
        RouterError::InvalidCatalog(format!(
            "model '{}' disappeared from the catalog",
            plan.model_key
        ))
    })?;
    let actual_cost = cost::actual_cost(
        model,
        response.usage.input_tokens,
        response.usage.output_tokens,
    );

    log::info!(
        "Actual cost ${actual_cost:.8} (estimated ${:.8}), tokens in={} out={}",
        decision.estimated_cost,
        response.usage.input_tokens,
        response.usage.output_tokens
    );

    let ledger = UsageLedger::new(&config.ledger_path);
    ledger.append(&LedgerEntry::now(
        &plan.model_key,
        config.request.task_type(),
        response.usage.input_tokens,
        response.usage.output_tokens,
        decision.estimated_cost,
        actual_cost,
        &decision.reason,
    ))?;

    let result = RouteResult {
        response: Some(response.content),
        actual_cost: Some(actual_cost),
        tokens_used: Some(response.usage.total()),
        ..route_result(&decision)
    };

    let metadata = create_metadata(&config, start_time.elapsed().as_millis() as u64);
    Ok(CliOutput::success_route(result, metadata))
}

/// Aggregate usage statistics from the ledger at `ledger_path`
///
/// A missing ledger yields zeroed statistics.
pub fn usage_stats<P: AsRef<Path>>(ledger_path: P) -> Result<CliOutput, RouterError> {
    let start_time = Instant::now();
    let ledger = UsageLedger::new(ledger_path.as_ref());
    let stats = ledger.stats()?;

    log::info!(
        "Ledger '{}': {} requests, total ${:.6}",
        ledger.path().display(),
        stats.total_requests,
        stats.total_cost
    );

    let metadata = Metadata {
        latency_ms: start_time.elapsed().as_millis() as u64,
        ledger_path: Some(ledger.path().display().to_string()),
        ..Metadata::now()
    };
    Ok(CliOutput::success_stats(stats, metadata))
}
