use crate::ledger::UsageStats;
use serde::{Deserialize, Serialize};

/// Top-level JSON document printed by the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliOutput {
    /// "success" or "error"
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<RouteResult>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<UsageStats>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,

    pub metadata: Metadata,
}

/// Outcome of one routed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    /// Catalog key of the chosen model
    pub model: String,
    pub model_name: String,

    /// Model output; absent on dry runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,

    pub estimated_cost: f64,

    /// Cost from provider-reported usage; absent on dry runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_cost: Option<f64>,

    /// Provider-reported total tokens; absent on dry runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,

    pub estimated_input_tokens: u32,
    pub estimated_output_tokens: u32,
    pub routing_reason: String,
    pub fallback: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
}

/// Execution context, echoed back for reproducibility
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub timestamp: String,
    pub latency_ms: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,

    #[serde(default)]
    pub dry_run: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_file: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_path: Option<String>,
}

impl Metadata {
    /// Metadata carrying only the current timestamp
    pub fn now() -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            ..Self::default()
        }
    }
}

impl CliOutput {
    pub fn success_route(route: RouteResult, metadata: Metadata) -> Self {
        Self {
            status: "success".to_string(),
            route: Some(route),
            stats: None,
            error: None,
            metadata,
        }
    }

    pub fn success_stats(stats: UsageStats, metadata: Metadata) -> Self {
        Self {
            status: "success".to_string(),
            route: None,
            stats: Some(stats),
            error: None,
            metadata,
        }
    }

    pub fn error(code: String, message: String, metadata: Metadata) -> Self {
        Self {
            status: "error".to_string(),
            route: None,
            stats: None,
            error: Some(ErrorInfo { code, message }),
            metadata,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}
