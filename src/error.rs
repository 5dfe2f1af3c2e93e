use thiserror::Error;

/// Every failure the router can surface
///
/// `BudgetInfeasible` is the only error produced by model selection. Provider
/// failures (`AuthenticationFailed`, `InvalidResponse`, `Http`) come from the
/// execution layer and never overlap with it.
#[derive(Error, Debug)]
pub enum RouterError {
    #[error("No model fits within the given budget: budget ${budget:.8}, cheapest estimate ${cheapest_cost:.8}")]
    BudgetInfeasible { budget: f64, cheapest_cost: f64 },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid model catalog: {0}")]
    InvalidCatalog(String),

    #[error("Missing API key: {0}")]
    MissingApiKey(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Invalid response from LLM API: {0}")]
    InvalidResponse(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Usage ledger failed: {0}")]
    LedgerFailed(String),
}

impl RouterError {
    /// Machine-readable error code used in JSON output
    pub fn code(&self) -> &'static str {
        match self {
            Self::BudgetInfeasible { .. } => "BUDGET_INFEASIBLE",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::InvalidArguments(_) => "INVALID_ARGUMENTS",
            Self::FileNotFound(_) => "FILE_NOT_FOUND",
            Self::InvalidCatalog(_) => "INVALID_CATALOG",
            Self::MissingApiKey(_) => "MISSING_API_KEY",
            Self::AuthenticationFailed(_) => "AUTH_FAILED",
            Self::InvalidResponse(_) => "INVALID_RESPONSE",
            Self::Http(_) => "HTTP_ERROR",
            Self::LedgerFailed(_) => "LEDGER_FAILED",
        }
    }

    /// Process exit code for the CLI (unique per variant)
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArguments(_) => 1,
            Self::FileNotFound(_) => 2,
            Self::InvalidRequest(_) => 3,
            Self::InvalidCatalog(_) => 4,
            Self::BudgetInfeasible { .. } => 5,
            Self::MissingApiKey(_) => 6,
            Self::AuthenticationFailed(_) => 7,
            Self::InvalidResponse(_) => 8,
            Self::Http(_) => 9,
            Self::LedgerFailed(_) => 10,
        }
    }

    /// True for failures that originate from the upstream provider call
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed(_) | Self::InvalidResponse(_) | Self::Http(_)
        )
    }
}
