//! Fixed tables and defaults shared across the router

/// Heuristics for converting raw text into an approximate token count
pub mod token_estimation {
    /// Characters that mark text as code-like
    pub const CODE_CHARS: [char; 10] = ['{', '}', '(', ')', ';', '=', '<', '>', '[', ']'];

    /// Code-character ratio above which text is treated as code
    pub const CODE_RATIO_THRESHOLD: f64 = 0.05;

    /// Average word length above which prose is treated as dense/technical
    pub const DENSE_WORD_LENGTH: f64 = 7.0;

    /// Whitespace ratio above which tokens are assumed to pack tighter
    pub const WHITESPACE_RATIO_THRESHOLD: f64 = 0.3;

    pub const CODE_CHARS_PER_TOKEN: f64 = 3.0;
    pub const DENSE_CHARS_PER_TOKEN: f64 = 5.0;
    pub const PROSE_CHARS_PER_TOKEN: f64 = 4.0;

    /// Multiplier applied to chars/token for whitespace-heavy text
    pub const SPARSE_TEXT_FACTOR: f64 = 0.9;
}

/// Output-length profiles per task type
pub mod output_estimation {
    /// Multiplier used when a task has no profile
    pub const DEFAULT_MULTIPLIER: f64 = 1.5;

    /// Floor used when a task has no profile
    pub const DEFAULT_FLOOR: u32 = 150;
}

/// Selection policy
pub mod selection {
    /// Score bonus for a model whose strengths include the requested task
    pub const STRENGTH_BONUS: f64 = 15.0;

    pub const LOW_QUALITY_THRESHOLD: f64 = 0.0;
    pub const MEDIUM_QUALITY_THRESHOLD: f64 = 60.0;
    pub const HIGH_QUALITY_THRESHOLD: f64 = 75.0;
}

/// Monetary rounding
pub mod pricing {
    /// Decimal places kept for per-request costs (estimate and actual)
    pub const COST_DECIMALS: i32 = 8;

    /// Decimal places kept for aggregate ledger statistics
    pub const STATS_DECIMALS: i32 = 6;
}

/// Request boundary limits
pub mod request_limits {
    /// Maximum prompt length in characters
    pub const MAX_PROMPT_CHARS: usize = 10_000;
}

/// Defaults for the upstream chat-completions call
pub mod llm_defaults {
    /// Groq's OpenAI-compatible chat completions endpoint
    pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

    /// Environment variable consulted when no API key is configured
    pub const DEFAULT_API_KEY_ENV: &str = "GROQ_API_KEY";

    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
}

/// Usage ledger location
pub mod ledger_defaults {
    pub const DEFAULT_LEDGER_PATH: &str = "logs/requests.jsonl";
}
