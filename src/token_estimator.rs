use crate::{
    constants::{output_estimation, token_estimation},
    request::TaskType,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a piece of text was classified for token estimation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentClass {
    /// Punctuation-heavy text (~3 chars/token)
    Code,
    /// Long-word technical prose (~5 chars/token)
    Dense,
    /// Normal prose (~4 chars/token)
    Prose,
}

/// Detailed breakdown of an input token estimate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenBreakdown {
    pub chars: usize,
    pub code_ratio: f64,
    pub whitespace_ratio: f64,
    pub avg_word_len: f64,
    pub content_class: ContentClass,
    pub chars_per_token: f64,
    pub tokens: u32,
}

/// Classify text and estimate its token count
///
/// Real tokenization needs the model's vocabulary, which the router does not
/// have. Characters-per-token is picked from three content classes instead:
/// - code (> 5% of chars in `{}();=<>[]`): 3.0
/// - dense prose (average word length > 7): 5.0
/// - prose: 4.0
///
/// and scaled by 0.9 when more than 30% of the text is whitespace.
pub fn analyze(text: &str) -> TokenBreakdown {
    let chars = text.chars().count();

    if text.trim().is_empty() {
        return TokenBreakdown {
            chars,
            code_ratio: 0.0,
            whitespace_ratio: if chars == 0 { 0.0 } else { 1.0 },
            avg_word_len: 0.0,
            content_class: ContentClass::Prose,
            chars_per_token: token_estimation::PROSE_CHARS_PER_TOKEN,
            tokens: 1,
        };
    }

    let length = chars as f64;
    let code_chars = text
        .chars()
        .filter(|c| token_estimation::CODE_CHARS.contains(c))
        .count();
    let whitespace_chars = text.chars().filter(|c| c.is_whitespace()).count();
    let code_ratio = code_chars as f64 / length;
    let whitespace_ratio = whitespace_chars as f64 / length;

    let (word_count, word_chars) = text
        .split_whitespace()
        .fold((0usize, 0usize), |(n, total), w| (n + 1, total + w.chars().count()));
    let avg_word_len = word_chars as f64 / word_count.max(1) as f64;

    let (content_class, mut chars_per_token) = if code_ratio > token_estimation::CODE_RATIO_THRESHOLD
    {
        (ContentClass::Code, token_estimation::CODE_CHARS_PER_TOKEN)
    } else if avg_word_len > token_estimation::DENSE_WORD_LENGTH {
        (ContentClass::Dense, token_estimation::DENSE_CHARS_PER_TOKEN)
    } else {
        (ContentClass::Prose, token_estimation::PROSE_CHARS_PER_TOKEN)
    };

    if whitespace_ratio > token_estimation::WHITESPACE_RATIO_THRESHOLD {
        chars_per_token *= token_estimation::SPARSE_TEXT_FACTOR;
    }

    let tokens = ((length / chars_per_token).floor() as u32).max(1);

    TokenBreakdown {
        chars,
        code_ratio,
        whitespace_ratio,
        avg_word_len,
        content_class,
        chars_per_token,
        tokens,
    }
}

/// Estimate input tokens for a prompt (always >= 1)
pub fn estimate_input_tokens(text: &str) -> u32 {
    analyze(text).tokens
}

/// Expected response length relative to the input for one task type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputProfile {
    /// Output tokens per input token
    pub multiplier: f64,
    /// Minimum output tokens regardless of input length
    pub floor: u32,
}

impl OutputProfile {
    /// Profile for tasks without an entry in the table
    pub const FALLBACK: OutputProfile = OutputProfile {
        multiplier: output_estimation::DEFAULT_MULTIPLIER,
        floor: output_estimation::DEFAULT_FLOOR,
    };

    pub const fn new(multiplier: f64, floor: u32) -> Self {
        Self { multiplier, floor }
    }

    /// Built-in profile table
    pub fn default_table() -> BTreeMap<TaskType, OutputProfile> {
        BTreeMap::from([
            (TaskType::Summarize, OutputProfile::new(0.3, 100)),
            (TaskType::Email, OutputProfile::new(0.8, 200)),
            (TaskType::Code, OutputProfile::new(2.5, 300)),
            (TaskType::General, OutputProfile::new(1.5, 150)),
        ])
    }

    /// `min(max(floor, floor(input * multiplier)), model_max_output)`
    pub fn estimate(&self, input_tokens: u32, model_max_output: u32) -> u32 {
        let scaled = (input_tokens as f64 * self.multiplier).floor() as u32;
        scaled.max(self.floor).min(model_max_output)
    }
}

/// Estimate output tokens using the built-in profile table
pub fn estimate_output_tokens(input_tokens: u32, task_type: TaskType, model_max_output: u32) -> u32 {
    OutputProfile::default_table()
        .get(&task_type)
        .copied()
        .unwrap_or(OutputProfile::FALLBACK)
        .estimate(input_tokens, model_max_output)
}
