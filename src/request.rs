//! Routing request types and boundary validation

use crate::{
    constants::{request_limits, selection},
    error::RouterError,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Closed set of task categories a prompt can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    General,
    Code,
    Email,
    Summarize,
}

impl TaskType {
    pub const ALL: [TaskType; 4] = [
        TaskType::General,
        TaskType::Code,
        TaskType::Email,
        TaskType::Summarize,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::General => "general",
            TaskType::Code => "code",
            TaskType::Email => "email",
            TaskType::Summarize => "summarize",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "general" => Ok(TaskType::General),
            "code" => Ok(TaskType::Code),
            "email" => Ok(TaskType::Email),
            "summarize" => Ok(TaskType::Summarize),
            other => Err(RouterError::InvalidRequest(format!(
                "Unknown task_type '{other}'. Valid values: general, code, email, summarize"
            ))),
        }
    }
}

/// Requested minimum quality tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityTier {
    /// Minimum `quality_score` a model needs to be considered for this tier
    pub fn min_score(&self) -> f64 {
        match self {
            QualityTier::Low => selection::LOW_QUALITY_THRESHOLD,
            QualityTier::Medium => selection::MEDIUM_QUALITY_THRESHOLD,
            QualityTier::High => selection::HIGH_QUALITY_THRESHOLD,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::Low => "low",
            QualityTier::Medium => "medium",
            QualityTier::High => "high",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityTier {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(QualityTier::Low),
            "medium" => Ok(QualityTier::Medium),
            "high" => Ok(QualityTier::High),
            other => Err(RouterError::InvalidRequest(format!(
                "Unknown quality '{other}'. Valid values: low, medium, high"
            ))),
        }
    }
}

/// A validated routing request
///
/// Fields are private so the only way to obtain one is through [`RoutingRequest::new`],
/// which enforces the boundary rules. The selector trusts these invariants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingRequest {
    prompt: String,
    task_type: TaskType,
    budget: f64,
    quality: QualityTier,
}

impl RoutingRequest {
    pub fn new(
        prompt: impl Into<String>,
        task_type: TaskType,
        budget: f64,
        quality: QualityTier,
    ) -> Result<Self, RouterError> {
        let prompt = prompt.into();

        if prompt.trim().is_empty() {
            return Err(RouterError::InvalidRequest(
                "prompt must not be empty".to_string(),
            ));
        }

        let length = prompt.chars().count();
        if length > request_limits::MAX_PROMPT_CHARS {
            return Err(RouterError::InvalidRequest(format!(
                "prompt is {length} characters, maximum is {}",
                request_limits::MAX_PROMPT_CHARS
            )));
        }

        if !budget.is_finite() || budget <= 0.0 {
            return Err(RouterError::InvalidRequest(format!(
                "budget must be a positive amount in USD, got {budget}"
            )));
        }

        Ok(Self {
            prompt,
            task_type,
            budget,
            quality,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn task_type(&self) -> TaskType {
        self.task_type
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    pub fn quality(&self) -> QualityTier {
        self.quality
    }
}
