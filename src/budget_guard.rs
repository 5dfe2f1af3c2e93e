//! Affordability check: estimate tokens, estimate output, price, compare to budget

use crate::{
    catalog::{ModelCatalog, ModelDescriptor},
    cost::estimate_cost,
    request::TaskType,
    token_estimator::{estimate_input_tokens, OutputProfile},
};
use serde::Serialize;

/// Result of checking one model against a budget
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Affordability {
    pub affordable: bool,
    pub estimated_cost: f64,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Same as [`is_affordable`] with the input estimate already computed
///
/// Input tokens do not depend on the model, so the selector estimates them once
/// per request and reuses the figure for every candidate.
pub fn check_with_input_tokens(
    model: &ModelDescriptor,
    input_tokens: u32,
    budget: f64,
    output_profile: OutputProfile,
) -> Affordability {
    let output_tokens = output_profile.estimate(input_tokens, model.max_output_tokens);
    let estimated_cost = estimate_cost(model, input_tokens, output_tokens);
    Affordability {
        affordable: estimated_cost <= budget,
        estimated_cost,
        input_tokens,
        output_tokens,
    }
}

/// Check whether `model` can serve `prompt` within `budget`
///
/// Pure and side-effect free; the selector calls it once per candidate.
/// The comparison is inclusive: a cost equal to the budget is affordable.
pub fn is_affordable(
    catalog: &ModelCatalog,
    model: &ModelDescriptor,
    prompt: &str,
    budget: f64,
    task_type: TaskType,
) -> Affordability {
    let input_tokens = estimate_input_tokens(prompt);
    check_with_input_tokens(model, input_tokens, budget, catalog.output_profile(task_type))
}
