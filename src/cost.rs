//! Cost calculation shared by pre-call estimates and post-call accounting
//!
//! Both paths go through [`cost`], so any gap between an estimate and the actual
//! figure comes from token counts alone, never from pricing.

use crate::{catalog::ModelDescriptor, constants::pricing};

/// Round a USD amount to `decimals` places
pub fn round_usd(amount: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (amount * factor).round() / factor
}

/// `input * input_price + output * output_price`, rounded to 8 decimal places
pub fn cost(model: &ModelDescriptor, input_tokens: u32, output_tokens: u32) -> f64 {
    let input_cost = input_tokens as f64 * model.input_price_per_token;
    let output_cost = output_tokens as f64 * model.output_price_per_token;
    round_usd(input_cost + output_cost, pricing::COST_DECIMALS)
}

/// Pre-call cost from estimated token counts
pub fn estimate_cost(model: &ModelDescriptor, input_tokens: u32, output_tokens: u32) -> f64 {
    cost(model, input_tokens, output_tokens)
}

/// Post-call cost from the provider's reported usage
pub fn actual_cost(model: &ModelDescriptor, input_tokens: u32, output_tokens: u32) -> f64 {
    cost(model, input_tokens, output_tokens)
}
