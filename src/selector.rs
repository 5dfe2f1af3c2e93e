//! Model selection
//!
//! Picks the best-scoring affordable model for a request, or the cheapest
//! affordable model when nothing meets the quality floor. The selector owns a
//! shared, read-only [`ModelCatalog`] and keeps no other state, so one instance
//! can serve any number of concurrent requests.

use crate::{
    budget_guard::{check_with_input_tokens, Affordability},
    catalog::{ModelCatalog, ModelDescriptor},
    constants::selection,
    error::RouterError,
    request::{QualityTier, RoutingRequest, TaskType},
    token_estimator::estimate_input_tokens,
};
use serde::Serialize;
use std::{cmp::Ordering, sync::Arc};

/// The selector's answer for one request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingDecision {
    pub model_key: String,
    pub model_name: String,
    /// Human-readable justification
    pub reason: String,
    pub estimated_cost: f64,
    /// Selection score; `None` when chosen by the budget fallback
    pub score: Option<f64>,
    pub fallback: bool,
    pub estimated_input_tokens: u32,
    pub estimated_output_tokens: u32,
}

impl RoutingDecision {
    /// What the execution layer needs to make the call
    pub fn execution_plan(&self) -> ExecutionPlan {
        ExecutionPlan {
            model_key: self.model_key.clone(),
            max_output_tokens: self.estimated_output_tokens,
        }
    }
}

/// Model to call and the output-token ceiling to pass through
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionPlan {
    pub model_key: String,
    pub max_output_tokens: u32,
}

struct Evaluated<'a> {
    key: &'a str,
    model: &'a ModelDescriptor,
    check: Affordability,
}

impl Evaluated<'_> {
    fn score(&self, task_type: TaskType) -> f64 {
        if self.model.is_strong_at(task_type) {
            self.model.quality_score + selection::STRENGTH_BONUS
        } else {
            self.model.quality_score
        }
    }

    fn decision(&self, reason: String, score: Option<f64>) -> RoutingDecision {
        RoutingDecision {
            model_key: self.key.to_string(),
            model_name: self.model.name.clone(),
            reason,
            estimated_cost: self.check.estimated_cost,
            score,
            fallback: score.is_none(),
            estimated_input_tokens: self.check.input_tokens,
            estimated_output_tokens: self.check.output_tokens,
        }
    }
}

/// Cheapest first; equal costs fall back to key order
fn by_cost(a: &Evaluated<'_>, b: &Evaluated<'_>) -> Ordering {
    a.check
        .estimated_cost
        .total_cmp(&b.check.estimated_cost)
        .then_with(|| a.key.cmp(b.key))
}

/// Routes requests against an injected catalog
#[derive(Debug, Clone)]
pub struct ModelSelector {
    catalog: Arc<ModelCatalog>,
}

impl ModelSelector {
    pub fn new(catalog: Arc<ModelCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Select a model for a validated request
    pub fn select(&self, request: &RoutingRequest) -> Result<RoutingDecision, RouterError> {
        self.select_model(
            request.prompt(),
            request.task_type(),
            request.budget(),
            request.quality(),
        )
    }

    /// Select a model for `prompt`
    ///
    /// 1. Models below the quality tier's minimum score, or over budget, are dropped.
    /// 2. Survivors score `quality_score`, plus 15 when the task is one of their strengths.
    /// 3. Highest score wins; equal scores go to the lower estimated cost, then to
    ///    the lexicographically smaller key.
    /// 4. With no survivors the quality floor is ignored entirely and the cheapest
    ///    affordable model of the whole catalog is returned as a fallback.
    ///
    /// # Errors
    ///
    /// [`RouterError::BudgetInfeasible`] when no model fits the budget even with the
    /// quality floor ignored.
    pub fn select_model(
        &self,
        prompt: &str,
        task_type: TaskType,
        budget: f64,
        quality: QualityTier,
    ) -> Result<RoutingDecision, RouterError> {
        let min_score = quality.min_score();
        let input_tokens = estimate_input_tokens(prompt);
        let output_profile = self.catalog.output_profile(task_type);

        let evaluated: Vec<Evaluated<'_>> = self
            .catalog
            .iter()
            .map(|(key, model)| Evaluated {
                key,
                model,
                check: check_with_input_tokens(model, input_tokens, budget, output_profile),
            })
            .collect();

        for e in &evaluated {
            log::debug!(
                "Candidate {}: quality={}, est. cost=${:.8} (in={}, out={}), affordable={}",
                e.key,
                e.model.quality_score,
                e.check.estimated_cost,
                e.check.input_tokens,
                e.check.output_tokens,
                e.check.affordable
            );
        }

        let best = evaluated
            .iter()
            .filter(|e| e.model.quality_score >= min_score && e.check.affordable)
            .map(|e| (e, e.score(task_type)))
            .min_by(|(a, score_a), (b, score_b)| {
                score_b.total_cmp(score_a).then_with(|| by_cost(a, b))
            });

        if let Some((winner, score)) = best {
            let reason = format!(
                "Best match: {} (score {:.0}, est. cost ${:.8})",
                winner.model.name, score, winner.check.estimated_cost
            );
            log::info!("Routing to {}: {reason}", winner.key);
            return Ok(winner.decision(reason, Some(score)));
        }

        log::debug!(
            "No model meets quality '{quality}' (min score {min_score}) within ${budget:.8}; \
             falling back to cheapest affordable model"
        );

        if let Some(cheapest) = evaluated
            .iter()
            .filter(|e| e.check.affordable)
            .min_by(|a, b| by_cost(a, b))
        {
            let reason = format!(
                "Fallback: {} is the cheapest model within budget (est. cost ${:.8}); \
                 no model meets the '{quality}' quality floor within budget",
                cheapest.model.name, cheapest.check.estimated_cost
            );
            log::warn!("Routing to {}: {reason}", cheapest.key);
            return Ok(cheapest.decision(reason, None));
        }

        let cheapest_cost = evaluated
            .iter()
            .map(|e| e.check.estimated_cost)
            .min_by(f64::total_cmp)
            .unwrap_or(0.0);

        log::warn!(
            "No model fits budget ${budget:.8}; cheapest estimate is ${cheapest_cost:.8}"
        );

        Err(RouterError::BudgetInfeasible {
            budget,
            cheapest_cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};

    fn model(
        name: &str,
        price: f64,
        quality: f64,
        strengths: &[TaskType],
    ) -> ModelDescriptor {
        ModelDescriptor {
            name: name.to_string(),
            input_price_per_token: price,
            output_price_per_token: price,
            quality_score: quality,
            strengths: strengths.iter().copied().collect::<BTreeSet<_>>(),
            max_output_tokens: 32_000,
        }
    }

    fn selector(models: Vec<(&str, ModelDescriptor)>) -> ModelSelector {
        let models: BTreeMap<String, ModelDescriptor> = models
            .into_iter()
            .map(|(k, m)| (k.to_string(), m))
            .collect();
        ModelSelector::new(Arc::new(ModelCatalog::new(models).unwrap()))
    }

    fn default_selector() -> ModelSelector {
        ModelSelector::new(Arc::new(ModelCatalog::default_catalog()))
    }

    fn prose_400() -> String {
        format!("{}abcd", "abcde ".repeat(66))
    }

    #[test]
    fn test_email_scenario_picks_highest_scoring_affordable() {
        let decision = default_selector()
            .select_model(&prose_400(), TaskType::Email, 0.0005, QualityTier::Low)
            .unwrap();

        // mixtral: 75 + 15 email bonus beats llama-70b's 85
        assert_eq!(decision.model_key, "mixtral-8x7b-32768");
        assert_eq!(decision.score, Some(90.0));
        assert_eq!(decision.estimated_input_tokens, 100);
        assert_eq!(decision.estimated_output_tokens, 200);
        assert!((decision.estimated_cost - 0.000_072).abs() < 1e-12);
        assert_eq!(
            decision.reason,
            "Best match: Mixtral 8x7B 32768 (score 90, est. cost $0.00007200)"
        );
        assert!(!decision.fallback);
    }

    #[test]
    fn test_code_scenario_uses_code_estimates() {
        let prompt = "a(b);".repeat(60);
        let decision = default_selector()
            .select_model(&prompt, TaskType::Code, 0.01, QualityTier::Medium)
            .unwrap();

        assert_eq!(decision.estimated_input_tokens, 100);
        assert_eq!(decision.estimated_output_tokens, 300);
        assert_eq!(decision.model_key, "llama-3.3-70b-versatile");
        assert_eq!(decision.score, Some(100.0));
    }

    #[test]
    fn test_selection_is_deterministic() {
        let selector = default_selector();
        let a = selector
            .select_model("Summarize this paragraph.", TaskType::Summarize, 0.001, QualityTier::High)
            .unwrap();
        let b = selector
            .select_model("Summarize this paragraph.", TaskType::Summarize, 0.001, QualityTier::High)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_equal_scores_go_to_cheaper_model() {
        // key order would favour "a-pricey"
        let selector = selector(vec![
            ("a-pricey", model("Pricey", 0.000_002, 70.0, &[])),
            ("z-cheap", model("Cheap", 0.000_001, 70.0, &[])),
        ]);

        let decision = selector
            .select_model("hello there", TaskType::General, 1.0, QualityTier::Low)
            .unwrap();
        assert_eq!(decision.model_key, "z-cheap");
    }

    #[test]
    fn test_strength_bonus_counts_toward_score() {
        let selector = selector(vec![
            ("generalist", model("Generalist", 0.000_001, 80.0, &[TaskType::General])),
            ("coder", model("Coder", 0.000_001, 70.0, &[TaskType::Code])),
        ]);

        let code = selector
            .select_model("write a parser", TaskType::Code, 1.0, QualityTier::Low)
            .unwrap();
        assert_eq!(code.model_key, "coder");
        assert_eq!(code.score, Some(85.0));

        let general = selector
            .select_model("tell me a story", TaskType::General, 1.0, QualityTier::Low)
            .unwrap();
        assert_eq!(general.model_key, "generalist");
    }

    #[test]
    fn test_quality_floor_filters_candidates() {
        let selector = selector(vec![
            ("weak", model("Weak", 0.000_001, 59.0, &[TaskType::General])),
            ("ok", model("Ok", 0.000_001, 60.0, &[])),
        ]);

        // weak scores 74 with its bonus but is below the medium floor
        let decision = selector
            .select_model("hello", TaskType::General, 1.0, QualityTier::Medium)
            .unwrap();
        assert_eq!(decision.model_key, "ok");
    }

    #[test]
    fn test_fallback_returns_only_affordable_model() {
        let selector = selector(vec![
            ("premium", model("Premium", 0.01, 90.0, &[])),
            ("budget", model("Budget", 0.000_000_01, 10.0, &[])),
        ]);

        let decision = selector
            .select_model("hello", TaskType::General, 0.0001, QualityTier::High)
            .unwrap();
        assert_eq!(decision.model_key, "budget");
        assert!(decision.fallback);
        assert_eq!(decision.score, None);
        assert!(decision.reason.starts_with("Fallback:"));
    }

    #[test]
    fn test_fallback_ignores_floor_instead_of_lowering_it() {
        let selector = selector(vec![
            ("premium", model("Premium", 0.01, 90.0, &[])),
            ("middle", model("Middle", 0.000_000_2, 50.0, &[])),
            ("bottom", model("Bottom", 0.000_000_1, 5.0, &[])),
        ]);

        // relaxing the floor step by step would stop at "middle"
        let decision = selector
            .select_model("hello", TaskType::General, 0.0001, QualityTier::High)
            .unwrap();
        assert_eq!(decision.model_key, "bottom");
    }

    #[test]
    fn test_no_affordable_model_is_budget_infeasible() {
        let selector = selector(vec![
            ("a", model("A", 0.001, 90.0, &[])),
            ("b", model("B", 0.002, 50.0, &[])),
        ]);

        let err = selector
            .select_model("hello", TaskType::General, 0.0001, QualityTier::Low)
            .unwrap_err();

        match err {
            RouterError::BudgetInfeasible {
                budget,
                cheapest_cost,
            } => {
                assert_eq!(budget, 0.0001);
                // 1 input + 150 output tokens at $0.001
                assert!((cheapest_cost - 0.151).abs() < 1e-12);
            }
            other => panic!("expected BudgetInfeasible, got {other:?}"),
        }
    }

    #[test]
    fn test_infeasible_message_has_budget_and_cheapest() {
        let err = default_selector()
            .select_model("hello", TaskType::General, 0.000_000_01, QualityTier::Low)
            .unwrap_err();
        let msg = err.to_string();
        assert_eq!(err.code(), "BUDGET_INFEASIBLE");
        assert!(msg.contains("$0.00000001"));
        assert!(msg.contains("cheapest estimate"));
    }

    #[test]
    fn test_execution_plan_carries_output_ceiling() {
        let decision = default_selector()
            .select_model(&prose_400(), TaskType::Email, 0.0005, QualityTier::Low)
            .unwrap();
        let plan = decision.execution_plan();
        assert_eq!(plan.model_key, "mixtral-8x7b-32768");
        assert_eq!(plan.max_output_tokens, 200);
    }

    #[test]
    fn test_select_accepts_validated_request() {
        let request =
            RoutingRequest::new(prose_400(), TaskType::Email, 0.0005, QualityTier::Low).unwrap();
        let selector = default_selector();
        assert_eq!(
            selector.select(&request).unwrap(),
            selector
                .select_model(&prose_400(), TaskType::Email, 0.0005, QualityTier::Low)
                .unwrap()
        );
    }

    #[test]
    fn test_concurrent_selection_shares_catalog() {
        let selector = default_selector();
        let expected = selector
            .select_model("concurrent prompt", TaskType::General, 0.01, QualityTier::Medium)
            .unwrap();

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    s.spawn(|| {
                        selector
                            .select_model("concurrent prompt", TaskType::General, 0.01, QualityTier::Medium)
                            .unwrap()
                    })
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
