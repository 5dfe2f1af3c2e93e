//! Model catalog: pricing, quality and capability data for every routable model
//!
//! A catalog is built once (from the built-in table or a `.toml`/`.json` file),
//! validated, and then only read. Share it between requests with `Arc`.

use crate::{error::RouterError, request::TaskType, token_estimator::OutputProfile};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::Path,
};

/// Static description of one selectable model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Display label
    pub name: String,

    /// USD per input token
    pub input_price_per_token: f64,

    /// USD per output token
    pub output_price_per_token: f64,

    /// Higher is better; no fixed ceiling
    pub quality_score: f64,

    /// Task types this model is specialized for
    #[serde(default)]
    pub strengths: BTreeSet<TaskType>,

    /// Hard ceiling on generation length
    pub max_output_tokens: u32,
}

impl ModelDescriptor {
    pub fn is_strong_at(&self, task_type: TaskType) -> bool {
        self.strengths.contains(&task_type)
    }

    fn validate(&self, key: &str) -> Result<(), RouterError> {
        for (field, price) in [
            ("input_price_per_token", self.input_price_per_token),
            ("output_price_per_token", self.output_price_per_token),
        ] {
            if !price.is_finite() || price < 0.0 {
                return Err(RouterError::InvalidCatalog(format!(
                    "model '{key}': {field} must be a non-negative number, got {price}"
                )));
            }
        }
        if !self.quality_score.is_finite() {
            return Err(RouterError::InvalidCatalog(format!(
                "model '{key}': quality_score must be finite"
            )));
        }
        if self.max_output_tokens == 0 {
            return Err(RouterError::InvalidCatalog(format!(
                "model '{key}': max_output_tokens must be > 0"
            )));
        }
        Ok(())
    }
}

/// On-disk catalog format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub models: BTreeMap<String, ModelDescriptor>,

    /// Per-task output profiles keyed by task name; omitted means the built-in table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_profiles: Option<BTreeMap<String, OutputProfile>>,
}

/// Immutable mapping from model key to [`ModelDescriptor`]
///
/// Backed by a `BTreeMap` so iteration order is the key order, never the order
/// models were declared in.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelCatalog {
    models: BTreeMap<String, ModelDescriptor>,
    output_profiles: BTreeMap<TaskType, OutputProfile>,
}

impl ModelCatalog {
    /// Build a catalog with the built-in output profiles
    pub fn new(models: BTreeMap<String, ModelDescriptor>) -> Result<Self, RouterError> {
        Self::with_output_profiles(models, OutputProfile::default_table())
    }

    /// Build a catalog with a custom output profile table
    ///
    /// Tasks missing from `output_profiles` use [`OutputProfile::FALLBACK`].
    pub fn with_output_profiles(
        models: BTreeMap<String, ModelDescriptor>,
        output_profiles: BTreeMap<TaskType, OutputProfile>,
    ) -> Result<Self, RouterError> {
        if models.is_empty() {
            return Err(RouterError::InvalidCatalog(
                "catalog must contain at least one model".to_string(),
            ));
        }
        for (key, model) in &models {
            model.validate(key)?;
        }
        for (task, profile) in &output_profiles {
            if !profile.multiplier.is_finite() || profile.multiplier < 0.0 {
                return Err(RouterError::InvalidCatalog(format!(
                    "output profile '{task}': multiplier must be a non-negative number"
                )));
            }
        }
        Ok(Self {
            models,
            output_profiles,
        })
    }

    /// The four Groq-hosted models the router ships with
    pub fn default_catalog() -> Self {
        let model = |name: &str,
                     input: f64,
                     output: f64,
                     quality: f64,
                     strengths: &[TaskType],
                     max_output_tokens: u32| ModelDescriptor {
            name: name.to_string(),
            input_price_per_token: input,
            output_price_per_token: output,
            quality_score: quality,
            strengths: strengths.iter().copied().collect(),
            max_output_tokens,
        };

        let models = BTreeMap::from([
            (
                "llama-3.3-70b-versatile".to_string(),
                model(
                    "LLaMA 3.3 70B Versatile",
                    0.000_000_59,
                    0.000_000_79,
                    85.0,
                    &[TaskType::General, TaskType::Code, TaskType::Summarize],
                    32768,
                ),
            ),
            (
                "llama-3.1-8b-instant".to_string(),
                model(
                    "LLaMA 3.1 8B Instant",
                    0.000_000_05,
                    0.000_000_08,
                    60.0,
                    &[TaskType::General],
                    8192,
                ),
            ),
            (
                "gemma2-9b-it".to_string(),
                model(
                    "Gemma 2 9B IT",
                    0.000_000_20,
                    0.000_000_20,
                    65.0,
                    &[TaskType::General, TaskType::Email],
                    8192,
                ),
            ),
            (
                "mixtral-8x7b-32768".to_string(),
                model(
                    "Mixtral 8x7B 32768",
                    0.000_000_24,
                    0.000_000_24,
                    75.0,
                    &[TaskType::Code, TaskType::Summarize, TaskType::Email],
                    32768,
                ),
            ),
        ]);

        Self {
            models,
            output_profiles: OutputProfile::default_table(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ModelDescriptor> {
        self.models.get(key)
    }

    /// Iterate models in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModelDescriptor)> {
        self.models.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Output profile for a task, falling back to [`OutputProfile::FALLBACK`]
    pub fn output_profile(&self, task_type: TaskType) -> OutputProfile {
        self.output_profiles
            .get(&task_type)
            .copied()
            .unwrap_or(OutputProfile::FALLBACK)
    }
}

impl TryFrom<CatalogFile> for ModelCatalog {
    type Error = RouterError;

    fn try_from(file: CatalogFile) -> Result<Self, Self::Error> {
        let Some(raw_profiles) = file.output_profiles else {
            return Self::new(file.models);
        };

        let mut profiles = BTreeMap::new();
        for (task, profile) in raw_profiles {
            let task_type: TaskType = task.parse().map_err(|_| {
                RouterError::InvalidCatalog(format!("unknown task '{task}' in output_profiles"))
            })?;
            profiles.insert(task_type, profile);
        }
        Self::with_output_profiles(file.models, profiles)
    }
}

/// Load a catalog from file (auto-detects JSON vs TOML from extension)
pub fn load_catalog_file<P: AsRef<Path>>(path: P) -> Result<ModelCatalog, RouterError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        RouterError::FileNotFound(format!(
            "Failed to read catalog file '{}': {e}",
            path.display()
        ))
    })?;

    let file: CatalogFile = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&contents)
            .map_err(|e| RouterError::InvalidCatalog(format!("Failed to parse TOML catalog: {e}")))?,
        Some("json") => serde_json::from_str(&contents)
            .map_err(|e| RouterError::InvalidCatalog(format!("Failed to parse JSON catalog: {e}")))?,
        _ => {
            return Err(RouterError::InvalidArguments(
                "Catalog file must have .json or .toml extension".to_string(),
            ))
        }
    };

    let catalog = ModelCatalog::try_from(file)?;
    log::debug!(
        "Loaded {} models from catalog '{}'",
        catalog.len(),
        path.display()
    );
    Ok(catalog)
}
