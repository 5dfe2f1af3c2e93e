//! Configuration builder for merging CLI args with config files
//!
//! CLI values are set first and win; [`ConfigBuilder::merge_file_config`] only
//! fills what is still unset; [`ConfigBuilder::build`] applies defaults and
//! validation.

use crate::{
    catalog::{load_catalog_file, ModelCatalog},
    config::ConfigFileRequest,
    constants::{ledger_defaults, llm_defaults},
    error::RouterError,
    request::{QualityTier, RoutingRequest, TaskType},
    RouteConfig,
};
use std::{path::PathBuf, sync::Arc};

const MIN_TIMEOUT: u64 = 1;

/// Builder for constructing [`RouteConfig`] from CLI args and config files
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    // Required (CLI or config file)
    pub prompt: Option<String>,
    pub budget: Option<f64>,

    // Optional (CLI > config > default)
    pub api_url: Option<String>,
    pub task_type: Option<TaskType>,
    pub quality: Option<QualityTier>,
    pub api_key: Option<String>,
    pub api_key_env: Option<String>,
    pub timeout_secs: Option<u64>,
    pub catalog: Option<Arc<ModelCatalog>>,
    pub catalog_file: Option<PathBuf>,
    pub ledger_path: Option<PathBuf>,
    pub dry_run: Option<bool>,

    // Source tracking for metadata
    pub prompt_file: Option<PathBuf>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge values from a config file (lower priority than CLI args)
    pub fn merge_file_config(mut self, file_config: &ConfigFileRequest) -> Self {
        if self.api_url.is_none() {
            self.api_url = file_config.api_url.clone();
        }
        if self.prompt.is_none() {
            self.prompt = file_config.prompt.clone();
        }
        if self.prompt_file.is_none() {
            self.prompt_file = file_config.prompt_file.as_ref().map(PathBuf::from);
        }
        if self.task_type.is_none() {
            self.task_type = file_config.task_type;
        }
        if self.budget.is_none() {
            self.budget = file_config.budget;
        }
        if self.quality.is_none() {
            self.quality = file_config.quality;
        }
        if self.api_key.is_none() {
            self.api_key = file_config.api_key.clone();
        }
        if self.timeout_secs.is_none() {
            self.timeout_secs = file_config.timeout_secs;
        }
        if self.catalog_file.is_none() {
            self.catalog_file = file_config.catalog_file.as_ref().map(PathBuf::from);
        }
        if self.ledger_path.is_none() {
            self.ledger_path = file_config.ledger_path.as_ref().map(PathBuf::from);
        }
        if self.dry_run.is_none() {
            self.dry_run = file_config.dry_run;
        }
        self
    }

    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Set prompt file path (for metadata tracking)
    pub fn prompt_file(mut self, file_path: PathBuf) -> Self {
        self.prompt_file = Some(file_path);
        self
    }

    pub fn task_type(mut self, task_type: TaskType) -> Self {
        self.task_type = Some(task_type);
        self
    }

    pub fn budget(mut self, budget: f64) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn quality(mut self, quality: QualityTier) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Environment variable consulted when no API key was given (default `GROQ_API_KEY`)
    pub fn api_key_env(mut self, name: impl Into<String>) -> Self {
        self.api_key_env = Some(name.into());
        self
    }

    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Use an already-built catalog (takes precedence over `catalog_file`)
    pub fn catalog(mut self, catalog: Arc<ModelCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn catalog_file(mut self, path: PathBuf) -> Self {
        self.catalog_file = Some(path);
        self
    }

    pub fn ledger_path(mut self, path: PathBuf) -> Self {
        self.ledger_path = Some(path);
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = Some(dry_run);
        self
    }

    /// Build the final [`RouteConfig`], applying defaults and validation
    ///
    /// # Errors
    ///
    /// - `InvalidArguments` if the prompt or budget is missing, or the timeout is zero
    /// - `InvalidRequest` if the prompt or budget fail boundary validation
    /// - `FileNotFound` / `InvalidCatalog` if the catalog file cannot be loaded
    /// - `MissingApiKey` if no key is available and this is not a dry run
    pub fn build(self) -> Result<RouteConfig, RouterError> {
        let prompt = self.prompt.ok_or_else(|| {
            RouterError::InvalidArguments(
                "Prompt must be provided via --prompt-file/--prompt-text or in config file (--config-file)"
                    .to_string(),
            )
        })?;

        let budget = self.budget.ok_or_else(|| {
            RouterError::InvalidArguments(
                "Budget must be provided via --budget or in config file (--config-file)"
                    .to_string(),
            )
        })?;

        let request = RoutingRequest::new(
            prompt,
            self.task_type.unwrap_or(TaskType::General),
            budget,
            self.quality.unwrap_or_default(),
        )?;

        let timeout_secs = self
            .timeout_secs
            .unwrap_or(llm_defaults::DEFAULT_TIMEOUT_SECS);
        if timeout_secs < MIN_TIMEOUT {
            return Err(RouterError::InvalidArguments(format!(
                "timeout_secs must be >= {MIN_TIMEOUT}, got {timeout_secs}"
            )));
        }

        let catalog = match (self.catalog, &self.catalog_file) {
            (Some(catalog), _) => catalog,
            (None, Some(path)) => Arc::new(load_catalog_file(path)?),
            (None, None) => Arc::new(ModelCatalog::default_catalog()),
        };

        let dry_run = self.dry_run.unwrap_or(false);

        let api_key = match self.api_key {
            Some(key) => Some(key),
            None => {
                let env_name = self
                    .api_key_env
                    .unwrap_or_else(|| llm_defaults::DEFAULT_API_KEY_ENV.to_string());
                let key = std::env::var(&env_name).ok().filter(|k| !k.is_empty());
                if key.is_some() {
                    log::debug!("API key loaded from environment variable: {env_name}");
                }
                key
            }
        };

        if api_key.is_none() && !dry_run {
            return Err(RouterError::MissingApiKey(format!(
                "Provide --api-key, --api-key-name, or set {}",
                llm_defaults::DEFAULT_API_KEY_ENV
            )));
        }

        Ok(RouteConfig {
            api_url: self
                .api_url
                .unwrap_or_else(|| llm_defaults::DEFAULT_API_URL.to_string()),
            request,
            api_key,
            timeout_secs,
            catalog,
            catalog_file: self.catalog_file,
            ledger_path: self
                .ledger_path
                .unwrap_or_else(|| PathBuf::from(ledger_defaults::DEFAULT_LEDGER_PATH)),
            dry_run,
            prompt_file: self.prompt_file,
        })
    }
}
