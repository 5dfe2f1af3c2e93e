use crate::{
    error::RouterError,
    request::{QualityTier, TaskType},
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Configuration file request format (supports both JSON and TOML)
///
/// Every field is optional here; whatever the CLI does not supply must be
/// present in the file, and [`crate::config_builder::ConfigBuilder::build`]
/// reports anything still missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFileRequest {
    /// OpenAI-compatible chat completions endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Prompt inline text (conflicts with prompt_file)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    /// Prompt from file path (conflicts with prompt)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_file: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_type: Option<TaskType>,

    /// Maximum spend for the request in USD
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityTier>,

    /// API key for authentication (conflicts with api_key_name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable name containing the API key (conflicts with api_key)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Model catalog file (.json or .toml); omitted means the built-in catalog
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_file: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
}

impl ConfigFileRequest {
    /// Validate and resolve file paths to content
    ///
    /// If `prompt_file` is set its content is loaded into `prompt`; the path is
    /// kept for metadata.
    pub fn resolve_file_paths(&mut self) -> Result<(), RouterError> {
        if self.api_key.is_some() && self.api_key_name.is_some() {
            return Err(RouterError::InvalidArguments(
                "Config file cannot specify both 'api_key' and 'api_key_name'".to_string(),
            ));
        }

        match (&self.prompt, &self.prompt_file) {
            (Some(_), Some(_)) => {
                return Err(RouterError::InvalidArguments(
                    "Config file cannot specify both 'prompt' and 'prompt_file'".to_string(),
                ));
            }
            (None, Some(file_path)) => {
                let content = fs::read_to_string(file_path).map_err(|e| {
                    RouterError::FileNotFound(format!(
                        "Failed to read prompt file '{file_path}': {e}"
                    ))
                })?;
                self.prompt = Some(content);
            }
            _ => {}
        }

        Ok(())
    }
}

/// Load config from file (auto-detects JSON vs TOML from extension)
pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<ConfigFileRequest, RouterError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        RouterError::FileNotFound(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let mut config: ConfigFileRequest = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&contents).map_err(|e| {
            RouterError::InvalidArguments(format!("Failed to parse TOML config: {e}"))
        })?,
        Some("json") => serde_json::from_str(&contents).map_err(|e| {
            RouterError::InvalidArguments(format!("Failed to parse JSON config: {e}"))
        })?,
        _ => {
            return Err(RouterError::InvalidArguments(
                "Config file must have .json or .toml extension".to_string(),
            ));
        }
    };

    config.resolve_file_paths()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_load_json_config() {
        let json = r#"{
            "api_url": "http://localhost:8080/v1/chat/completions",
            "prompt": "Write a short email to my manager",
            "task_type": "email",
            "budget": 0.0005,
            "quality": "high"
        }"#;

        let file = NamedTempFile::new().unwrap();
        let path = file.path().with_extension("json");
        std::fs::write(&path, json).unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(
            config.api_url.as_deref(),
            Some("http://localhost:8080/v1/chat/completions")
        );
        assert_eq!(config.task_type, Some(TaskType::Email));
        assert_eq!(config.budget, Some(0.0005));
        assert_eq!(config.quality, Some(QualityTier::High));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_toml_config() {
        let toml = r#"
            prompt = "fn main() { println!(\"hi\"); }"
            task_type = "code"
            budget = 0.01
            timeout_secs = 30
            dry_run = true
        "#;

        let file = NamedTempFile::new().unwrap();
        let path = file.path().with_extension("toml");
        std::fs::write(&path, toml).unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.task_type, Some(TaskType::Code));
        assert_eq!(config.timeout_secs, Some(30));
        assert_eq!(config.dry_run, Some(true));
        assert!(config.api_url.is_none());
        assert!(config.quality.is_none());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_invalid_extension() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().with_extension("txt");
        std::fs::write(&path, "invalid").unwrap();

        let result = load_config_file(&path);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("must have .json or .toml extension"));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_unknown_task_type_rejected() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().with_extension("json");
        std::fs::write(&path, r#"{"task_type": "poetry"}"#).unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert_eq!(err.code(), "INVALID_ARGUMENTS");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_prompt_file_resolved() {
        let dir = TempDir::new().unwrap();
        let prompt_path = dir.path().join("prompt.txt");
        std::fs::write(&prompt_path, "Summarize this article").unwrap();

        let config_path = dir.path().join("config.json");
        std::fs::write(
            &config_path,
            format!(
                r#"{{"prompt_file": "{}", "task_type": "summarize"}}"#,
                prompt_path.display()
            ),
        )
        .unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.prompt.as_deref(), Some("Summarize this article"));
        assert!(config.prompt_file.is_some());
    }

    #[test]
    fn test_prompt_and_prompt_file_conflict() {
        let mut config = ConfigFileRequest {
            prompt: Some("inline".to_string()),
            prompt_file: Some("/tmp/prompt.txt".to_string()),
            ..Default::default()
        };
        let err = config.resolve_file_paths().unwrap_err();
        assert!(err.to_string().contains("both 'prompt' and 'prompt_file'"));
    }

    #[test]
    fn test_api_key_conflict() {
        let mut config = ConfigFileRequest {
            api_key: Some("gsk-test".to_string()),
            api_key_name: Some("GROQ_API_KEY".to_string()),
            ..Default::default()
        };
        assert!(config.resolve_file_paths().is_err());
    }
}
