use budget_llm_router::RouterError;
use std::path::PathBuf;

/// Load the prompt from a file or an inline string
///
/// Exactly one of `file` or `text` must be provided.
///
/// # Example
///
/// ```ignore
/// let prompt = load_prompt(Some(PathBuf::from("prompt.txt")), None)?;
/// let prompt = load_prompt(None, Some("Summarize this".to_string()))?;
/// ```
pub fn load_prompt(file: Option<PathBuf>, text: Option<String>) -> Result<String, RouterError> {
    match (file, text) {
        (Some(path), None) => std::fs::read_to_string(&path).map_err(|e| {
            RouterError::FileNotFound(format!("Failed to read file '{}': {e}", path.display()))
        }),
        (None, Some(content)) => Ok(content),
        (Some(_), Some(_)) => Err(RouterError::InvalidArguments(
            "Cannot provide both --prompt-file and --prompt-text".to_string(),
        )),
        (None, None) => Err(RouterError::InvalidArguments(
            "Must provide either --prompt-file or --prompt-text".to_string(),
        )),
    }
}
