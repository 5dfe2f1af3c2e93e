// Integration tests for figment-based config merging
//
// Priority: CLI args > Config file
// Supports: JSON (.json) and TOML (.toml) formats

use std::{fs, process::Command};
use tempfile::TempDir;

fn prose_400() -> String {
    format!("{}abcd", "abcde ".repeat(66))
}

// Write the config, run the CLI against it, return parsed stdout and exit code
fn run_cli_with_config(
    config_content: &str,
    extension: &str,
    extra_args: &[&str],
) -> (serde_json::Value, Option<i32>) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(format!("router.{extension}"));
    fs::write(&path, config_content).unwrap();

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("budget-llm-router"));
    cmd.current_dir(dir.path())
        .env_remove("GROQ_API_KEY")
        .arg("--config-file")
        .arg(&path)
        .arg("--quiet");
    for arg in extra_args {
        cmd.arg(arg);
    }

    let output = cmd.output().unwrap();
    let json = serde_json::from_slice(&output.stdout).unwrap_or(serde_json::Value::Null);
    (json, output.status.code())
}

fn email_json_config() -> String {
    serde_json::json!({
        "prompt": prose_400(),
        "task_type": "email",
        "quality": "high",
        "budget": 0.0005,
        "dry_run": true
    })
    .to_string()
}

#[test]
fn test_json_config_alone() {
    let (json, code) = run_cli_with_config(&email_json_config(), "json", &[]);
    assert_eq!(code, Some(0));
    assert_eq!(json["route"]["model"], "mixtral-8x7b-32768");
    assert_eq!(json["metadata"]["budget"], 0.0005);
}

#[test]
fn test_cli_budget_overrides_json_config() {
    // 0.00005 only fits the 8B model, which is below the high floor
    let (json, code) = run_cli_with_config(&email_json_config(), "json", &["--budget", "0.00005"]);
    assert_eq!(code, Some(0));
    assert_eq!(json["route"]["model"], "llama-3.1-8b-instant");
    assert_eq!(json["route"]["fallback"], true);
    assert_eq!(json["metadata"]["budget"], 0.00005);
}

#[test]
fn test_cli_task_type_overrides_toml_config() {
    let config = format!(
        r#"
prompt = "{}"
task_type = "email"
quality = "high"
budget = 0.0005
dry_run = true
"#,
        prose_400()
    );

    let (json, code) = run_cli_with_config(&config, "toml", &["--task-type", "summarize"]);
    assert_eq!(code, Some(0));
    assert_eq!(json["metadata"]["task_type"], "summarize");
    // summarize: llama-70b 85+15 beats mixtral 75+15
    assert_eq!(json["route"]["model"], "llama-3.3-70b-versatile");
}

#[test]
fn test_cli_prompt_text_overrides_config_prompt() {
    let (json, code) = run_cli_with_config(
        &email_json_config(),
        "json",
        &["--prompt-text", "Short note"],
    );
    assert_eq!(code, Some(0));
    assert_eq!(json["route"]["estimated_input_tokens"], 2);
}

#[test]
fn test_config_prompt_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    let prompt_path = dir.path().join("prompt.txt");
    fs::write(&prompt_path, prose_400()).unwrap();

    let config = serde_json::json!({
        "prompt_file": prompt_path.display().to_string(),
        "budget": 0.01,
        "dry_run": true
    })
    .to_string();

    let (json, code) = run_cli_with_config(&config, "json", &[]);
    assert_eq!(code, Some(0));
    assert_eq!(json["route"]["estimated_input_tokens"], 100);
}

#[test]
fn test_config_missing_budget_reports_error() {
    let config = r#"{"prompt": "hello", "dry_run": true}"#;
    let (json, code) = run_cli_with_config(config, "json", &[]);
    assert_eq!(code, Some(1));
    assert_eq!(json["error"]["code"], "INVALID_ARGUMENTS");
}

#[test]
fn test_config_invalid_quality_value() {
    let config = r#"{"prompt": "hello", "budget": 0.01, "quality": "premium", "dry_run": true}"#;
    let (json, code) = run_cli_with_config(config, "json", &[]);
    assert_eq!(code, Some(1));
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Failed to merge config"));
}
