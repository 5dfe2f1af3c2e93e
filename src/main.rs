mod cli;

use budget_llm_router::{
    config_builder::ConfigBuilder, constants::ledger_defaults, route, usage_stats, CliOutput,
    Metadata, QualityTier, RouterError, TaskType,
};
use clap::{CommandFactory, Parser};
use cli::{
    load_prompt, validate_budget, validate_file_exists, validate_positive_u64,
    validate_structured_file, write_output,
};
use figment::{
    providers::{Format, Json, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, process};

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
#[command(name = "budget-llm-router")]
#[command(about = "Routes each prompt to the best LLM that fits a per-request budget", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[serde(default)]
struct Args {
    /// Config file (JSON or TOML) with default routing parameters
    /// Note: any CLI argument will override the corresponding config file value
    #[arg(long, short = 'c', value_parser = validate_structured_file)]
    #[serde(skip)]
    config_file: Option<PathBuf>,

    /// OpenAI-compatible chat completions endpoint
    #[arg(long, short = 'a')]
    #[serde(skip_serializing_if = "Option::is_none")]
    api_url: Option<String>,

    /// Prompt from file
    #[arg(long, short = 'u', conflicts_with = "prompt_text", value_parser = validate_file_exists)]
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt_file: Option<PathBuf>,

    /// Prompt as text
    #[arg(long, conflicts_with = "prompt_file")]
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt_text: Option<String>,

    /// Task category of the prompt (default: general)
    #[arg(long, short = 't', value_enum)]
    #[serde(skip_serializing_if = "Option::is_none")]
    task_type: Option<TaskTypeArg>,

    /// Maximum spend for this request in USD
    #[arg(long, short = 'b', value_parser = validate_budget)]
    #[serde(skip_serializing_if = "Option::is_none")]
    budget: Option<f64>,

    /// Minimum quality tier (default: medium)
    #[arg(long, value_enum)]
    #[serde(skip_serializing_if = "Option::is_none")]
    quality: Option<QualityArg>,

    /// Model catalog file (JSON or TOML); the built-in Groq catalog is used otherwise
    #[arg(long, value_parser = validate_structured_file)]
    #[serde(skip_serializing_if = "Option::is_none")]
    catalog_file: Option<PathBuf>,

    /// Usage ledger path (JSON lines)
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    ledger_path: Option<PathBuf>,

    /// API key for authentication (direct value)
    #[arg(long, conflicts_with = "api_key_name")]
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,

    /// Environment variable name containing the API key
    #[arg(long, conflicts_with = "api_key")]
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key_name: Option<String>,

    /// Request timeout in seconds (must be > 0)
    #[arg(long = "timeout", value_parser = validate_positive_u64)]
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,

    /// Select a model and estimate cost without calling it
    #[arg(long)]
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    dry_run: bool,

    /// Print usage statistics from the ledger and exit
    #[arg(long, conflicts_with_all = ["prompt_file", "prompt_text", "dry_run"])]
    #[serde(skip)]
    stats: bool,

    /// Enable verbose logging (DEBUG level)
    #[arg(long, short = 'v', conflicts_with = "quiet")]
    #[serde(skip)]
    verbose: bool,

    /// Suppress all logging output
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    #[serde(skip)]
    quiet: bool,

    /// Write output to file instead of stdout
    /// Uses atomic writes (temp file + rename) and creates parent directories
    #[arg(long, short = 'o')]
    #[serde(skip)]
    output: Option<PathBuf>,
}

/// Merge config file and CLI args using figment
/// Priority: CLI args > Config file
fn merge_config(args: &Args) -> Result<Args, RouterError> {
    let Some(config_path) = &args.config_file else {
        return Ok(args.clone());
    };

    let file_provider = match config_path.extension().and_then(|s| s.to_str()) {
        Some("json") => Figment::from(Json::file(config_path)),
        Some("toml") => Figment::from(Toml::file(config_path)),
        _ => {
            return Err(RouterError::InvalidArguments(
                "Config file must have .json or .toml extension".to_string(),
            ));
        }
    };

    let merged: Args = file_provider
        .merge(Serialized::defaults(args))
        .extract()
        .map_err(|e| RouterError::InvalidArguments(format!("Failed to merge config: {e}")))?;

    // Restore CLI-only fields (every #[serde(skip)] field on Args)
    Ok(Args {
        config_file: args.config_file.clone(),
        stats: args.stats,
        verbose: args.verbose,
        quiet: args.quiet,
        output: args.output.clone(),
        ..merged
    })
}

#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TaskTypeArg {
    General,
    Code,
    Email,
    Summarize,
}

impl From<TaskTypeArg> for TaskType {
    fn from(arg: TaskTypeArg) -> Self {
        match arg {
            TaskTypeArg::General => TaskType::General,
            TaskTypeArg::Code => TaskType::Code,
            TaskTypeArg::Email => TaskType::Email,
            TaskTypeArg::Summarize => TaskType::Summarize,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum QualityArg {
    Low,
    Medium,
    High,
}

impl From<QualityArg> for QualityTier {
    fn from(arg: QualityArg) -> Self {
        match arg {
            QualityArg::Low => QualityTier::Low,
            QualityArg::Medium => QualityTier::Medium,
            QualityArg::High => QualityTier::High,
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if it exists (silently ignore if not found)
    dotenvy::dotenv().ok();

    if std::env::args().len() == 1 {
        let _ = Args::command().print_help();
        println!();
        process::exit(0);
    }

    let args = Args::parse();

    // quiet: no logs, verbose: DEBUG+, default: INFO+
    let log_level = if args.quiet {
        log::LevelFilter::Off
    } else if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"),
                record.level(),
                record.args()
            )
        })
        .init();

    let output_path = args.output.clone();

    match run(args).await {
        Ok(output) => {
            if let Err(e) = write_output(&output, output_path.as_ref()) {
                eprintln!("Error writing output: {e}");
                process::exit(1);
            }
            process::exit(0);
        }
        Err(e) => {
            if e.is_upstream() {
                log::error!("Upstream call failed: {e}");
            }
            let output = CliOutput::error(e.code().to_string(), e.to_string(), Metadata::now());

            if let Err(io_err) = write_output(&output, output_path.as_ref()) {
                eprintln!("Error writing output: {io_err}");
                process::exit(1);
            }

            process::exit(e.exit_code());
        }
    }
}

async fn run(args: Args) -> Result<CliOutput, RouterError> {
    let merged_args = merge_config(&args)?;

    if merged_args.stats {
        let ledger_path = merged_args
            .ledger_path
            .unwrap_or_else(|| PathBuf::from(ledger_defaults::DEFAULT_LEDGER_PATH));
        return usage_stats(ledger_path);
    }

    // Figment covers the scalar flags; the file's inline `prompt` has no CLI
    // counterpart with the same name and comes in through merge_file_config.
    let file_config = match &merged_args.config_file {
        Some(config_path) => Some(budget_llm_router::load_config_file(config_path)?),
        None => None,
    };

    let mut builder = ConfigBuilder::new();

    if let Some(ref api_url) = merged_args.api_url {
        builder = builder.api_url(api_url.clone());
    }
    if let Some(task_type) = merged_args.task_type {
        builder = builder.task_type(task_type.into());
    }
    if let Some(budget) = merged_args.budget {
        builder = builder.budget(budget);
    }
    if let Some(quality) = merged_args.quality {
        builder = builder.quality(quality.into());
    }
    if let Some(ref path) = merged_args.catalog_file {
        builder = builder.catalog_file(path.clone());
    }
    if let Some(ref path) = merged_args.ledger_path {
        builder = builder.ledger_path(path.clone());
    }
    if let Some(timeout_secs) = merged_args.timeout_secs {
        builder = builder.timeout_secs(timeout_secs);
    }
    if merged_args.dry_run {
        builder = builder.dry_run(true);
    }

    if merged_args.prompt_file.is_some() && merged_args.prompt_text.is_some() {
        log::warn!(
            "Config file contains both prompt_file and prompt_text. \
             Using prompt_file (priority: file > text)."
        );
    }

    if let Some(file_path) = merged_args.prompt_file {
        let prompt = load_prompt(Some(file_path.clone()), None)?;
        builder = builder.prompt(prompt).prompt_file(file_path);
    } else if let Some(text) = merged_args.prompt_text {
        builder = builder.prompt(load_prompt(None, Some(text))?);
    }

    // API key: direct value > named env var > GROQ_API_KEY (applied in build)
    if let Some(ref key) = merged_args.api_key {
        builder = builder.api_key(key.clone());
    } else if let Some(ref env_var_name) = merged_args.api_key_name {
        match std::env::var(env_var_name) {
            Ok(key) => {
                log::debug!("API key loaded from environment variable: {env_var_name}");
                builder = builder.api_key(key);
            }
            Err(_) => {
                return Err(RouterError::InvalidArguments(format!(
                    "Environment variable '{env_var_name}' specified by api_key_name does not exist"
                )));
            }
        }
    }

    if let Some(file_cfg) = file_config.as_ref() {
        builder = builder.merge_file_config(file_cfg);
    }

    let config = builder.build()?;

    log::debug!("=== Routing Parameters ===");
    log::debug!("API URL: {}", config.api_url);
    log::debug!("Task type: {}", config.request.task_type());
    log::debug!("Quality: {}", config.request.quality());
    log::debug!("Budget: ${}", config.request.budget());
    log::debug!("Catalog: {} models", config.catalog.len());
    log::debug!("Ledger: {}", config.ledger_path.display());
    log::debug!("Timeout: {}s", config.timeout_secs);
    log::debug!("Dry run: {}", config.dry_run);
    log::debug!(
        "API key: {}",
        if config.api_key.is_some() {
            "[REDACTED]"
        } else {
            "[NOT SET]"
        }
    );
    log::debug!(
        "Prompt length: {} chars",
        config.request.prompt().chars().count()
    );
    log::debug!("==========================");

    route(config).await
}
