//! Append-only usage ledger (one JSON object per line)
//!
//! Example `logs/requests.jsonl`:
//!
//! ```text
//! {"timestamp":"2026-02-12T14:30:00+00:00","model":"llama-3.3-70b-versatile","actual_cost":0.001,...}
//! {"timestamp":"2026-02-12T14:31:00+00:00","model":"gemma2-9b-it","actual_cost":0.0002,...}
//! ```

use crate::{constants::pricing, cost::round_usd, error::RouterError, request::TaskType};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs::{self, OpenOptions},
    io::{BufRead, BufReader, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};

/// One completed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub timestamp: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_type: Option<TaskType>,
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
    #[serde(default)]
    pub estimated_cost: f64,
    #[serde(default)]
    pub actual_cost: f64,
    #[serde(default)]
    pub routing_reason: String,
}

impl LedgerEntry {
    /// Entry stamped with the current UTC time
    pub fn now(
        model: impl Into<String>,
        task_type: TaskType,
        input_tokens: u32,
        output_tokens: u32,
        estimated_cost: f64,
        actual_cost: f64,
        routing_reason: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            model: model.into(),
            task_type: Some(task_type),
            input_tokens,
            output_tokens,
            estimated_cost,
            actual_cost,
            routing_reason: routing_reason.into(),
        }
    }
}

/// Aggregate view over every ledger entry
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UsageStats {
    pub total_requests: u64,
    pub total_cost: f64,
    pub average_cost: f64,
    pub model_usage: BTreeMap<String, u64>,
}

impl UsageStats {
    /// Fold entries into totals; costs rounded to 6 decimal places
    pub fn from_entries(entries: &[LedgerEntry]) -> Self {
        if entries.is_empty() {
            return Self::default();
        }

        let mut model_usage = BTreeMap::new();
        let mut total_cost = 0.0;
        for entry in entries {
            total_cost += entry.actual_cost;
            if !entry.model.is_empty() {
                *model_usage.entry(entry.model.clone()).or_insert(0) += 1;
            }
        }

        let total_requests = entries.len() as u64;
        Self {
            total_requests,
            total_cost: round_usd(total_cost, pricing::STATS_DECIMALS),
            average_cost: round_usd(total_cost / total_requests as f64, pricing::STATS_DECIMALS),
            model_usage,
        }
    }
}

/// JSON-lines ledger file
///
/// Appends from one `UsageLedger` are serialized through an internal lock, and
/// each entry goes out as a single complete line on a file opened in append
/// mode, so concurrent writers never interleave partial records.
#[derive(Debug)]
pub struct UsageLedger {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl UsageLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry, creating the parent directory if needed
    pub fn append(&self, entry: &LedgerEntry) -> Result<(), RouterError> {
        let mut line = serde_json::to_string(entry).map_err(|e| {
            RouterError::LedgerFailed(format!("Failed to serialize ledger entry: {e}"))
        })?;
        line.push('\n');

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| RouterError::LedgerFailed("Ledger lock poisoned".to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                RouterError::LedgerFailed(format!(
                    "Failed to create ledger directory '{}': {e}",
                    parent.display()
                ))
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                RouterError::LedgerFailed(format!(
                    "Failed to open ledger '{}': {e}",
                    self.path.display()
                ))
            })?;

        file.write_all(line.as_bytes()).map_err(|e| {
            RouterError::LedgerFailed(format!(
                "Failed to write ledger '{}': {e}",
                self.path.display()
            ))
        })?;

        log::info!(
            "Recorded {} request (${:.8}) in {}",
            entry.model,
            entry.actual_cost,
            self.path.display()
        );
        Ok(())
    }

    /// Read every entry; a missing file is an empty ledger
    ///
    /// Blank lines are ignored. Lines that fail to parse are skipped with a
    /// warning so a single truncated record cannot hide the rest of the history.
    pub fn read_all(&self) -> Result<Vec<LedgerEntry>, RouterError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(&self.path).map_err(|e| {
            RouterError::LedgerFailed(format!(
                "Failed to open ledger '{}': {e}",
                self.path.display()
            ))
        })?;

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                RouterError::LedgerFailed(format!("Failed to read ledger line {}: {e}", index + 1))
            })?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<LedgerEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => log::warn!(
                    "Skipping malformed ledger line {} in {}: {e}",
                    index + 1,
                    self.path.display()
                ),
            }
        }
        Ok(entries)
    }

    pub fn stats(&self) -> Result<UsageStats, RouterError> {
        Ok(UsageStats::from_entries(&self.read_all()?))
    }
}
