use std::path::PathBuf;

const MIN_TIMEOUT: u64 = 1;

/// Validate a budget in USD (finite and strictly positive)
pub fn validate_budget(s: &str) -> Result<f64, String> {
    let budget: f64 = s
        .trim()
        .trim_start_matches('$')
        .parse()
        .map_err(|_| format!("'{s}' is not a valid amount"))?;
    (budget.is_finite() && budget > 0.0)
        .then_some(budget)
        .ok_or_else(|| format!("Budget must be a positive amount in USD, got {s}"))
}

/// Validate positive u64 value (must be >= MIN_TIMEOUT)
pub fn validate_positive_u64(s: &str) -> Result<u64, String> {
    let val: u64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    (val >= MIN_TIMEOUT)
        .then_some(val)
        .ok_or_else(|| format!("Value must be >= {MIN_TIMEOUT}"))
}

/// Validate file exists at the given path
pub fn validate_file_exists(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.exists() {
        Ok(path)
    } else {
        Err(format!("File does not exist: '{s}'"))
    }
}

/// Validate a catalog or config file: must exist and be .json or .toml
pub fn validate_structured_file(s: &str) -> Result<PathBuf, String> {
    let path = validate_file_exists(s)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") | Some("toml") => Ok(path),
        _ => Err(format!("File must have .json or .toml extension: '{s}'")),
    }
}
