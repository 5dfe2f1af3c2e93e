use serde::Serialize;

/// Log an outgoing request body at debug level
pub(crate) fn log_request<T: Serialize>(request: &T) {
    if log::log_enabled!(log::Level::Debug) {
        match serde_json::to_string_pretty(request) {
            Ok(json) => log::debug!("LLM request body:\n{json}"),
            Err(e) => log::debug!("LLM request body could not be serialized: {e}"),
        }
    }
}

/// Log a raw response body at debug level
pub(crate) fn log_response(body: &str) {
    log::debug!("LLM response body ({} bytes):\n{body}", body.len());
}
