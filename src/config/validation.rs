use super::schema::Config;

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref llm) = config.llm {
        if let Some(ref model) = llm.model {
            if model.trim().is_empty() {
                errors.push("llm.model: must not be empty".to_string());
            }
        }
        if let Some(ref endpoint) = llm.endpoint {
            if !is_http_url(endpoint) {
                errors.push(format!(
                    "llm.endpoint: '{}' must start with http:// or https://",
                    endpoint
                ));
            }
        }
        if llm.max_tokens == Some(0) {
            errors.push("llm.max_tokens: must be greater than zero".to_string());
        }
        if let Some(ref timeout) = llm.timeout {
            if let Err(e) = humantime::parse_duration(timeout) {
                errors.push(format!("llm.timeout: invalid '{}' - {}", timeout, e));
            }
        }
    }

    if let Some(ref grammar) = config.grammar {
        if let Some(ref url) = grammar.server_url {
            if !is_http_url(url) {
                errors.push(format!(
                    "grammar.server_url: '{}' must start with http:// or https://",
                    url
                ));
            }
        }
        if let Some(ref language) = grammar.language {
            if language.trim().is_empty() {
                errors.push("grammar.language: must not be empty".to_string());
            }
        }
        if let Some(ref timeout) = grammar.timeout {
            if let Err(e) = humantime::parse_duration(timeout) {
                errors.push(format!("grammar.timeout: invalid '{}' - {}", timeout, e));
            }
        }
    }

    if let Some(ref vocabulary) = config.vocabulary {
        if let Some(threshold) = vocabulary.mtld_threshold {
            if !(threshold > 0.0 && threshold < 1.0) {
                errors.push(format!(
                    "vocabulary.mtld_threshold: {} must be between 0 and 1 (exclusive)",
                    threshold
                ));
            }
        }
    }

    if let Some(ref logging) = config.logging {
        if let Some(ref file) = logging.file {
            if file.trim().is_empty() {
                errors.push("logging.file: must not be empty".to_string());
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
