pub mod prompt;

/// Environment variable holding the Gemini API key
pub const ENV_KEY_VAR: &str = "GOOGLE_API_KEY";

pub use prompt::prompt_for_api_key;

/// Trim a candidate key, treating blank values as absent.
fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn key_from_var(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(val) => non_empty(&val),
        Err(_) => None,
    }
}

/// Check for an API key in the GOOGLE_API_KEY environment variable.
/// Returns Some(key) if the env var is set and non-empty, None otherwise.
pub fn get_api_key_from_env() -> Option<String> {
    key_from_var(ENV_KEY_VAR)
}

/// Pick the API key for this run: an explicit `--api-key` wins over the
/// environment. `.env` files are loaded into the environment before this runs.
pub fn resolve_api_key(flag: Option<&str>) -> Option<String> {
    flag.and_then(non_empty).or_else(get_api_key_from_env)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_trims() {
        assert_eq!(non_empty("  abc \n"), Some("abc".to_string()));
        assert_eq!(non_empty("   "), None);
        assert_eq!(non_empty(""), None);
    }

    #[test]
    fn test_key_from_var() {
        let name = "SPEAKCHECK_TEST_KEY_FROM_VAR";
        std::env::set_var(name, " secret ");
        assert_eq!(key_from_var(name), Some("secret".to_string()));
        std::env::set_var(name, "");
        assert_eq!(key_from_var(name), None);
        std::env::remove_var(name);
        assert_eq!(key_from_var(name), None);
    }

    #[test]
    fn test_flag_wins() {
        assert_eq!(resolve_api_key(Some("from-flag")), Some("from-flag".to_string()));
    }

    #[test]
    fn test_blank_flag_falls_through() {
        assert_eq!(resolve_api_key(Some("  ")), get_api_key_from_env());
        assert_eq!(resolve_api_key(None), get_api_key_from_env());
    }
}
