use anyhow::{Context, Result};

/// Prompts the user for a Gemini API key without echoing it.
pub fn prompt_for_api_key() -> Result<String> {
    eprintln!("A Google Gemini API key is required for LLM refinement.");
    eprintln!("Create one at: https://aistudio.google.com/app/apikey");
    eprintln!("Set {} to skip this prompt.", super::ENV_KEY_VAR);
    eprintln!();

    let key = rpassword::prompt_password("Enter API key: ")
        .context("Failed to read API key from terminal")?;

    let key = key.trim();

    if key.is_empty() {
        anyhow::bail!("API key cannot be empty");
    }

    Ok(key.to_string())
}
