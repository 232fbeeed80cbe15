use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use super::schema::{
    Config, FillerConfig, GrammarConfig, LlmConfig, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
};
use super::validation::validate_config;
use super::get_config_path;
use crate::detect::FillerMatching;

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Serialize `config` and write it atomically, creating parent directories.
pub(crate) fn write_config(path: &std::path::Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit().context("Failed to save config")?;
    Ok(())
}

/// Run the interactive init wizard to create a config file.
///
/// With `use_defaults`, no questions are asked and the built-in defaults are
/// written (an existing file is still never overwritten without asking).
pub fn run_init_wizard(default_path: Option<PathBuf>, use_defaults: bool) -> Result<()> {
    println!();
    println!("SpeakCheck Configuration Wizard");
    println!("===============================");
    println!();

    let config = if use_defaults {
        Config {
            llm: Some(LlmConfig {
                model: Some(DEFAULT_MODEL.to_string()),
                max_tokens: Some(DEFAULT_MAX_TOKENS),
                required: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        }
    } else {
        // 1. LLM refiner
        println!("An LLM can re-grade grammar and engagement when an API key is available.");
        let model = prompt_with_default("Gemini model", DEFAULT_MODEL)?;
        let max_tokens: u32 = loop {
            let input = prompt_with_default("Max response tokens", &DEFAULT_MAX_TOKENS.to_string())?;
            match input.parse::<u32>() {
                Ok(v) if v > 0 => break v,
                _ => println!("  Invalid: must be a positive whole number. Try again."),
            }
        };
        let required = prompt_yes_no("Refuse to score without an API key?", false)?;

        // 2. Grammar server
        println!();
        println!("Grammar checks need a LanguageTool server (e.g. http://localhost:8081).");
        println!("Leave blank to score grammar with the fallback value.");
        let server_url = loop {
            let input = prompt("Grammar server URL: ")?;
            if input.is_empty() {
                break None;
            }
            if input.starts_with("http://") || input.starts_with("https://") {
                break Some(input);
            }
            println!("  Invalid: must start with http:// or https://. Try again.");
        };

        // 3. Filler matching
        println!();
        println!("Filler matching: 'token' compares single words only (\"you know\" never counts),");
        println!("'phrase' also counts multi-word fillers.");
        let matching = loop {
            let input = prompt_with_default("Filler matching (token/phrase)", "token")?;
            match input.as_str() {
                "token" => break FillerMatching::Token,
                "phrase" => break FillerMatching::Phrase,
                _ => println!("  Invalid: enter 'token' or 'phrase'. Try again."),
            }
        };

        Config {
            llm: Some(LlmConfig {
                model: Some(model),
                max_tokens: Some(max_tokens),
                required: Some(required),
                ..Default::default()
            }),
            grammar: server_url.map(|url| GrammarConfig {
                server_url: Some(url),
                ..Default::default()
            }),
            fillers: Some(FillerConfig {
                matching: Some(matching),
            }),
            ..Default::default()
        }
    };

    if let Err(errors) = validate_config(&config) {
        anyhow::bail!("Generated config is invalid: {}", errors.join("; "));
    }

    // 4. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    let config_path = if use_defaults {
        default_config_path
    } else {
        println!();
        PathBuf::from(prompt_with_default(
            "Where should the config be saved?",
            &default_config_path.display().to_string(),
        )?)
    };

    // Check if file already exists
    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    write_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `speakcheck analyze <FILE> --duration 60` to score a transcript.");

    Ok(())
}
