use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use speakcheck::output::OutputFormat;
use speakcheck::AnalyzeError;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_SETUP: i32 = 2;
const EXIT_CONFIG: i32 = 4;

/// Overrides the log filter entirely (e.g. "speakcheck=trace")
const LOG_ENV_VAR: &str = "SPEAKCHECK_LOG";
/// Appends log lines to this file instead of stderr
const LOG_FILE_ENV_VAR: &str = "SPEAKCHECK_LOG_FILE";

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a transcript against the rubric
    Analyze {
        /// Transcript file ("-" or absent reads stdin)
        file: Option<PathBuf>,

        /// Recording length: seconds ("42") or a span ("1m 30s")
        #[arg(short, long)]
        duration: String,

        /// Gemini API key (defaults to GOOGLE_API_KEY)
        #[arg(long)]
        api_key: Option<String>,

        /// Require LLM refinement; prompts for a key when none is set
        #[arg(long)]
        llm: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// Print the rubric criteria and their weights
    Rubric,
    /// Create a config file interactively
    Init {
        /// Write the built-in defaults without asking questions
        #[arg(long)]
        defaults: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "speakcheck")]
#[command(about = "Score spoken self-introduction transcripts", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/speakcheck/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Set up the tracing subscriber. `SPEAKCHECK_LOG` wins over `--verbose`;
/// `SPEAKCHECK_LOG_FILE` wins over the config's `logging.file`.
fn init_logging(verbose: bool, config_log_file: Option<&str>) -> anyhow::Result<()> {
    let filter = match std::env::var(LOG_ENV_VAR) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives.trim())
            .with_context(|| format!("Invalid {} filter", LOG_ENV_VAR))?,
        _ if verbose => EnvFilter::new("speakcheck=debug"),
        _ => EnvFilter::new("speakcheck=warn"),
    };

    let log_file = std::env::var(LOG_FILE_ENV_VAR)
        .ok()
        .filter(|p| !p.trim().is_empty())
        .or_else(|| config_log_file.map(String::from));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    result.map_err(|e| anyhow::anyhow!("Failed to initialise logging: {}", e))
}

/// Read the transcript from a file, or stdin for None / "-".
fn read_transcript(file: Option<&PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read transcript from stdin")?;
            Ok(text)
        }
    }
}

/// Load and validate the config, exiting with the config error code on failure.
fn load_config_or_exit(path: Option<PathBuf>) -> speakcheck::config::Config {
    let config = match speakcheck::config::load_config(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    if let Err(errors) = speakcheck::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    config
}

fn main() {
    // Install rustls crypto provider (required for rustls 0.23+). Fails only
    // when a provider is already installed, which is fine.
    let _ = rustls::crypto::ring::default_provider().install_default();

    // GOOGLE_API_KEY may come from a .env file in the working directory
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config_path = cli.config.map(PathBuf::from);

    match cli.command {
        Commands::Init { defaults } => {
            // No config loading here, so a broken config can be replaced
            if let Err(e) = speakcheck::config::run_init_wizard(config_path, defaults) {
                eprintln!("Init failed: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
        Commands::Rubric => {
            let use_colors = speakcheck::output::should_use_colors();
            println!("{}", speakcheck::output::format_rubric(use_colors));
        }
        Commands::Analyze {
            file,
            duration,
            api_key,
            llm,
            format,
            no_color,
        } => {
            let start_time = Instant::now();
            let config = load_config_or_exit(config_path);

            if let Err(e) = init_logging(cli.verbose, config.log_file()) {
                eprintln!("{:#}", e);
                std::process::exit(EXIT_CONFIG);
            }

            let duration = match speakcheck::metrics::parse_duration_secs(&duration) {
                Ok(d) => d,
                Err(e) => {
                    eprintln!("{:#}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };

            let transcript = match read_transcript(file.as_ref()) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("{:#}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };
            if transcript.trim().is_empty() {
                tracing::warn!("Transcript is empty; most criteria will score low");
            }

            let collaborators = match speakcheck::collab::Collaborators::from_config(&config) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Failed to set up collaborators: {:#}", e);
                    std::process::exit(EXIT_SETUP);
                }
            };

            let mut options = speakcheck::AnalyzerOptions::from_config(&config);
            if llm {
                options.require_llm = true;
            }

            let mut api_key = speakcheck::credentials::resolve_api_key(api_key.as_deref());
            let stdin_is_free = file.as_ref().is_some_and(|p| p.as_os_str() != "-");
            if api_key.is_none()
                && options.require_llm
                && stdin_is_free
                && std::io::stdin().is_terminal()
            {
                match speakcheck::credentials::prompt_for_api_key() {
                    Ok(key) => api_key = Some(key),
                    Err(e) => {
                        eprintln!("Credential error: {:#}", e);
                        std::process::exit(EXIT_CONFIG);
                    }
                }
            }

            tracing::debug!(
                duration,
                llm = api_key.is_some(),
                "Scoring transcript of {} bytes",
                transcript.len()
            );

            let analyzer = speakcheck::Analyzer::new(collaborators, options);
            let result = match analyzer.analyze(&transcript, duration, api_key.as_deref()) {
                Ok(r) => r,
                Err(e @ AnalyzeError::MissingApiKey) => {
                    eprintln!("{}", e);
                    eprintln!(
                        "Pass --api-key or set {}.",
                        speakcheck::credentials::ENV_KEY_VAR
                    );
                    std::process::exit(EXIT_CONFIG);
                }
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };

            let output = match format {
                OutputFormat::Text => {
                    let use_colors = !no_color && speakcheck::output::should_use_colors();
                    speakcheck::output::format_text(&result, use_colors)
                }
                OutputFormat::Tsv => speakcheck::output::format_tsv(&result),
                OutputFormat::Json => match speakcheck::output::format_json(&result) {
                    Ok(json) => json,
                    Err(e) => {
                        eprintln!("Failed to render JSON: {:#}", e);
                        std::process::exit(EXIT_SETUP);
                    }
                },
            };
            println!("{}", output);

            tracing::debug!("Scored in {:?}", start_time.elapsed());
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
