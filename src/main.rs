// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, error, info, warn};
use std::io::{IsTerminal, Read, Write};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use reflexlate::app_config::{self, Config, TranslationProvider};
use reflexlate::app_controller::{CREDENTIALS_HINT, Controller, FAILURE_NOTICE, InputStats};
use reflexlate::errors::AppError;
use reflexlate::language_utils::resolve_language_name;
use reflexlate::translation::PipelineResult;
use reflexlate::web;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    #[value(name = "openai")]
    OpenAI,
    #[value(name = "lmstudio")]
    LMStudio,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
            CliTranslationProvider::LMStudio => TranslationProvider::LMStudio,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// Options shared by every command that talks to the provider
#[derive(Args, Debug)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// Translation provider to use
    #[arg(short, long, value_enum, global = true)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for every stage
    #[arg(short, long, global = true)]
    model: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate text through the translator, critic and reviewer agents
    Translate(TranslateArgs),

    /// Start the web form
    Serve {
        /// Address to listen on (overrides server.bind_address)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Check that the configured provider answers
    Check,

    /// Generate shell completions for reflexlate
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Text to translate (read from stdin when omitted)
    #[arg(value_name = "TEXT")]
    text: Option<String>,

    /// Source language name or code (e.g., 'English', 'en')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language name or code (e.g., 'French', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Swap source and target language
    #[arg(long)]
    swap: bool,

    /// Print the draft, the feedback checks and the reviewer verdict
    #[arg(long)]
    show_trace: bool,

    /// Print the full result as JSON
    #[arg(long, conflicts_with = "show_trace")]
    json: bool,
}

/// reflexlate - reflective translation with three LLM agents
///
/// A translator drafts, a critic checks the draft against a fixed checklist,
/// and a reviewer reflects on the critique and makes the final call.
#[derive(Parser, Debug)]
#[command(name = "reflexlate")]
#[command(version)]
#[command(about = "Reflective translation with three LLM agents")]
#[command(long_about = "reflexlate translates text with a draft, critique and review loop \
run against an OpenAI-compatible chat completion API.

EXAMPLES:
    reflexlate translate \"Hello, how are you today?\"      # English to French
    reflexlate translate --swap \"Bonjour\"                 # French to English
    echo \"Good morning\" | reflexlate translate --show-trace
    reflexlate translate -p lmstudio -m qwen2.5-7b \"Hi\"   # Local LM Studio server
    reflexlate serve --bind 0.0.0.0:8501                  # Web form
    reflexlate check                                      # Test provider connection
    reflexlate completions bash > reflexlate.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. OPENAI_API_KEY (also read from .env) fills an
    empty OpenAI API key.

SUPPORTED PROVIDERS:
    openai    - OpenAI API (requires API key)
    lmstudio  - LM Studio local server (OpenAI-compatible on http://localhost:1234/v1)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    common: CommonArgs,
}

// @struct: Custom logger implementation
//
// Filtering follows the global max level, which is raised or lowered once the
// config has been loaded.
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌",
            Level::Warn => "🚧",
            Level::Info => " ",
            Level::Debug => "🔍",
            Level::Trace => "📋",
        }
    }

    // @returns: ANSI colour for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize the logger once with warn level by default
    // We'll update the level after loading the config
    CustomLogger::init(LevelFilter::Warn)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "reflexlate", &mut std::io::stdout());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Translate(args) => {
            let config = load_config(&cli.common, Some(&args))?;
            let controller = Controller::with_config(config)?;
            run_translate(&controller, &args).await
        }
        Commands::Serve { bind } => {
            let config = load_config(&cli.common, None)?;
            let bind_address = bind.unwrap_or_else(|| config.server.bind_address.clone());
            let controller = Arc::new(Controller::with_config(config)?);
            web::serve(controller, &bind_address).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check => {
            let config = load_config(&cli.common, None)?;
            let controller = Controller::with_config(config)?;
            match controller.test_connection().await {
                Ok(()) => {
                    println!(
                        "Connected to {} ({})",
                        controller.config().translation.provider.display_name(),
                        controller.config().translation.get_model()
                    );
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    error!("Connection check failed: {}", e);
                    eprintln!("{}", CREDENTIALS_HINT);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

/// Load the config file and apply environment and command-line overrides
fn load_config(common: &CommonArgs, translate: Option<&TranslateArgs>) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &common.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Failed to read .env file: {}", e),
    }

    let mut config = Config::load_or_create(Path::new(&common.config_path))?;
    config.apply_env(|key| std::env::var(key).ok());

    // Override config with CLI options if provided
    if let Some(provider) = &common.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(model) = &common.model {
        let provider = config.translation.provider.clone();
        config.translation.provider_config_mut(&provider).model = model.clone();
    }
    if let Some(log_level) = &common.log_level {
        config.log_level = log_level.clone().into();
    }

    if let Some(args) = translate {
        if let Some(source) = &args.source_language {
            config.source_language = source.clone();
        }
        if let Some(target) = &args.target_language {
            config.target_language = target.clone();
        }
        if args.swap {
            std::mem::swap(&mut config.source_language, &mut config.target_language);
        }
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // Canonical names are what the prompts show the model
    config.source_language = resolve_language_name(&config.source_language)?;
    config.target_language = resolve_language_name(&config.target_language)?;

    if common.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    Ok(config)
}

async fn run_translate(controller: &Controller, args: &TranslateArgs) -> Result<ExitCode> {
    let text = match &args.text {
        Some(text) => text.clone(),
        None => read_stdin()?,
    };

    let stats = InputStats::of(&text);
    let source = controller.config().source_language.clone();
    let target = controller.config().target_language.clone();
    info!(
        "{} -> {} ({} characters, {} words) with {} - {}",
        source,
        target,
        stats.characters,
        stats.words,
        controller.config().translation.provider.display_name(),
        controller.config().translation.get_model()
    );

    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message("Translating, critiquing and reviewing…");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let outcome = controller.translate(&text, &source, &target).await;
    spinner.finish_and_clear();

    match outcome {
        Ok(result) => {
            if args.json {
                let json = serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
                println!("{}", json);
            } else {
                print_result(&result, args.show_trace);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(AppError::Input(e)) => {
            warn!("{}", e);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            debug!("Run failed: {}", e);
            eprintln!("{}: {}", FAILURE_NOTICE, e);
            eprintln!("{}", CREDENTIALS_HINT);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn read_stdin() -> Result<String> {
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Err(anyhow!("TEXT is required when stdin is not piped"));
    }
    let mut text = String::new();
    stdin.read_to_string(&mut text).context("Failed to read text from stdin")?;
    Ok(text)
}

fn print_result(result: &PipelineResult, show_trace: bool) {
    println!("{}", result.final_translation());

    if show_trace {
        println!();
        println!("Draft:");
        println!("  {}", result.draft);
        println!("Feedback ({}):", result.feedback.report.decision);
        for (label, passed) in result.feedback.report.checks.labelled() {
            println!("  [{}] {}", if passed { "x" } else { " " }, label);
        }
        println!("  {}", result.feedback.report.feedback);
        println!("Review ({}):", result.verdict.decision);
        println!("  {}", result.verdict.feedback);
        println!();
        println!("Status: {} | {} ms | {}", result.status, result.duration_ms, result.usage.summary());
    } else {
        info!("{} in {} ms", result.status, result.duration_ms);
    }
}
