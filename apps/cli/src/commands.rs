//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use pageforge_core::pipeline::{
    GenerateConfig, GenerateResult, ProgressReporter, RunState, generate,
};
use pageforge_render::Renderer;
use pageforge_shared::{
    AppConfig, Language, PageForgeError, init_config, load_config, validate_api_key,
    validate_content_length,
};
use pageforge_synthesis::{OpenAiSynthesizer, StubSynthesizer, Synthesizer};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// pageforge — batch keyword-to-page generator.
#[derive(Parser)]
#[command(
    name = "pageforge",
    version,
    about = "Turn a keyword list into a ZIP archive of HTML pages and JSON descriptors.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate pages for every keyword in a file and package them as a ZIP.
    Generate {
        /// Newline-delimited keyword file.
        keywords_file: PathBuf,

        /// Output path for the archive (defaults to the configured archive
        /// name in the current directory).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Article language: english, spanish, french, german, or italian.
        #[arg(short, long)]
        language: Option<Language>,

        /// Desired article length in words (100-2000).
        #[arg(long)]
        length: Option<u32>,

        /// Directory with template overrides (article.html.tmpl,
        /// article.html.json.tmpl).
        #[arg(long)]
        templates: Option<PathBuf>,

        /// Use the built-in stub synthesizer instead of the LLM backend.
        #[arg(long)]
        offline: bool,

        /// Skip failed keywords entirely instead of writing an orphan
        /// JSON descriptor.
        #[arg(long)]
        skip_failed: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "pageforge=info",
        1 => "pageforge=debug",
        _ => "pageforge=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate {
            keywords_file,
            out,
            language,
            length,
            templates,
            offline,
            skip_failed,
        } => {
            cmd_generate(
                &keywords_file,
                out.as_deref(),
                language,
                length,
                templates.as_deref(),
                offline,
                skip_failed,
            )
            .await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

#[allow(clippy::too_many_arguments)]
async fn cmd_generate(
    keywords_file: &std::path::Path,
    out: Option<&std::path::Path>,
    language: Option<Language>,
    length: Option<u32>,
    templates: Option<&std::path::Path>,
    offline: bool,
    skip_failed: bool,
) -> Result<()> {
    let app_config = load_config()?;

    // Merge CLI flags over config file values.
    let mut config = GenerateConfig::from(&app_config);
    if let Some(language) = language {
        config.request.language = language;
    }
    if let Some(length) = length {
        config.request.content_length = validate_content_length(length)?;
    }
    if skip_failed {
        config.descriptor_on_failure = false;
    }

    let raw = std::fs::read(keywords_file)
        .map_err(|e| PageForgeError::io(keywords_file, e))?;

    let synthesizer: Box<dyn Synthesizer> = if offline {
        Box::new(StubSynthesizer)
    } else {
        validate_api_key(&app_config)?;
        Box::new(OpenAiSynthesizer::new(&app_config.openai)?)
    };

    let renderer = match templates {
        Some(dir) => Renderer::from_dir(dir)?,
        None => Renderer::builtin()?,
    };

    info!(
        file = %keywords_file.display(),
        language = %config.request.language,
        content_length = config.request.content_length,
        backend = synthesizer.name(),
        "generating pages"
    );

    let reporter = CliProgress::new();
    let result = generate(&raw, &config, synthesizer.as_ref(), &renderer, &reporter).await?;

    let out_path = out
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&result.archive_name));
    std::fs::write(&out_path, &result.archive.bytes)
        .map_err(|e| PageForgeError::io(&out_path, e))?;

    // Print summary
    println!();
    println!("  {}", result.summary());
    println!("  Run:         {}", result.run_id);
    println!("  Keywords:    {}", result.keywords_total);
    println!("  HTML pages:  {}", result.html_written);
    println!("  Descriptors: {}", result.descriptors_written);
    if result.slug_collisions > 0 {
        println!("  Collisions:  {} (duplicate slugs shadow earlier entries)", result.slug_collisions);
    }
    println!("  Archive:     {}", out_path.display());
    println!("  Time:        {:.1}s", result.elapsed.as_secs_f64());
    println!();

    let failures: Vec<_> = result
        .outcomes
        .iter()
        .filter(|o| o.error.is_some())
        .collect();
    if !failures.is_empty() {
        println!("  Keywords without full content:");
        for outcome in failures {
            println!(
                "    {} — {}",
                outcome.keyword,
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
        println!();
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn state(&self, state: RunState) {
        let message = match state {
            RunState::Idle => "Idle",
            RunState::Loading => "Loading keywords",
            RunState::Generating => "Generating articles",
            RunState::Finalized => "Archive finalized",
            RunState::Failed => "Run failed",
        };
        self.spinner.set_message(message);
    }

    fn keyword_processed(&self, current: usize, total: usize, message: &str) {
        self.spinner
            .set_message(format!("[{current}/{total}] {message}"));
    }

    fn done(&self, _result: &GenerateResult) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// Config commands
// ---------------------------------------------------------------------------

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
