//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use mindscribe_keywords::{KeywordRequest, Keywords, extract, extract_from_response};
use mindscribe_mindmap::{
    DownloadOptions, OutlineOptions, build_download, is_downloadable, parse_with, to_markdown,
};
use mindscribe_shared::{AppConfig, init_config, load_config, load_config_from};
use tokio::io::AsyncReadExt;
use tracing::{error, info, warn};

/// Shown for any failure while producing the mind-map file.
const MINDMAP_FAILURE: &str = "An error occurred while generating the XML file. Please try again.";

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// mindscribe — keywords from model output, mind maps from outlines.
#[derive(Parser)]
#[command(
    name = "mindscribe",
    version,
    about = "Extract keywords from model output and export outline notation as Freemind mind maps.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.mindscribe/mindscribe.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

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
    /// Extract keywords from model output.
    Keywords {
        /// File holding the model output (stdin if omitted).
        file: Option<PathBuf>,

        /// Input is a chat response body (`{"text": ...}`).
        #[arg(long)]
        response_json: bool,

        /// Print a JSON array instead of one keyword per line.
        #[arg(long)]
        json: bool,
    },

    /// Print the chat request body asking a model for keywords.
    Prompt {
        /// File holding the text to analyze (stdin if omitted).
        file: Option<PathBuf>,

        /// System prompt sent ahead of the keyword request.
        #[arg(long)]
        system: Option<String>,
    },

    /// Convert outline notation into a Freemind mind map.
    Mindmap {
        /// Outline file (stdin if omitted).
        file: Option<PathBuf>,

        /// Directory to write the .mm file into (defaults to the working directory).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Label of the root node.
        #[arg(long)]
        root_text: Option<String>,

        /// Print the document instead of writing a file.
        #[arg(long)]
        stdout: bool,
    },

    /// Render outline notation as Markdown headers.
    Markdown {
        /// Outline file (stdin if omitted).
        file: Option<PathBuf>,
    },

    /// Print the parsed outline tree as JSON.
    Tree {
        /// Outline file (stdin if omitted).
        file: Option<PathBuf>,

        /// Read Markdown headers (`#`) instead of `+` markers.
        #[arg(long)]
        markdown: bool,
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
        0 => "mindscribe=info",
        1 => "mindscribe=debug",
        _ => "mindscribe=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr; stdout carries command output.
    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Keywords {
            file,
            response_json,
            json,
        } => cmd_keywords(file.as_deref(), response_json, json).await,
        Command::Prompt { file, system } => cmd_prompt(file.as_deref(), system.as_deref()).await,
        Command::Mindmap {
            file,
            out,
            root_text,
            stdout,
        } => {
            let config = resolve_config(config_path)?;
            cmd_mindmap(&config, file.as_deref(), out, root_text, stdout).await
        }
        Command::Markdown { file } => {
            let config = resolve_config(config_path)?;
            cmd_markdown(&config, file.as_deref()).await
        }
        Command::Tree { file, markdown } => {
            let config = resolve_config(config_path)?;
            cmd_tree(&config, file.as_deref(), markdown).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show(config_path).await,
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

/// Read the whole input from `file`, or from stdin when `None`.
async fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| eyre!("cannot read '{}': {e}", path.display())),
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .map_err(|e| eyre!("cannot read stdin: {e}"))?;
            Ok(buf)
        }
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_keywords(file: Option<&Path>, response_json: bool, json: bool) -> Result<()> {
    let input = read_input(file).await?;

    let keywords: Keywords = if response_json {
        extract_from_response(&input)
    } else {
        extract(&input)
    };
    info!(count = keywords.len(), "keywords extracted");

    if json {
        println!("{}", serde_json::to_string(&keywords)?);
    } else {
        for keyword in &keywords {
            println!("{keyword}");
        }
    }
    Ok(())
}

async fn cmd_prompt(file: Option<&Path>, system: Option<&str>) -> Result<()> {
    let input = read_input(file).await?;
    if input.trim().is_empty() {
        return Err(eyre!("nothing to analyze: input is empty"));
    }

    let request = KeywordRequest::new(&input, system);
    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(())
}

async fn cmd_mindmap(
    config: &AppConfig,
    file: Option<&Path>,
    out: Option<PathBuf>,
    root_text: Option<String>,
    stdout: bool,
) -> Result<()> {
    let outline = read_input(file).await?;

    let mut opts = DownloadOptions::from(config);
    if let Some(text) = root_text {
        opts.mindmap.root_text = text;
    }

    if !is_downloadable(&outline, &opts.outline) {
        warn!(
            start_marker = %opts.outline.start_marker,
            "outline does not start with the start marker"
        );
        return Err(eyre!(
            "input is not mind-map notation: it must start with '{}'",
            opts.outline.start_marker
        ));
    }

    let file = build_download(&outline, &opts).map_err(|e| {
        error!(error = %e, "mind map generation failed");
        eyre!(MINDMAP_FAILURE)
    })?;

    if stdout {
        print!("{}", file.contents);
        return Ok(());
    }

    let dir = match out {
        Some(dir) => dir,
        None => std::env::current_dir()
            .map_err(|e| eyre!("cannot determine working directory: {e}"))?,
    };
    let path = file.write_to(&dir).map_err(|e| {
        error!(error = %e, "mind map could not be written");
        eyre!(MINDMAP_FAILURE)
    })?;

    println!("Mind map written to {} ({})", path.display(), file.mime_type);
    Ok(())
}

async fn cmd_markdown(config: &AppConfig, file: Option<&Path>) -> Result<()> {
    let outline = read_input(file).await?;
    let tree = parse_with(&outline, &OutlineOptions::from(config));
    println!("{}", to_markdown(&tree));
    Ok(())
}

async fn cmd_tree(config: &AppConfig, file: Option<&Path>, markdown: bool) -> Result<()> {
    let outline = read_input(file).await?;
    let opts = if markdown {
        OutlineOptions {
            marker: '#',
            ..OutlineOptions::from(config)
        }
    } else {
        OutlineOptions::from(config)
    };
    let tree = parse_with(&outline, &opts);
    println!("{}", serde_json::to_string_pretty(&tree)?);
    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = resolve_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
