use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::{path::PathBuf, sync::Arc};
use textgen_demo::{
    client::{HttpGenerationClient, Length, Tone},
    config::{self, API_KEY_VAR},
    logging,
    panel::{DEFAULT_QUERY, DisplayPolicy, GenerationPanel, PanelState},
};
use tokio::io::BufReader;
use tracing::{debug, warn};

/// Terminal front-end for the text-generation demo
#[derive(Parser, Debug)]
#[command(name = "textgen")]
#[command(about = "Send prompts to a text-generation backend", long_about = None)]
struct Cli {
    /// Backend base URL (overrides config and TEXTGEN_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Bearer token (overrides config and TEXTGEN_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Log level for stderr diagnostics
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate once and print the result
    Generate {
        #[arg(short, long, default_value_t = Tone::Friendly)]
        tone: Tone,

        #[arg(short, long, default_value_t = Length::Short)]
        length: Length,

        /// Prompt text
        query: Option<String>,
    },
    /// Read prompts from stdin, one per line, without waiting between them
    Interactive {
        #[arg(short, long, default_value_t = Tone::Friendly)]
        tone: Tone,

        #[arg(short, long, default_value_t = Length::Short)]
        length: Length,

        /// Show whichever response arrives last instead of the latest prompt's
        #[arg(long)]
        last_resolved: bool,
    },
    /// Upload a text file as retrieval context
    Index { file: PathBuf },
    /// Check that the backend is up
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(url) = cli.api_url {
        config.client.base_url = url;
    }
    if let Some(key) = cli.api_key {
        config.client.api_key = key;
    }

    let log_level = logging::resolve_level(&cli.log_level);
    if let Err(e) = logging::validate_log_level(&log_level) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
    logging::init_compact(&log_level);

    if config.client.uses_demo_key() {
        warn!(
            "Using the built-in demo API key; set {} for anything else",
            API_KEY_VAR
        );
    }

    let client = HttpGenerationClient::new(config.client);

    match cli.command {
        Command::Generate {
            tone,
            length,
            query,
        } => {
            let panel = GenerationPanel::new(Arc::new(client));
            panel.set_tone(tone);
            panel.set_length(length);

            panel
                .submit(query.unwrap_or_else(|| DEFAULT_QUERY.to_string()))
                .await
                .context("Generation failed")?;
            println!("{}", panel.snapshot().output);
        }
        Command::Interactive {
            tone,
            length,
            last_resolved,
        } => {
            let policy = if last_resolved {
                DisplayPolicy::LastResolved
            } else {
                DisplayPolicy::LatestIssued
            };
            let panel = GenerationPanel::with_policy(Arc::new(client), policy);
            panel.set_tone(tone);
            panel.set_length(length);
            interactive(Arc::new(panel)).await?;
        }
        Command::Index { file } => {
            let filename = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .with_context(|| format!("Not a file: {}", file.display()))?;
            let text = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let body = client.index_document(&filename, text).await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Command::Health => {
            let body = client.health().await?;
            println!("{}", body);
        }
    }

    Ok(())
}

/// Each line fires a generation immediately; the display is printed
/// whenever the panel's output or error changes.
async fn interactive(panel: Arc<GenerationPanel>) -> Result<()> {
    let mut updates = panel.subscribe();
    let printer = tokio::spawn(async move {
        let mut shown = PanelState::default();
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            if state.output != shown.output {
                println!("{}", state.output);
            }
            if state.error != shown.error {
                if let Some(error) = &state.error {
                    eprintln!("Error: {}", error);
                }
            }
            shown = state;
        }
    });

    let submitted = panel
        .submit_lines(BufReader::new(tokio::io::stdin()))
        .await?;
    debug!("Submitted {} prompts", submitted);

    drop(panel);
    printer.await?;
    Ok(())
}
