///
/// This module implements the CLI for docsum: command parsing, settings
/// resolution, and the one-shot `summarize` flow.
///
/// All workflow logic (state machine, HTTP clients, rendering) lives in
/// [`docsum-core`]. This module only binds the controller's named actions to
/// command-line options and prints what the presenter produces.
///
/// - [`Cli`] defines all user-facing options and subcommands.
/// - [`run`] is the async entrypoint used by `main` and integration tests.
///
/// [`docsum-core`]: ../../docsum-core/
use crate::load_config::{load_config, CliConfig};
use crate::session::run_session;
use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use docsum_core::contract::SummaryLength;
use docsum_core::export::{DirectorySink, ExportClient};
use docsum_core::present::present;
use docsum_core::selector::{Document, FileSource, ACCEPT_HINT};
use docsum_core::summarize::SummaryClient;
use docsum_core::workflow::{ActionOutcome, WorkflowController};
use std::path::PathBuf;
use std::sync::Arc;

pub type HttpController = WorkflowController<SummaryClient, ExportClient, DirectorySink>;

/// CLI for docsum: summarize documents with a remote summarization service.
#[derive(Parser)]
#[clap(
    name = "docsum",
    version,
    about = "Summarize a .txt/.pdf/.docx document and download the summary as a Word file"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize a document and print the result
    Summarize {
        /// Document to summarize; only the first file is used
        #[clap(required = true)]
        files: Vec<PathBuf>,

        /// Summary length: short, medium or detailed
        #[clap(long)]
        length: Option<SummaryLength>,

        /// Also download the summary as summary.docx
        #[clap(long)]
        download: bool,

        /// Print the result as JSON instead of text
        #[clap(long)]
        json: bool,

        #[clap(flatten)]
        service: ServiceArgs,
    },
    /// Interactive session: select, submit, export and reset repeatedly
    Session {
        #[clap(flatten)]
        service: ServiceArgs,
    },
}

#[derive(Args, Debug, Default)]
pub struct ServiceArgs {
    /// Path to an optional YAML config file
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Base URL of the summarization service
    #[clap(long)]
    pub base_url: Option<String>,

    /// Directory downloads are saved to
    #[clap(long)]
    pub output_dir: Option<PathBuf>,
}

impl ServiceArgs {
    /// Config file and environment, then flags on top.
    pub fn resolve(&self) -> Result<CliConfig> {
        let mut config = load_config(self.config.as_deref())?;
        if let Some(url) = &self.base_url {
            config.api = docsum_core::config::ApiConfig::new(url.as_str());
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        Ok(config)
    }
}

pub fn build_controller(config: &CliConfig) -> HttpController {
    WorkflowController::new(
        Arc::new(SummaryClient::new(&config.api)),
        Arc::new(ExportClient::new(&config.api)),
        Arc::new(DirectorySink::new(&config.output_dir)),
    )
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Summarize {
            files,
            length,
            download,
            json,
            service,
        } => {
            tracing::info!(command = "summarize", "Starting summarize");
            let config = service.resolve()?;
            summarize_once(&config, files, length, download, json).await
        }
        Commands::Session { service } => {
            tracing::info!(command = "session", "Starting interactive session");
            let config = service.resolve()?;
            let mut controller = build_controller(&config);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            run_session(&mut controller, stdin, std::io::stdout()).await
        }
    }
}

async fn summarize_once(
    config: &CliConfig,
    files: Vec<PathBuf>,
    length: Option<SummaryLength>,
    download: bool,
    json: bool,
) -> Result<()> {
    let (first, rest) = files
        .split_first()
        .ok_or_else(|| anyhow!("No file given"))?;
    if !rest.is_empty() {
        tracing::warn!(ignored = rest.len(), "Only the first file is summarized");
    }

    let document = Document::load(first)
        .await
        .with_context(|| format!("Failed to read {}", first.display()))?;
    if !document.matches_accept_hint() {
        tracing::warn!(
            filename = %document.filename,
            accepted = ACCEPT_HINT,
            "File type is not one of the suggested types; the service decides"
        );
    }

    let mut controller = build_controller(config);
    controller.set_length(length.unwrap_or(config.length));
    controller.select_file(FileSource::Picked(vec![document]));

    match controller.submit().await {
        ActionOutcome::Applied => {}
        ActionOutcome::Failed(e) => {
            eprintln!("[ERROR] {e}");
            return Err(anyhow::Error::new(e));
        }
        other => bail!("Summary request did not complete: {other:?}"),
    }

    let result = controller
        .state()
        .result()
        .ok_or_else(|| anyhow!("No summary held after a successful request"))?;
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!("{}", present(result));
    }

    if download {
        match controller.export().await {
            ActionOutcome::Delivered(path) => println!("Saved {}", path.display()),
            ActionOutcome::Failed(e) => {
                eprintln!("[ERROR] {e}");
                return Err(anyhow::Error::new(e));
            }
            other => bail!("Export did not complete: {other:?}"),
        }
    }

    Ok(())
}
