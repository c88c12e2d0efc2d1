//! Command-line front-end for the analysis service.
//!
//! Reads a document from disk, decodes it as UTF-8 text and submits it to
//! `POST /documents/analyze`, printing the returned envelope. With `--local` the analysis runs
//! in-process instead, which is handy when no server is running.
use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use docinsight::{
    analysis::{AnalysisEngine, AnalysisRequest, AnalysisResult, AnalysisService},
    client::AnalyzerClient,
    config::Config,
    logging,
};

#[derive(Parser)]
#[command(
    name = "analyze-document",
    about = "Summarize a text document and list its key points"
)]
struct Cli {
    /// Document to analyze; must contain UTF-8 text.
    path: PathBuf,
    /// Section label echoed in the result.
    #[arg(long)]
    section: Option<String>,
    /// Title echoed in the result.
    #[arg(long)]
    title: Option<String>,
    /// Analysis service base URL (defaults to `ANALYZER_API_URL`).
    #[arg(long)]
    api_url: Option<String>,
    /// Run the analysis in-process instead of calling the service.
    #[arg(long)]
    local: bool,
}

#[tokio::main]
async fn main() {
    logging::init_cli_tracing();
    if let Err(err) = run(Cli::parse()).await {
        eprintln!("Error al analizar el documento.");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("failed to load configuration")?;

    let bytes = fs::read(&cli.path)
        .with_context(|| format!("failed to read document at {}", cli.path.display()))?;
    let content = String::from_utf8(bytes).with_context(|| {
        format!(
            "{} is not UTF-8 text; extract its text before analyzing it",
            cli.path.display()
        )
    })?;
    let request = AnalysisRequest {
        content,
        section: cli.section,
        title: cli.title,
    };

    let result = if cli.local {
        let engine = Arc::new(AnalysisEngine::from_config(&config));
        AnalysisService::new(engine).analyze_blocking(request)
    } else {
        let base_url = cli.api_url.unwrap_or(config.api_url);
        let client = AnalyzerClient::new(base_url)?;
        tracing::debug!(url = client.base_url(), "Using remote analysis service");
        client
            .analyze(&request)
            .await
            .context("analysis request failed")?
    };

    print_result(&result)
}

fn print_result(result: &AnalysisResult) -> Result<()> {
    let rendered =
        serde_json::to_string_pretty(result).context("failed to render analysis result")?;
    println!("Análisis completado: {rendered}");
    Ok(())
}
