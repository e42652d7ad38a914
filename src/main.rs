use std::io;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pubmed_affiliations::{
    ClientConfig, Paper, PubMedClient, ResolvedPaper, format_output_data, resolve_papers,
    write_csv, write_csv_file,
};
use tracing::{debug, info};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(
    name = "get-papers-list",
    version,
    about = "Fetch PubMed papers with pharmaceutical or biotech company authors",
    long_about = "Search PubMed, flag authors affiliated with companies and export the papers as CSV"
)]
struct Cli {
    /// PubMed query (full PubMed query syntax)
    #[arg(value_name = "QUERY")]
    query: String,

    /// Write CSV to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Print debug information during execution
    #[arg(short, long)]
    debug: bool,

    /// Maximum number of search results
    #[arg(short, long, default_value = "100")]
    limit: usize,

    /// Export every fetched paper, not only those with company authors
    #[arg(long)]
    include_all: bool,

    /// API key for NCBI E-utilities (increases rate limit)
    #[arg(long, env = "NCBI_API_KEY")]
    api_key: Option<String>,

    /// Email for NCBI requests (recommended)
    #[arg(long, env = "NCBI_EMAIL")]
    email: Option<String>,

    /// Tool name for NCBI requests
    #[arg(long, env = "NCBI_TOOL", default_value = "get-papers-list")]
    tool: String,
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new().with_tool(self.tool.as_str());
        if let Some(api_key) = &self.api_key {
            config = config.with_api_key(api_key.as_str());
        }
        if let Some(email) = &self.email {
            config = config.with_email(email.as_str());
        }
        config
    }
}

/// Papers to export: all of them with `--include-all`, otherwise only those
/// with at least one non-academic author
fn select_for_export(mut resolved: Vec<ResolvedPaper>, include_all: bool) -> Vec<ResolvedPaper> {
    if !include_all {
        resolved.retain(ResolvedPaper::has_non_academic_authors);
    }
    resolved
}

async fn fetch_with_progress(client: &PubMedClient, pmids: &[String]) -> Result<Vec<Paper>> {
    let batch_size = client.config().batch_size;

    let pb = ProgressBar::new(pmids.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} papers ({msg})")
            .context("Failed to set progress bar style")?
            .progress_chars("#>-"),
    );
    pb.set_message("Fetching from PubMed");

    let mut papers = Vec::with_capacity(pmids.len());
    for batch in pmids.chunks(batch_size) {
        let fetched = client
            .fetch_papers(batch)
            .await
            .with_context(|| format!("Failed to fetch {} papers from PubMed", batch.len()))?;
        papers.extend(fetched);
        pb.inc(batch.len() as u64);
    }

    pb.finish_with_message("done");
    Ok(papers)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with indicatif layer for progress bars; RUST_LOG wins over --debug
    let filter = if cli.debug { "debug" } else { "info" };

    let indicatif_layer = IndicatifLayer::new();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(indicatif_layer.get_stderr_writer()),
        )
        .with(indicatif_layer)
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    let client = PubMedClient::with_config(cli.client_config());

    let pmids = client
        .search_articles(&cli.query, cli.limit)
        .await
        .with_context(|| format!("Failed to search PubMed for {:?}", cli.query))?;
    info!(found = pmids.len(), "Search finished");

    let papers = fetch_with_progress(&client, &pmids).await?;
    let resolved = select_for_export(resolve_papers(&papers), cli.include_all);
    debug!(
        fetched = papers.len(),
        exported = resolved.len(),
        "Classification finished"
    );

    let rows = format_output_data(&resolved);
    match &cli.file {
        Some(path) => write_csv_file(&rows, path)
            .with_context(|| format!("Failed to write CSV to {}", path.display()))?,
        None => write_csv(&rows, io::stdout().lock()).context("Failed to write CSV to stdout")?,
    }

    Ok(())
}
