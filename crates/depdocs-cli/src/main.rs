mod commands;
mod config;
mod logging;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use depdocs::ScanOptions;
use depdocs_registry::RegistryConfig;

use crate::commands::fetch::{FetchOptions, Input};
use crate::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "depdocs", version)]
#[command(about = "Fetch README documentation for a project's Python and npm dependencies")]
struct Cli {
    /// Where documents are written (default: .ai-docs)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Read this one manifest instead of scanning
    #[arg(long, conflicts_with = "url")]
    source: Option<PathBuf>,

    /// Directory to scan for manifests
    #[arg(long, default_value = ".")]
    path: PathBuf,

    /// Only look for manifests in the scan root itself
    #[arg(long)]
    no_recursive: bool,

    /// How many directory levels below the root to scan
    #[arg(long)]
    max_depth: Option<usize>,

    /// How many packages to fetch at once
    #[arg(long)]
    concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Print a line for every package as it completes
    #[arg(short, long)]
    verbose: bool,

    /// Fetch a single document from this URL instead of scanning
    #[arg(long)]
    url: Option<String>,

    /// File name for the --url document
    #[arg(long, requires = "url")]
    name: Option<String>,
}

impl Cli {
    fn output_dir(&self, config: &AppConfig) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| config.output_dir.clone())
    }

    fn registry(&self, timeout_secs: u64) -> RegistryConfig {
        RegistryConfig::default()
            .with_timeout(Duration::from_secs(timeout_secs.max(1)))
            .with_github_token(github_token())
    }

    fn fetch_options(&self, config: &AppConfig) -> FetchOptions {
        let input = match &self.source {
            Some(manifest) => Input::Manifest(manifest.clone()),
            None => Input::Scan {
                root: self.path.clone(),
                options: ScanOptions {
                    recursive: !self.no_recursive,
                    max_depth: self.max_depth,
                    exclude_dirs: config.exclude_dirs.clone(),
                },
            },
        };

        FetchOptions {
            input,
            output_dir: self.output_dir(config),
            concurrency: self.concurrency.unwrap_or(config.concurrency),
            registry: self.registry(self.timeout.unwrap_or(config.timeout_secs)),
            verbose: self.verbose,
        }
    }
}

fn github_token() -> Option<String> {
    std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = config::load_config();
    tracing::debug!(?config, "loaded configuration");

    if let Some(url) = &cli.url {
        let timeout = cli.timeout.unwrap_or(config.custom_timeout_secs);
        commands::url::run(
            url,
            cli.name.as_deref(),
            &cli.output_dir(&config),
            cli.registry(timeout),
        )
        .await?;
        return Ok(());
    }

    commands::fetch::run(cli.fetch_options(&config)).await?;
    Ok(())
}
