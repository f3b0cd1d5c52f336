use std::path::PathBuf;

use anyhow::{Context, Result};
use depdocs::{DocWriter, Manifest, RunSummary, ScanOptions, ScanReport, scan};
use depdocs_registry::{RegistryClient, RegistryConfig};

use crate::commands::format;

/// Where the packages come from.
#[derive(Debug, Clone)]
pub enum Input {
    /// One explicit manifest; no scanning.
    Manifest(PathBuf),
    Scan { root: PathBuf, options: ScanOptions },
}

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub input: Input,
    pub output_dir: PathBuf,
    pub concurrency: usize,
    pub registry: RegistryConfig,
    /// Print one line per package as it completes.
    pub verbose: bool,
}

fn discover(input: &Input) -> Result<ScanReport> {
    match input {
        Input::Manifest(path) => {
            if !path.is_file() {
                anyhow::bail!("manifest not found: {}", path.display());
            }
            let manifest = Manifest::load(path)
                .with_context(|| format!("failed to read manifest {}", path.display()))?;
            Ok(ScanReport {
                manifests: vec![manifest],
                feedback: Vec::new(),
            })
        }
        Input::Scan { root, options } => {
            let report = scan(root, options)?;
            format::print_feedback(&report.feedback);
            if report.is_empty() {
                anyhow::bail!("no dependency manifests found under {}", root.display());
            }
            Ok(report)
        }
    }
}

/// Discover packages, fetch their documentation and write it out.
///
/// Partial failures are reported in the summary, not as errors.
pub async fn run(options: FetchOptions) -> Result<RunSummary> {
    let report = discover(&options.input)?;

    for line in format::discovered_lines(&report) {
        println!("{line}");
    }

    let packages = report.packages();
    if packages.is_empty() {
        println!("No dependencies declared; nothing to fetch.");
        return Ok(RunSummary::default());
    }

    let writer = DocWriter::create(&options.output_dir)
        .with_context(|| format!("cannot use output directory {}", options.output_dir.display()))?;
    let client = RegistryClient::new(options.registry.clone())?;
    let pipeline = depdocs_registry::pipeline(&client, options.concurrency);

    println!(
        "Fetching documentation for {} packages ({} at a time)...",
        packages.len(),
        pipeline.concurrency()
    );

    let verbose = options.verbose;
    let summary = pipeline
        .run_and_write(packages.into_vec(), &writer, |feedback| {
            if verbose {
                format::print_event(&feedback);
            }
        })
        .await?;

    println!();
    for line in format::summary_lines(&summary) {
        println!("{line}");
    }
    println!("{}", format::output_hint(writer.root()));

    Ok(summary)
}
