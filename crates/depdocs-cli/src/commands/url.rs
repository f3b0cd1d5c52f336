use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use depdocs::DocWriter;
use depdocs_registry::{CustomUrlFetcher, RegistryClient, RegistryConfig};

/// Fetch one document from an explicit URL and save it at the output root.
pub async fn run(
    url: &str,
    name: Option<&str>,
    output_dir: &Path,
    registry: RegistryConfig,
) -> Result<PathBuf> {
    let writer = DocWriter::create(output_dir)
        .with_context(|| format!("cannot use output directory {}", output_dir.display()))?;
    let fetcher = CustomUrlFetcher::new(RegistryClient::new(registry)?);

    println!("Fetching {url}...");
    let custom = fetcher
        .fetch(url, name)
        .await
        .with_context(|| format!("failed to fetch {url}"))?;

    let path = writer.write_custom(&custom.name, &custom.document, &chrono::Local::now())?;
    println!(
        "✓ Saved {} ({} bytes)",
        path.display(),
        custom.document.body.len()
    );
    Ok(path)
}
