pub mod client;
pub mod content;
pub mod custom;
pub mod github;
pub mod npm;
pub mod pypi;
pub mod summary_source;

use std::sync::Arc;

use depdocs::{Ecosystem, FetchPipeline, SourceChain};

pub use client::{RegistryClient, RegistryConfig};
pub use custom::{CUSTOM_TIMEOUT, CustomDocument, CustomUrlFetcher};
pub use github::{GitHubSource, Repo};
pub use npm::NpmSource;
pub use pypi::PypiSource;
pub use summary_source::SummarySource;

/// PyPI description, then the linked GitHub README, then the PyPI summary.
pub fn python_chain(client: &RegistryClient) -> SourceChain {
    SourceChain::new(vec![
        Arc::new(PypiSource::new(client.clone())),
        Arc::new(GitHubSource::new(client.clone())),
        Arc::new(SummarySource::new(Ecosystem::Python)),
    ])
}

/// npm README, then the linked GitHub README, then the npm description.
pub fn npm_chain(client: &RegistryClient) -> SourceChain {
    SourceChain::new(vec![
        Arc::new(NpmSource::new(client.clone())),
        Arc::new(GitHubSource::new(client.clone())),
        Arc::new(SummarySource::new(Ecosystem::Npm)),
    ])
}

/// A pipeline with both ecosystem chains wired to one shared client.
pub fn pipeline(client: &RegistryClient, concurrency: usize) -> FetchPipeline {
    FetchPipeline::new(concurrency)
        .with_chain(Ecosystem::Python, python_chain(client))
        .with_chain(Ecosystem::Npm, npm_chain(client))
}
