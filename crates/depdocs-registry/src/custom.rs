use std::time::Duration;

use depdocs::{Document, SourceError};

use crate::client::RegistryClient;
use crate::github::{GitHubReadmeClient, Repo};

/// Custom URLs often point at large raw files on slow hosts.
pub const CUSTOM_TIMEOUT: Duration = Duration::from_secs(30);

/// Version written for documents fetched from an explicit URL.
pub const CUSTOM_VERSION: &str = "custom";

/// A document fetched from a user-supplied URL, with the name it is saved
/// under.
#[derive(Debug, Clone)]
pub struct CustomDocument {
    pub name: String,
    pub document: Document,
}

/// How a custom URL is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    /// A repository page; fetch its README.
    Repository(Repo),
    /// A `github.com/.../blob/...` page; fetch the raw file instead.
    Blob(String),
    /// Anything else is fetched as-is.
    Verbatim,
}

fn is_github(url: &str) -> bool {
    url.contains("github.com/")
}

fn classify(url: &str) -> Target {
    if is_github(url) {
        if url.contains("/blob/") {
            return Target::Blob(url.to_owned());
        }
        if !url.ends_with(".md")
            && let Some(repo) = Repo::parse(url)
        {
            return Target::Repository(repo);
        }
    }
    Target::Verbatim
}

/// Name to save a custom document under when none was given.
pub fn default_name(url: &str) -> String {
    if is_github(url) {
        // An owner page (`github.com/tokio-rs`) names no repository.
        return Repo::parse(url)
            .map_or_else(|| "readme".to_owned(), |repo| format!("{}_{}", repo.owner, repo.name));
    }

    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = without_scheme
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .split_once('/')
        .map_or("", |(_, path)| path);

    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .map(|segment| segment.strip_suffix(".md").unwrap_or(segment))
        .filter(|segment| !segment.is_empty())
        .map_or_else(|| "readme".to_owned(), str::to_owned)
}

/// Fetches a single document from an explicit URL, outside any source
/// chain.
pub struct CustomUrlFetcher {
    client: RegistryClient,
    github: GitHubReadmeClient,
}

impl CustomUrlFetcher {
    pub fn new(client: RegistryClient) -> Self {
        Self {
            github: GitHubReadmeClient::new(client.clone()),
            client,
        }
    }

    pub async fn fetch(&self, url: &str, name: Option<&str>) -> Result<CustomDocument, SourceError> {
        let url = url.trim();
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map_or_else(|| default_name(url), str::to_owned);

        tracing::debug!(url, name = %name, "fetching custom document");

        let (body, source_url) = match classify(url) {
            Target::Repository(repo) => self.github.readme(&repo).await?,
            Target::Blob(blob) => {
                let raw = self
                    .github
                    .raw_url_for_blob(&blob)
                    .unwrap_or_else(|| blob.clone());
                (self.client.get_text(&raw).await?, url.to_owned())
            }
            Target::Verbatim => (self.client.get_text(url).await?, url.to_owned()),
        };

        if body.trim().is_empty() {
            return Err(SourceError::NoContent(format!("{url} returned an empty body")));
        }

        Ok(CustomDocument {
            name,
            document: Document {
                body,
                version: Some(CUSTOM_VERSION.to_owned()),
                source_url,
                source_label: "custom".to_owned(),
            },
        })
    }
}
