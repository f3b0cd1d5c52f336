use std::collections::BTreeMap;

use depdocs::{Document, Hints, PackageRef, Source, SourceError};
use serde::Deserialize;

use crate::client::RegistryClient;

/// READMEs at or under this length are treated as placeholders.
pub const MIN_README_LEN: usize = 50;

/// What the registry stores when a package was published without a README.
const MISSING_README: &str = "ERROR: No README data found!";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NpmPackument {
    #[serde(rename = "dist-tags")]
    dist_tags: BTreeMap<String, String>,
    description: Option<String>,
    readme: Option<String>,
    repository: Option<Repository>,
    homepage: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Repository {
    Url(String),
    Detailed { url: Option<String> },
}

impl Repository {
    fn url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url.as_str()),
            Self::Detailed { url } => url.as_deref(),
        }
    }
}

/// Human-facing page for an npm package.
pub fn package_page(name: &str) -> String {
    format!("https://www.npmjs.com/package/{name}")
}

/// README embedded in the npm registry document.
pub struct NpmSource {
    client: RegistryClient,
}

impl NpmSource {
    pub fn new(client: RegistryClient) -> Self {
        Self { client }
    }

    fn packument_url(&self, name: &str) -> String {
        // Scoped names keep their `@` but the separator must be escaped.
        let encoded = name.replace('/', "%2F");
        format!("{}/{encoded}", self.client.config().npm_url)
    }
}

fn record_hints(packument: &NpmPackument, hints: &mut Hints) {
    if hints.version.is_none() {
        hints.version = packument.dist_tags.get("latest").cloned();
    }
    if hints.summary.is_none() {
        hints.summary = packument
            .description
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);
    }
    if let Some(url) = packument.repository.as_ref().and_then(Repository::url) {
        hints.add_repository_url(url.trim());
    }
    if let Some(home) = &packument.homepage {
        hints.add_repository_url(home.trim());
    }
}

#[async_trait::async_trait]
impl Source for NpmSource {
    fn label(&self) -> &str {
        "npm"
    }

    async fn fetch(
        &self,
        package: &PackageRef,
        hints: &mut Hints,
    ) -> Result<Document, SourceError> {
        // The registry is case-sensitive (`JSONStream`), so ask for the
        // declared spelling rather than the lowercased key.
        let name = package.name.trim();
        let packument: NpmPackument = self.client.get_json(&self.packument_url(name)).await?;
        let page = package_page(name);

        record_hints(&packument, hints);
        if hints.page_url.is_none() {
            hints.page_url = Some(page.clone());
        }

        match packument.readme {
            Some(readme)
                if readme.trim() != MISSING_README
                    && readme.chars().count() > MIN_README_LEN =>
            {
                Ok(Document {
                    body: readme,
                    version: hints.version.clone(),
                    source_url: page,
                    source_label: self.label().to_owned(),
                })
            }
            _ => Err(SourceError::NoContent(format!(
                "npm README for {package} is missing or too short"
            ))),
        }
    }
}
