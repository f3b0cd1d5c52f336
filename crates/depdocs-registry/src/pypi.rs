use std::collections::BTreeMap;

use depdocs::{Document, Hints, PackageRef, Source, SourceError};
use serde::Deserialize;

use crate::client::RegistryClient;

/// Descriptions at or under this length are treated as placeholders.
pub const MIN_DESCRIPTION_LEN: usize = 100;

/// `project_urls` keys that usually point at the repository, in the order
/// they are tried.
const REPOSITORY_KEYS: &[&str] = &["Source", "Homepage", "Repository", "GitHub"];

#[derive(Debug, Deserialize)]
struct PypiResponse {
    info: PypiInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PypiInfo {
    version: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    home_page: Option<String>,
    project_urls: Option<BTreeMap<String, Option<String>>>,
}

/// Human-facing page for a PyPI project.
pub fn project_page(name: &str) -> String {
    format!("https://pypi.org/project/{name}/")
}

/// Long description from the PyPI JSON API.
///
/// Always records version, summary and repository links in the hints,
/// even when the description itself is too short to use.
pub struct PypiSource {
    client: RegistryClient,
}

impl PypiSource {
    pub fn new(client: RegistryClient) -> Self {
        Self { client }
    }

    fn json_url(&self, name: &str) -> String {
        format!("{}/pypi/{name}/json", self.client.config().pypi_url)
    }
}

fn record_hints(info: &PypiInfo, hints: &mut Hints) {
    if hints.version.is_none() {
        hints.version = info.version.clone().filter(|v| !v.is_empty());
    }
    if hints.summary.is_none() {
        hints.summary = info
            .summary
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);
    }

    if let Some(urls) = &info.project_urls {
        for key in REPOSITORY_KEYS {
            if let Some(Some(url)) = urls.get(*key) {
                hints.add_repository_url(url.trim());
            }
        }
        for url in urls.values().flatten() {
            hints.add_repository_url(url.trim());
        }
    }
    if let Some(home) = &info.home_page {
        hints.add_repository_url(home.trim());
    }
}

#[async_trait::async_trait]
impl Source for PypiSource {
    fn label(&self) -> &str {
        "PyPI"
    }

    async fn fetch(
        &self,
        package: &PackageRef,
        hints: &mut Hints,
    ) -> Result<Document, SourceError> {
        let name = package.lookup_name();
        let response: PypiResponse = self.client.get_json(&self.json_url(&name)).await?;
        let page = project_page(&name);

        record_hints(&response.info, hints);
        if hints.page_url.is_none() {
            hints.page_url = Some(page.clone());
        }

        match response.info.description {
            Some(description) if description.chars().count() > MIN_DESCRIPTION_LEN => {
                Ok(Document {
                    body: description,
                    version: hints.version.clone(),
                    source_url: page,
                    source_label: self.label().to_owned(),
                })
            }
            _ => Err(SourceError::NoContent(format!(
                "PyPI description for {package} is missing or too short"
            ))),
        }
    }
}
