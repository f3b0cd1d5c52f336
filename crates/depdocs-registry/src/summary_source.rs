use depdocs::{Document, Ecosystem, Hints, PackageRef, Source, SourceError};

use crate::npm::package_page;
use crate::pypi::project_page;

/// Last resort: a short stub built from the one-line summary the registry
/// lookup recorded, pointing back at the registry page.
pub struct SummarySource {
    ecosystem: Ecosystem,
    label: String,
}

impl SummarySource {
    pub fn new(ecosystem: Ecosystem) -> Self {
        let label = match ecosystem {
            Ecosystem::Python => "PyPI summary",
            Ecosystem::Npm => "npm summary",
        };
        Self {
            ecosystem,
            label: label.to_owned(),
        }
    }

    fn page_for(&self, package: &PackageRef) -> String {
        match self.ecosystem {
            Ecosystem::Python => project_page(&package.lookup_name()),
            Ecosystem::Npm => package_page(package.name.trim()),
        }
    }
}

#[async_trait::async_trait]
impl Source for SummarySource {
    fn label(&self) -> &str {
        &self.label
    }

    async fn fetch(
        &self,
        package: &PackageRef,
        hints: &mut Hints,
    ) -> Result<Document, SourceError> {
        let summary = hints
            .summary
            .as_deref()
            .ok_or_else(|| SourceError::NoContent(format!("no summary recorded for {package}")))?;

        let page = hints
            .page_url
            .clone()
            .unwrap_or_else(|| self.page_for(package));

        Ok(Document {
            body: format!("# {}\n\n{summary}\n\nSee: {page}\n", package.name),
            version: hints.version.clone(),
            source_url: page,
            source_label: self.label.clone(),
        })
    }
}
