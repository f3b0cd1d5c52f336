use std::sync::Arc;

use crate::package::PackageRef;

/// Errors from a single documentation source. Any of them sends the
/// pipeline on to the next source in the chain.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("no usable content: {0}")]
    NoContent(String),
}

/// Documentation retrieved for one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub body: String,
    /// Resolved version; `None` is written as `unknown`.
    pub version: Option<String>,
    pub source_url: String,
    /// Which source produced the document (`PyPI`, `GitHub`, ...).
    pub source_label: String,
}

/// Metadata learned by earlier sources in a chain for the same package.
///
/// A registry source records the repository link and summary even when the
/// registry itself has no usable README, so later sources can build on it
/// without querying the registry again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hints {
    pub version: Option<String>,
    /// Repository or homepage links, most specific first.
    pub repository_urls: Vec<String>,
    pub summary: Option<String>,
    /// Human-facing registry page for the package.
    pub page_url: Option<String>,
}

impl Hints {
    pub fn add_repository_url(&mut self, url: impl Into<String>) {
        let url = url.into();
        if !url.is_empty() && !self.repository_urls.contains(&url) {
            self.repository_urls.push(url);
        }
    }
}

/// A place documentation can come from.
#[async_trait::async_trait]
pub trait Source: Send + Sync {
    /// Human-readable label, used for source attribution.
    fn label(&self) -> &str;

    /// Try to fetch documentation for `package`.
    async fn fetch(&self, package: &PackageRef, hints: &mut Hints)
    -> Result<Document, SourceError>;
}

#[async_trait::async_trait]
impl<T: Source + ?Sized> Source for Arc<T> {
    fn label(&self) -> &str {
        (**self).label()
    }

    async fn fetch(
        &self,
        package: &PackageRef,
        hints: &mut Hints,
    ) -> Result<Document, SourceError> {
        (**self).fetch(package, hints).await
    }
}
