use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::{Document, Hints, PackageRef, Source, SourceError};

/// In-memory source for testing. Answers from a fixed table of documents
/// and counts how often it is asked, and how many calls overlapped.
pub struct ScriptedSource {
    label: String,
    documents: HashMap<String, String>,
    repositories: HashMap<String, String>,
    needs_repository: bool,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            documents: HashMap::new(),
            repositories: HashMap::new(),
            needs_repository: false,
            delay: None,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Serve `body` for the package with this (normalized) name.
    pub fn with_document(mut self, name: &str, body: &str) -> Self {
        self.documents.insert(name.to_owned(), body.to_owned());
        self
    }

    /// Record a repository hint for `name` before answering.
    pub fn with_hint_repository(mut self, name: &str, url: &str) -> Self {
        self.repositories.insert(name.to_owned(), url.to_owned());
        self
    }

    /// Only succeed when an earlier source left a repository hint.
    pub fn requiring_repository_hint(mut self) -> Self {
        self.needs_repository = true;
        self
    }

    /// Sleep this long inside every call before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Most calls that were in progress at the same moment.
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn answer(&self, package: &PackageRef, hints: &mut Hints) -> Result<Document, SourceError> {
        let name = package.lookup_name();

        if let Some(url) = self.repositories.get(&name) {
            hints.add_repository_url(url.clone());
        }

        if self.needs_repository {
            let url = hints
                .repository_urls
                .first()
                .ok_or_else(|| SourceError::NotFound(format!("no repository for {name}")))?;
            return Ok(Document {
                body: format!("README from {url}"),
                version: hints.version.clone(),
                source_url: url.clone(),
                source_label: self.label.clone(),
            });
        }

        let body = self
            .documents
            .get(&name)
            .ok_or_else(|| SourceError::NotFound(name.clone()))?;

        Ok(Document {
            body: body.clone(),
            version: Some("1.0.0".to_owned()),
            source_url: format!("https://docs.example.test/{name}"),
            source_label: self.label.clone(),
        })
    }
}

#[async_trait::async_trait]
impl Source for ScriptedSource {
    fn label(&self) -> &str {
        &self.label
    }

    async fn fetch(
        &self,
        package: &PackageRef,
        hints: &mut Hints,
    ) -> Result<Document, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let result = self.answer(package, hints);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_known_documents() {
        let source = ScriptedSource::new("test").with_document("flask", "Flask docs");
        let doc = source
            .fetch(&PackageRef::python("Flask"), &mut Hints::default())
            .await
            .unwrap();
        assert_eq!(doc.body, "Flask docs");
        assert_eq!(doc.source_label, "test");
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn unknown_package_is_not_found() {
        let source = ScriptedSource::new("test");
        let result = source
            .fetch(&PackageRef::npm("react"), &mut Hints::default())
            .await;
        assert!(matches!(result, Err(SourceError::NotFound(_))));
    }

    #[tokio::test]
    async fn sequential_calls_never_overlap() {
        let source = ScriptedSource::new("test").with_delay(Duration::from_millis(1));
        for _ in 0..3 {
            let _ = source
                .fetch(&PackageRef::npm("react"), &mut Hints::default())
                .await;
        }
        assert_eq!(source.calls(), 3);
        assert_eq!(source.peak_in_flight(), 1);
    }

    #[tokio::test]
    async fn records_repository_hint_even_on_failure() {
        let source =
            ScriptedSource::new("registry").with_hint_repository("axios", "https://github.com/axios/axios");
        let mut hints = Hints::default();
        let result = source.fetch(&PackageRef::npm("axios"), &mut hints).await;
        assert!(result.is_err());
        assert_eq!(hints.repository_urls, vec!["https://github.com/axios/axios"]);
    }
}
