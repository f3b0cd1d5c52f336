use std::fmt;
use std::sync::Arc;

use crate::package::PackageRef;
use crate::source::{Document, Hints, Source, SourceError};

/// One source's failure while working through a chain.
#[derive(Debug)]
pub struct FailedAttempt {
    pub source: String,
    pub error: SourceError,
}

impl fmt::Display for FailedAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.error)
    }
}

/// Every source in the chain failed.
#[derive(Debug, thiserror::Error)]
#[error("all sources failed for {package}")]
pub struct ChainExhausted {
    pub package: String,
    pub attempts: Vec<FailedAttempt>,
}

/// An ordered fallback chain: sources are tried in turn until one succeeds.
#[derive(Clone)]
pub struct SourceChain {
    sources: Vec<Arc<dyn Source>>,
}

impl SourceChain {
    pub fn new(sources: Vec<Arc<dyn Source>>) -> Self {
        Self { sources }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.label()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Try each source in order. Hints gathered by earlier sources are
    /// visible to later ones.
    pub async fn fetch(&self, package: &PackageRef) -> Result<Document, ChainExhausted> {
        let mut hints = Hints::default();
        let mut attempts = Vec::new();

        for source in &self.sources {
            match source.fetch(package, &mut hints).await {
                Ok(document) => {
                    tracing::debug!(package = %package, source = source.label(), "fetched");
                    return Ok(document);
                }
                Err(error) => {
                    tracing::debug!(package = %package, source = source.label(), %error, "source failed");
                    attempts.push(FailedAttempt {
                        source: source.label().to_owned(),
                        error,
                    });
                }
            }
        }

        Err(ChainExhausted {
            package: package.name.clone(),
            attempts,
        })
    }
}

impl fmt::Debug for SourceChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceChain")
            .field("sources", &self.labels())
            .finish()
    }
}
