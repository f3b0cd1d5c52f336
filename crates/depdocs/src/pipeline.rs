use std::collections::HashMap;

use chrono::{DateTime, Local};
use futures::stream::{self, Stream, StreamExt};

use crate::chain::SourceChain;
use crate::feedback::Feedback;
use crate::package::{Ecosystem, PackageRef};
use crate::source::Document;
use crate::summary::RunSummary;
use crate::writer::{DocWriter, WriteError};

/// Default cap on packages fetched at the same time.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// What happened to one package.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Fetched {
        document: Document,
        fetched_at: DateTime<Local>,
    },
    Failed {
        /// One entry per source tried, in chain order.
        reasons: Vec<String>,
    },
}

/// The result of fetching documentation for one package.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub package: PackageRef,
    pub outcome: FetchOutcome,
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, FetchOutcome::Fetched { .. })
    }

    pub fn document(&self) -> Option<&Document> {
        match &self.outcome {
            FetchOutcome::Fetched { document, .. } => Some(document),
            FetchOutcome::Failed { .. } => None,
        }
    }
}

/// Fetches documentation for many packages with bounded concurrency.
///
/// Each ecosystem has its own fallback chain. Packages are independent:
/// one package failing, timing out or erroring never affects another.
#[derive(Debug, Clone)]
pub struct FetchPipeline {
    chains: HashMap<Ecosystem, SourceChain>,
    concurrency: usize,
}

impl Default for FetchPipeline {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY)
    }
}

impl FetchPipeline {
    pub fn new(concurrency: usize) -> Self {
        Self {
            chains: HashMap::new(),
            concurrency: concurrency.max(1),
        }
    }

    pub fn with_chain(mut self, ecosystem: Ecosystem, chain: SourceChain) -> Self {
        self.chains.insert(ecosystem, chain);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Fetch one package through its ecosystem's chain.
    pub async fn fetch_one(&self, package: PackageRef) -> FetchResult {
        let Some(chain) = self.chains.get(&package.ecosystem) else {
            let reasons = vec![format!("no sources configured for {}", package.ecosystem)];
            return FetchResult {
                package,
                outcome: FetchOutcome::Failed { reasons },
            };
        };

        let outcome = match chain.fetch(&package).await {
            Ok(document) => FetchOutcome::Fetched {
                document,
                fetched_at: Local::now(),
            },
            Err(exhausted) => FetchOutcome::Failed {
                reasons: exhausted.attempts.iter().map(|a| a.to_string()).collect(),
            },
        };

        FetchResult { package, outcome }
    }

    /// Results in completion order, at most `concurrency` in flight.
    pub fn stream(&self, packages: Vec<PackageRef>) -> impl Stream<Item = FetchResult> + '_ {
        stream::iter(packages)
            .map(move |package| self.fetch_one(package))
            .buffer_unordered(self.concurrency)
    }

    /// Fetch everything and collect the results.
    pub async fn run(&self, packages: Vec<PackageRef>) -> Vec<FetchResult> {
        self.stream(packages).collect().await
    }

    /// Fetch everything, writing each document as soon as it arrives.
    ///
    /// Progress goes to `on_feedback`, one event per package. A write
    /// failure aborts the run; files already written stay in place.
    pub async fn run_and_write(
        &self,
        packages: Vec<PackageRef>,
        writer: &DocWriter,
        mut on_feedback: impl FnMut(Feedback),
    ) -> Result<RunSummary, WriteError> {
        let mut results = Vec::with_capacity(packages.len());
        let mut stream = std::pin::pin!(self.stream(packages));

        while let Some(result) = stream.next().await {
            match &result.outcome {
                FetchOutcome::Fetched {
                    document,
                    fetched_at,
                } => {
                    let path = writer.write(&result.package, document, fetched_at)?;
                    on_feedback(Feedback::Fetched {
                        package: result.package.clone(),
                        source: document.source_label.clone(),
                        path,
                        bytes: document.body.len(),
                    });
                }
                FetchOutcome::Failed { reasons } => {
                    on_feedback(Feedback::Failed {
                        package: result.package.clone(),
                        reasons: reasons.clone(),
                    });
                }
            }
            results.push(result);
        }

        Ok(RunSummary::from_results(&results))
    }
}
