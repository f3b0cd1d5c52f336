use std::collections::BTreeMap;

use crate::package::Ecosystem;
use crate::pipeline::{FetchOutcome, FetchResult};

/// Per-ecosystem tallies for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EcosystemSummary {
    pub discovered: usize,
    pub fetched: usize,
    /// Failed package names, sorted.
    pub failed: Vec<String>,
    /// How many documents each source supplied.
    pub by_source: BTreeMap<String, usize>,
}

/// Order-independent reduction over a run's fetch results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ecosystems: BTreeMap<Ecosystem, EcosystemSummary>,
}

impl RunSummary {
    pub fn from_results(results: &[FetchResult]) -> Self {
        let mut ecosystems: BTreeMap<Ecosystem, EcosystemSummary> = BTreeMap::new();

        for result in results {
            let entry = ecosystems.entry(result.package.ecosystem).or_default();
            entry.discovered += 1;
            match &result.outcome {
                FetchOutcome::Fetched { document, .. } => {
                    entry.fetched += 1;
                    *entry
                        .by_source
                        .entry(document.source_label.clone())
                        .or_default() += 1;
                }
                FetchOutcome::Failed { .. } => entry.failed.push(result.package.name.clone()),
            }
        }

        for summary in ecosystems.values_mut() {
            summary.failed.sort();
        }

        Self { ecosystems }
    }

    pub fn get(&self, ecosystem: Ecosystem) -> Option<&EcosystemSummary> {
        self.ecosystems.get(&ecosystem)
    }

    pub fn total_discovered(&self) -> usize {
        self.ecosystems.values().map(|s| s.discovered).sum()
    }

    pub fn total_fetched(&self) -> usize {
        self.ecosystems.values().map(|s| s.fetched).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.ecosystems.values().map(|s| s.failed.len()).sum()
    }

    /// Every failed package name, grouped by ecosystem order.
    pub fn failed_names(&self) -> Vec<&str> {
        self.ecosystems
            .values()
            .flat_map(|s| s.failed.iter().map(String::as_str))
            .collect()
    }
}
