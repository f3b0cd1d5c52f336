pub mod chain;
pub mod feedback;
pub mod manifest;
pub mod package;
pub mod pipeline;
pub mod scanner;
pub mod source;
pub mod summary;
pub mod writer;

pub use chain::{ChainExhausted, FailedAttempt, SourceChain};
pub use feedback::Feedback;
pub use manifest::{Manifest, ManifestError, ManifestFormat};
pub use package::{Ecosystem, PackageKey, PackageRef, PackageSet};
pub use pipeline::{DEFAULT_CONCURRENCY, FetchOutcome, FetchPipeline, FetchResult};
pub use scanner::{DEFAULT_EXCLUDED_DIRS, ScanError, ScanOptions, ScanReport, scan};
pub use source::{Document, Hints, Source, SourceError};
pub use summary::{EcosystemSummary, RunSummary};
pub use writer::{DocWriter, WriteError, sanitize_file_stem};

#[cfg(test)]
mod test_support;
