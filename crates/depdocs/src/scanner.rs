use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::feedback::Feedback;
use crate::manifest::{Manifest, ManifestFormat};
use crate::package::{Ecosystem, PackageSet};

/// Directories that never contain first-party manifests worth scanning.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    ".venv",
    "venv",
    "env",
    ".env",
    "node_modules",
    ".git",
    "__pycache__",
    "build",
    "dist",
    ".tox",
    ".pytest_cache",
    ".mypy_cache",
    "site-packages",
];

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("scan root is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// How far and where the scanner walks.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub recursive: bool,
    /// Deepest directory level to visit; 0 is the root itself.
    /// `None` means unbounded (when `recursive` is set).
    pub max_depth: Option<usize>,
    pub exclude_dirs: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            max_depth: None,
            exclude_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|d| (*d).to_owned()).collect(),
        }
    }
}

impl ScanOptions {
    /// Directory depth limit after folding in `recursive`.
    pub fn effective_max_depth(&self) -> Option<usize> {
        if self.recursive { self.max_depth } else { Some(0) }
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.exclude_dirs.iter().any(|d| d == name))
    }
}

/// Everything a scan found, in path order.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub manifests: Vec<Manifest>,
    pub feedback: Vec<Feedback>,
}

impl ScanReport {
    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }

    /// Manifests grouped by the ecosystem they declare packages for.
    pub fn by_ecosystem(&self) -> BTreeMap<Ecosystem, Vec<&Manifest>> {
        let mut groups: BTreeMap<Ecosystem, Vec<&Manifest>> = BTreeMap::new();
        for manifest in &self.manifests {
            groups.entry(manifest.ecosystem()).or_default().push(manifest);
        }
        groups
    }

    /// All declared packages, de-duplicated per ecosystem.
    pub fn packages(&self) -> PackageSet {
        self.manifests
            .iter()
            .flat_map(|m| m.packages.iter().cloned())
            .collect()
    }
}

/// Walk `root` and parse every recognized manifest.
///
/// Symlinked directories are not followed. Unreadable entries and manifests
/// that fail to parse are reported as warnings and skipped.
pub fn scan(root: &Path, options: &ScanOptions) -> Result<ScanReport, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut walker = WalkDir::new(root).follow_links(false).sort_by_file_name();
    // Files sit one level below the directory that contains them.
    if let Some(depth) = options.effective_max_depth() {
        walker = walker.max_depth(depth + 1);
    }

    let mut report = ScanReport::default();

    for entry in walker.into_iter().filter_entry(|e| !options.is_excluded(e)) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                report.feedback.push(Feedback::Skipped {
                    path: e.path().unwrap_or(root).to_path_buf(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if entry.file_type().is_dir() || !entry.path().is_file() {
            continue;
        }
        let Some(format) = ManifestFormat::from_path(entry.path()) else {
            continue;
        };

        match Manifest::load_as(entry.path(), format) {
            Ok(manifest) => {
                tracing::debug!(
                    path = %manifest.path.display(),
                    packages = manifest.packages.len(),
                    "parsed manifest"
                );
                report.manifests.push(manifest);
            }
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "skipping manifest");
                report.feedback.push(Feedback::Skipped {
                    path: entry.path().to_path_buf(),
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}
