use std::path::PathBuf;

use crate::package::PackageRef;

/// Per-item events from scans and fetch runs.
///
/// The library reports what happened; rendering is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    /// A package's document was written to disk.
    Fetched {
        package: PackageRef,
        /// Label of the source that produced the document.
        source: String,
        path: PathBuf,
        bytes: usize,
    },
    /// Every source in the package's chain failed.
    Failed {
        package: PackageRef,
        /// One entry per source tried, in chain order.
        reasons: Vec<String>,
    },
    /// A manifest or directory entry was passed over during a scan.
    Skipped { path: PathBuf, reason: String },
}

impl Feedback {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn package(&self) -> Option<&PackageRef> {
        match self {
            Self::Fetched { package, .. } | Self::Failed { package, .. } => Some(package),
            Self::Skipped { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_events_carry_their_package() {
        let fetched = Feedback::Fetched {
            package: PackageRef::python("flask"),
            source: "PyPI".into(),
            path: PathBuf::from(".ai-docs/python/flask.md"),
            bytes: 120,
        };
        let failed = Feedback::Failed {
            package: PackageRef::npm("ghost"),
            reasons: vec!["npm: not found".into()],
        };
        let skipped = Feedback::Skipped {
            path: PathBuf::from("Pipfile"),
            reason: "invalid TOML".into(),
        };

        assert_eq!(fetched.package().map(|p| p.name.as_str()), Some("flask"));
        assert!(!fetched.is_failure());
        assert!(failed.is_failure());
        assert_eq!(skipped.package(), None);
    }
}
