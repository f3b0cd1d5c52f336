use std::path::Path;

use depdocs::{Ecosystem, EcosystemSummary, Feedback, RunSummary, ScanReport};

/// Print scan feedback to stderr.
pub fn print_feedback(feedback: &[Feedback]) {
    for item in feedback {
        eprintln!("{}", feedback_line(item));
    }
}

/// Print one fetch event: successes to stdout, everything else to stderr.
pub fn print_event(feedback: &Feedback) {
    match feedback {
        Feedback::Fetched { .. } => println!("{}", feedback_line(feedback)),
        _ => eprintln!("{}", feedback_line(feedback)),
    }
}

pub fn feedback_line(feedback: &Feedback) -> String {
    match feedback {
        Feedback::Fetched {
            package,
            source,
            path,
            bytes,
        } => format!(
            "✓ {package}: saved {} ({bytes} {}) from {source}",
            path.display(),
            plural(*bytes, "byte", "bytes")
        ),
        Feedback::Failed { package, reasons } if reasons.is_empty() => {
            format!("✗ {package}: no sources available")
        }
        Feedback::Failed { package, reasons } => {
            format!("✗ {package}: {}", reasons.join("; "))
        }
        Feedback::Skipped { path, reason } => {
            format!("warning: skipped {}: {reason}", path.display())
        }
    }
}

/// One line per ecosystem that has at least one manifest.
pub fn discovered_lines(report: &ScanReport) -> Vec<String> {
    let packages = report.packages();
    let manifests = report.by_ecosystem();

    Ecosystem::all()
        .into_iter()
        .filter_map(|ecosystem| {
            let files = manifests.get(&ecosystem)?;
            Some(format!(
                "Found {} {} {} in {} {}",
                packages.count(ecosystem),
                ecosystem.display_label(),
                plural(packages.count(ecosystem), "package", "packages"),
                files.len(),
                plural(files.len(), "manifest", "manifests"),
            ))
        })
        .collect()
}

/// The end-of-run report, without the trailing output hint.
pub fn summary_lines(summary: &RunSummary) -> Vec<String> {
    let mut lines = vec![
        format!("✓ Successfully fetched: {}", summary.total_fetched()),
        format!("✗ Failed: {}", summary.total_failed()),
    ];

    for ecosystem in Ecosystem::all() {
        if let Some(entry) = summary.get(ecosystem) {
            lines.push(ecosystem_line(ecosystem, entry));
        }
    }

    let failed = summary.failed_names();
    if !failed.is_empty() {
        lines.push(format!("Failed packages: {}", failed.join(", ")));
    }

    lines
}

fn ecosystem_line(ecosystem: Ecosystem, entry: &EcosystemSummary) -> String {
    let mut line = format!(
        "  {}: {}/{}",
        ecosystem.display_label(),
        entry.fetched,
        entry.discovered
    );
    if !entry.by_source.is_empty() {
        let sources: Vec<String> = entry
            .by_source
            .iter()
            .map(|(label, count)| format!("{label} {count}"))
            .collect();
        line.push_str(&format!(" ({})", sources.join(", ")));
    }
    line
}

pub fn output_hint(root: &Path) -> String {
    format!("Documentation saved under {}/", root.display())
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn summary() -> RunSummary {
        let mut ecosystems = BTreeMap::new();
        ecosystems.insert(
            Ecosystem::Python,
            EcosystemSummary {
                discovered: 3,
                fetched: 2,
                failed: vec!["ghost".into()],
                by_source: BTreeMap::from([("GitHub".into(), 1), ("PyPI".into(), 1)]),
            },
        );
        ecosystems.insert(
            Ecosystem::Npm,
            EcosystemSummary {
                discovered: 1,
                fetched: 1,
                failed: Vec::new(),
                by_source: BTreeMap::from([("npm".into(), 1)]),
            },
        );
        RunSummary { ecosystems }
    }

    #[test]
    fn summary_totals_and_breakdown() {
        assert_eq!(
            summary_lines(&summary()),
            vec![
                "✓ Successfully fetched: 3",
                "✗ Failed: 1",
                "  Python: 2/3 (GitHub 1, PyPI 1)",
                "  npm: 1/1 (npm 1)",
                "Failed packages: ghost",
            ]
        );
    }

    #[test]
    fn empty_summary_has_only_totals() {
        assert_eq!(
            summary_lines(&RunSummary::default()),
            vec!["✓ Successfully fetched: 0", "✗ Failed: 0"]
        );
    }

    #[test]
    fn discovered_counts_per_ecosystem() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("requirements.txt"), "flask\nrequests\n").unwrap();
        std::fs::write(
            dir.path().join("package.json"),
            r#"{"dependencies": {"react": "^18"}}"#,
        )
        .unwrap();

        let report = depdocs::scan(dir.path(), &depdocs::ScanOptions::default()).unwrap();
        assert_eq!(
            discovered_lines(&report),
            vec![
                "Found 2 Python packages in 1 manifest",
                "Found 1 npm package in 1 manifest",
            ]
        );
    }

    #[test]
    fn feedback_lines() {
        use std::path::PathBuf;

        use depdocs::PackageRef;

        assert_eq!(
            feedback_line(&Feedback::Fetched {
                package: PackageRef::python("Flask"),
                source: "PyPI".into(),
                path: PathBuf::from(".ai-docs/python/flask.md"),
                bytes: 2048,
            }),
            "✓ Flask: saved .ai-docs/python/flask.md (2048 bytes) from PyPI"
        );
        assert_eq!(
            feedback_line(&Feedback::Failed {
                package: PackageRef::npm("ghost"),
                reasons: vec!["npm: not found".into(), "GitHub: no repository".into()],
            }),
            "✗ ghost: npm: not found; GitHub: no repository"
        );
        assert_eq!(
            feedback_line(&Feedback::Failed {
                package: PackageRef::npm("ghost"),
                reasons: Vec::new(),
            }),
            "✗ ghost: no sources available"
        );
        assert_eq!(
            feedback_line(&Feedback::Skipped {
                path: PathBuf::from("app/Pipfile"),
                reason: "invalid TOML".into(),
            }),
            "warning: skipped app/Pipfile: invalid TOML"
        );
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "file", "files"), "file");
        assert_eq!(plural(0, "file", "files"), "files");
    }
}
