use std::path::Path;

use depdocs::{Ecosystem, Manifest, ManifestFormat, ScanOptions, scan};

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn names(manifest: &Manifest) -> Vec<String> {
    let mut names: Vec<String> = manifest.packages.iter().map(|p| p.name.clone()).collect();
    names.sort();
    names
}

// Each fixture declares three valid dependencies alongside unparsable entries.
#[test]
fn every_format_skips_unparsable_entries() {
    let cases = [
        ("requirements.txt", vec!["SQLAlchemy", "flask", "requests"]),
        ("pyproject.toml", vec!["httpx", "pydantic", "pytest"]),
        ("setup.py", vec!["black", "click", "jinja2"]),
        ("setup.cfg", vec!["attrs", "cattrs", "rich"]),
        ("Pipfile", vec!["django", "pytest", "requests"]),
        ("environment.yml", vec!["datasets", "tokenizers", "transformers"]),
        ("package.json", vec!["axios", "react", "vite"]),
    ];

    for (file, expected) in cases {
        let manifest = Manifest::load(&fixture(file)).unwrap();
        assert_eq!(names(&manifest), expected, "unexpected packages from {file}");
    }
}

#[test]
fn formats_map_to_ecosystems() {
    let npm = Manifest::load(&fixture("package.json")).unwrap();
    assert_eq!(npm.format, ManifestFormat::PackageJson);
    assert_eq!(npm.ecosystem(), Ecosystem::Npm);

    let python = Manifest::load(&fixture("Pipfile")).unwrap();
    assert_eq!(python.ecosystem(), Ecosystem::Python);
}

#[test]
fn fixture_tree_dedups_across_manifests() {
    let report = scan(&fixture(""), &ScanOptions::default()).unwrap();
    assert_eq!(report.manifests.len(), 7);
    assert!(report.feedback.is_empty());

    let packages = report.packages();
    // `requests` appears in requirements.txt and Pipfile, `pytest` in
    // pyproject.toml and Pipfile.
    assert_eq!(packages.count(Ecosystem::Python), 16);
    assert_eq!(packages.count(Ecosystem::Npm), 3);
}

#[test]
fn requirements_and_pyproject_share_one_entry() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("requirements.txt"), "Flask==3.0.0\n").unwrap();
    std::fs::write(
        dir.path().join("pyproject.toml"),
        "[project]\ndependencies = [\"flask>=3\"]\n",
    )
    .unwrap();

    let packages = scan(dir.path(), &ScanOptions::default()).unwrap().packages();
    let python: Vec<_> = packages.in_ecosystem(Ecosystem::Python).collect();
    assert_eq!(python.len(), 1);
    assert_eq!(python[0].lookup_name(), "flask");
}
