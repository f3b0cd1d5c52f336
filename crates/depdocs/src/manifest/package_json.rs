use std::collections::BTreeMap;

use serde::Deserialize;

use crate::package::PackageRef;

use super::{ManifestError, ManifestFormat};

/// The dependency tables of a `package.json`. Everything else is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson {
    #[serde(default)]
    dependencies: DependencyMap,
    #[serde(default)]
    dev_dependencies: DependencyMap,
    #[serde(default)]
    peer_dependencies: DependencyMap,
    #[serde(default)]
    optional_dependencies: DependencyMap,
}

type DependencyMap = BTreeMap<String, serde_json::Value>;

pub fn parse(content: &str) -> Result<Vec<PackageRef>, ManifestError> {
    let manifest: PackageJson = serde_json::from_str(content)
        .map_err(|e| ManifestError::syntax(ManifestFormat::PackageJson, e))?;

    Ok([
        manifest.dependencies,
        manifest.dev_dependencies,
        manifest.peer_dependencies,
        manifest.optional_dependencies,
    ]
    .into_iter()
    .flatten()
    .filter(|(name, _)| is_valid_name(name))
    .map(|(name, version)| {
        let package = PackageRef::npm(name);
        match version.as_str() {
            Some(v) => package.with_version(v),
            None => package,
        }
    })
    .collect())
}

/// Rejects keys that can never be npm package names.
fn is_valid_name(name: &str) -> bool {
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return false;
    }
    match name.strip_prefix('@') {
        Some(scoped) => match scoped.split_once('/') {
            Some((scope, pkg)) => !scope.is_empty() && !pkg.is_empty() && !pkg.contains('/'),
            None => false,
        },
        None => !name.contains('/'),
    }
}
