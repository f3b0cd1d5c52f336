use serde_yaml_ng::Value;

use crate::package::PackageRef;

use super::pep508::parse_requirement;
use super::{ManifestError, ManifestFormat};

/// Parse a conda `environment.yml`, extracting the `pip:` sub-list.
///
/// Conda-channel entries (`numpy=1.26`, `python=3.11`) are not PyPI names
/// and are ignored.
pub fn parse(content: &str) -> Result<Vec<PackageRef>, ManifestError> {
    let doc: Value = serde_yaml_ng::from_str(content)
        .map_err(|e| ManifestError::syntax(ManifestFormat::Environment, e))?;

    let Some(dependencies) = doc.get("dependencies").and_then(Value::as_sequence) else {
        return Ok(Vec::new());
    };

    Ok(dependencies
        .iter()
        .filter_map(|entry| entry.get("pip").and_then(Value::as_sequence))
        .flatten()
        .filter_map(Value::as_str)
        .filter(|entry| !entry.trim_start().starts_with('-'))
        .filter_map(parse_requirement)
        .collect())
}
