use toml::{Table, Value};

use crate::package::PackageRef;

use super::pyproject::poetry_table;
use super::{ManifestError, ManifestFormat};

/// Parse a Pipfile: package names are the keys of `[packages]` and
/// `[dev-packages]`, with the same value shapes Poetry uses.
pub fn parse(content: &str) -> Result<Vec<PackageRef>, ManifestError> {
    let doc: Table =
        toml::from_str(content).map_err(|e| ManifestError::syntax(ManifestFormat::Pipfile, e))?;

    Ok(["packages", "dev-packages"]
        .iter()
        .filter_map(|section| doc.get(*section).and_then(Value::as_table))
        .flat_map(poetry_table)
        .collect())
}
