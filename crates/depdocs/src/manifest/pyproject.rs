use toml::{Table, Value};

use crate::package::PackageRef;

use super::pep508::parse_requirement;
use super::{ManifestError, ManifestFormat};

/// Parse `pyproject.toml`, covering PEP 621 (`[project]`), PEP 735
/// (`[dependency-groups]`) and Poetry's `[tool.poetry]` tables.
pub fn parse(content: &str) -> Result<Vec<PackageRef>, ManifestError> {
    let doc: Table = toml::from_str(content)
        .map_err(|e| ManifestError::syntax(ManifestFormat::Pyproject, e))?;

    let mut packages = Vec::new();

    if let Some(project) = doc.get("project").and_then(Value::as_table) {
        if let Some(deps) = project.get("dependencies") {
            packages.extend(requirement_list(deps));
        }
        if let Some(optional) = project.get("optional-dependencies").and_then(Value::as_table) {
            for group in optional.values() {
                packages.extend(requirement_list(group));
            }
        }
    }

    if let Some(groups) = doc.get("dependency-groups").and_then(Value::as_table) {
        for group in groups.values() {
            packages.extend(requirement_list(group));
        }
    }

    if let Some(poetry) = doc
        .get("tool")
        .and_then(|t| t.get("poetry"))
        .and_then(Value::as_table)
    {
        for key in ["dependencies", "dev-dependencies"] {
            if let Some(table) = poetry.get(key).and_then(Value::as_table) {
                packages.extend(poetry_table(table));
            }
        }
        if let Some(groups) = poetry.get("group").and_then(Value::as_table) {
            for group in groups.values() {
                if let Some(table) = group.get("dependencies").and_then(Value::as_table) {
                    packages.extend(poetry_table(table));
                }
            }
        }
    }

    Ok(packages)
}

/// An array of PEP 508 strings. Non-string entries (e.g. `{include-group = ...}`)
/// are skipped.
fn requirement_list(value: &Value) -> Vec<PackageRef> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .filter_map(parse_requirement)
                .collect()
        })
        .unwrap_or_default()
}

/// A Poetry-style `name = "constraint"` / `name = { version = "..." }` table.
pub(super) fn poetry_table(table: &Table) -> Vec<PackageRef> {
    table
        .iter()
        .filter(|(name, _)| !name.eq_ignore_ascii_case("python"))
        .filter_map(|(name, value)| {
            let package = parse_requirement(name)?;
            if package.name != name.trim() {
                return None;
            }
            Some(match version_hint(value) {
                Some(version) => package.with_version(version),
                None => package,
            })
        })
        .collect()
}

fn version_hint(value: &Value) -> Option<String> {
    let version = match value {
        Value::String(s) => s.as_str(),
        Value::Table(t) => t.get("version").and_then(Value::as_str)?,
        _ => return None,
    };
    (version != "*").then(|| version.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(content: &str) -> Vec<String> {
        let mut names: Vec<String> = parse(content).unwrap().into_iter().map(|p| p.name).collect();
        names.sort();
        names
    }

    #[test]
    fn project_dependencies() {
        let content = r#"
[project]
name = "demo"
dependencies = [
    "httpx>=0.27",
    "pydantic[email]>=2",
    "not a valid requirement",
]
"#;
        assert_eq!(names(content), vec!["httpx", "pydantic"]);
    }

    #[test]
    fn optional_dependencies_and_groups() {
        let content = r#"
[project]
dependencies = ["rich"]

[project.optional-dependencies]
test = ["pytest>=8", "coverage"]
docs = ["mkdocs"]

[dependency-groups]
lint = ["ruff", { include-group = "test" }]
"#;
        assert_eq!(
            names(content),
            vec!["coverage", "mkdocs", "pytest", "rich", "ruff"]
        );
    }

    #[test]
    fn poetry_dependencies_skip_python() {
        let content = r#"
[tool.poetry.dependencies]
python = "^3.10"
fastapi = "^0.110"
uvicorn = { version = "^0.29", extras = ["standard"] }
local-lib = { path = "../lib" }

[tool.poetry.dev-dependencies]
black = "*"

[tool.poetry.group.test.dependencies]
pytest = "^8"
"#;
        let packages = parse(content).unwrap();
        let mut names: Vec<&str> = packages.iter().map(|p| p.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["black", "fastapi", "local-lib", "pytest", "uvicorn"]);

        let uvicorn = packages.iter().find(|p| p.name == "uvicorn").unwrap();
        assert_eq!(uvicorn.version.as_deref(), Some("^0.29"));
        let black = packages.iter().find(|p| p.name == "black").unwrap();
        assert_eq!(black.version, None);
    }

    #[test]
    fn no_dependency_tables() {
        assert!(names("[build-system]\nrequires = [\"hatchling\"]\n").is_empty());
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let result = parse("[project\ndependencies = [");
        assert!(matches!(result, Err(ManifestError::Syntax { .. })));
    }
}
