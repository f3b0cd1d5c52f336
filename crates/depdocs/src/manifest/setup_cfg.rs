use std::collections::HashMap;

use crate::package::PackageRef;

use super::pep508::parse_requirement;

/// Parse `setup.cfg`: `[options] install_requires` / `tests_require` and
/// every key of `[options.extras_require]`.
pub fn parse(content: &str) -> Vec<PackageRef> {
    let sections = read_sections(content);
    let mut packages = Vec::new();

    if let Some(options) = sections.get("options") {
        for key in ["install_requires", "tests_require"] {
            if let Some(value) = options.get(key) {
                packages.extend(requirement_values(value));
            }
        }
    }

    if let Some(extras) = sections.get("options.extras_require") {
        for value in extras.values() {
            packages.extend(requirement_values(value));
        }
    }

    packages
}

/// Values are either one requirement per line or `;`-separated on one line.
fn requirement_values(value: &str) -> Vec<PackageRef> {
    let entries: Vec<&str> = if value.contains('\n') {
        value.lines().collect()
    } else {
        value.split(';').collect()
    };

    entries
        .into_iter()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(parse_requirement)
        .collect()
}

type Section = HashMap<String, String>;

/// Read the subset of INI syntax setuptools uses: `[section]` headers,
/// `key = value` or `key: value` pairs, and indented continuation lines.
fn read_sections(content: &str) -> HashMap<String, Section> {
    let mut sections: HashMap<String, Section> = HashMap::new();
    let mut section: Option<String> = None;
    let mut key: Option<String> = None;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }
        if trimmed.is_empty() {
            continue;
        }

        let indented = line.starts_with([' ', '\t']);

        if indented {
            if let (Some(s), Some(k)) = (&section, &key)
                && let Some(value) = sections.get_mut(s).and_then(|sec| sec.get_mut(k))
            {
                value.push('\n');
                value.push_str(trimmed);
            }
            continue;
        }

        if let Some(name) = trimmed.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            let name = name.trim().to_owned();
            sections.entry(name.clone()).or_default();
            section = Some(name);
            key = None;
            continue;
        }

        let Some(current) = &section else {
            continue;
        };
        let Some(split) = trimmed.find(['=', ':']) else {
            key = None;
            continue;
        };
        let k = trimmed[..split].trim().to_lowercase();
        let v = trimmed[split + 1..].trim().to_owned();
        if let Some(sec) = sections.get_mut(current) {
            sec.insert(k.clone(), v);
        }
        key = Some(k);
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(content: &str) -> Vec<String> {
        let mut names: Vec<String> = parse(content).into_iter().map(|p| p.name).collect();
        names.sort();
        names
    }

    #[test]
    fn multiline_install_requires() {
        let content = "\
[metadata]
name = demo

[options]
packages = find:
install_requires =
    attrs>=22
    # pinned for compatibility
    cattrs
    ===broken===
python_requires = >=3.9
";
        assert_eq!(names(content), vec!["attrs", "cattrs"]);
    }

    #[test]
    fn extras_require_section() {
        let content = "\
[options]
install_requires = requests; tqdm

[options.extras_require]
test =
    pytest
    pytest-cov
docs = sphinx
";
        assert_eq!(
            names(content),
            vec!["pytest", "pytest-cov", "requests", "sphinx", "tqdm"]
        );
    }

    #[test]
    fn missing_options_section() {
        assert!(parse("[metadata]\nname = demo\n").is_empty());
    }

    #[test]
    fn colon_separator() {
        let content = "[options]\ninstall_requires:\n    six\n";
        assert_eq!(names(content), vec!["six"]);
    }
}
