//! Minimal PEP 508 requirement parsing: enough to recover the project name
//! and the version specifier, ignoring extras and environment markers.

use std::sync::LazyLock;

use regex::Regex;

use crate::package::PackageRef;

static REQUIREMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?)\s*(?:\[[^\]]*\])?\s*(.*)$")
        .expect("requirement pattern is valid")
});

/// Parse a single requirement string such as `requests[socks]>=2.0; python_version>"3"`.
///
/// Returns `None` for anything that does not start with a valid project
/// name followed by a version specifier, marker, or direct reference.
pub fn parse_requirement(requirement: &str) -> Option<PackageRef> {
    let requirement = requirement.trim();
    let captures = REQUIREMENT.captures(requirement)?;
    let name = captures.get(1)?.as_str();
    let rest = captures.get(2).map(|m| m.as_str()).unwrap_or("");

    let constraint = rest.split(';').next().unwrap_or("").trim();

    let package = PackageRef::python(name);
    if constraint.is_empty() {
        return Some(package);
    }
    if constraint.starts_with('@') {
        // Direct reference (`name @ https://...`): no usable version.
        return Some(package);
    }
    if constraint.starts_with(['=', '<', '>', '!', '~', '(']) {
        let version = constraint
            .trim_start_matches('(')
            .trim_end_matches(')')
            .trim();
        return Some(package.with_version(version));
    }
    None
}
