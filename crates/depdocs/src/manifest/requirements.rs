use crate::package::PackageRef;

use super::pep508::parse_requirement;

/// Parse a pip requirements file.
///
/// Option lines (`-r`, `-e`, `--hash`, ...), comments and bare URLs are
/// skipped, and backslash continuations are joined before parsing.
pub fn parse(content: &str) -> Vec<PackageRef> {
    logical_lines(content)
        .iter()
        .filter_map(|line| {
            let line = strip_comment(line).trim();
            if line.is_empty() || line.starts_with('-') {
                return None;
            }
            // Per-requirement options such as `--hash=...` trail the specifier.
            let requirement = line.split(" --").next().unwrap_or(line);
            parse_requirement(requirement)
        })
        .collect()
}

fn logical_lines(content: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for raw in content.lines() {
        match raw.trim_end().strip_suffix('\\') {
            Some(continued) => {
                current.push_str(continued);
                current.push(' ');
            }
            None => {
                current.push_str(raw);
                lines.push(std::mem::take(&mut current));
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// A `#` starts a comment at the line start or after whitespace.
fn strip_comment(line: &str) -> &str {
    if line.trim_start().starts_with('#') {
        return "";
    }
    match line.find(" #").or_else(|| line.find("\t#")) {
        Some(idx) => &line[..idx],
        None => line,
    }
}
