use std::sync::LazyLock;

use regex::Regex;

use crate::package::PackageRef;

use super::pep508::parse_requirement;

/// Matches up to and including the opening bracket of a list argument.
static LIST_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:install_requires|tests_require|requires)\s*=\s*[\[(]")
        .expect("list keyword pattern is valid")
});

static EXTRAS_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bextras_require\s*=\s*\{").expect("extras pattern is valid")
});

static STRING_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"'([^'\n]*)'|"([^"\n]*)""#).expect("string literal pattern is valid")
});

/// Scan a `setup.py` for literal dependency lists passed to `setup()`.
///
/// Only literal lists are understood; dependencies computed at runtime
/// (read from a file, built in a loop) are invisible to this parser.
pub fn parse(content: &str) -> Vec<PackageRef> {
    let source = strip_comments(content);
    let mut packages = Vec::new();

    for keyword in LIST_KEYWORD.find_iter(&source) {
        if let Some(body) = bracketed(&source, keyword.end() - 1) {
            packages.extend(string_requirements(body));
        }
    }

    for keyword in EXTRAS_KEYWORD.find_iter(&source) {
        if let Some(body) = bracketed(&source, keyword.end() - 1) {
            for list in inner_lists(body) {
                packages.extend(string_requirements(list));
            }
        }
    }

    packages
}

fn string_requirements(list_body: &str) -> Vec<PackageRef> {
    STRING_LITERAL
        .captures_iter(list_body)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .filter_map(|m| parse_requirement(m.as_str()))
        .collect()
}

/// Tracks whether the scan is inside a Python string literal.
#[derive(Default)]
struct Quotes {
    open: Option<char>,
    escaped: bool,
}

impl Quotes {
    /// Feed one character; returns whether it belongs to a string literal,
    /// delimiters included.
    fn feed(&mut self, ch: char) -> bool {
        match self.open {
            Some(quote) => {
                if self.escaped {
                    self.escaped = false;
                } else if ch == '\\' {
                    self.escaped = true;
                } else if ch == quote {
                    self.open = None;
                }
                true
            }
            None if ch == '\'' || ch == '"' => {
                self.open = Some(ch);
                true
            }
            None => false,
        }
    }
}

/// Text between the bracket at byte `open` and its matching close.
/// Brackets inside string literals (`'requests[socks]'`) do not count.
fn bracketed(source: &str, open: usize) -> Option<&str> {
    let mut quotes = Quotes::default();
    let mut depth = 0usize;

    for (idx, ch) in source[open..].char_indices() {
        if quotes.feed(ch) {
            continue;
        }
        match ch {
            '[' | '(' | '{' => depth += 1,
            ']' | ')' | '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&source[open + 1..open + idx]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Bodies of the lists (or tuples) that appear as values in a dict body.
fn inner_lists(body: &str) -> Vec<&str> {
    let mut lists = Vec::new();
    let mut quotes = Quotes::default();
    let mut resume = 0;

    for (idx, ch) in body.char_indices() {
        if idx < resume || quotes.feed(ch) {
            continue;
        }
        if matches!(ch, '[' | '(')
            && let Some(list) = bracketed(body, idx)
        {
            resume = idx + list.len() + 2;
            lists.push(list);
        }
    }
    lists
}

fn strip_comments(content: &str) -> String {
    content.lines().map(strip_comment).collect::<Vec<_>>().join("\n")
}

fn strip_comment(line: &str) -> &str {
    let mut quotes = Quotes::default();
    for (idx, ch) in line.char_indices() {
        if !quotes.feed(ch) && ch == '#' {
            return &line[..idx];
        }
    }
    line
}
