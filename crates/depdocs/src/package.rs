use std::collections::BTreeMap;
use std::fmt;

/// A package-distribution universe with its own manifests and registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Ecosystem {
    Python,
    Npm,
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Ecosystem {
    /// Tag used for output subdirectories and summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Npm => "npm",
        }
    }

    /// All ecosystems in display order.
    pub fn all() -> [Ecosystem; 2] {
        [Self::Python, Self::Npm]
    }

    /// Human-readable label for display.
    pub fn display_label(&self) -> &'static str {
        match self {
            Self::Python => "Python",
            Self::Npm => "npm",
        }
    }

    /// Canonical form of a package name for de-duplication.
    ///
    /// Python follows PEP 503: lowercase, with runs of `-`, `_` and `.`
    /// collapsed to a single `-`. npm names are lowercased.
    pub fn normalize(&self, name: &str) -> String {
        match self {
            Self::Python => {
                let mut out = String::with_capacity(name.len());
                let mut in_separator = false;
                for c in name.trim().chars() {
                    if matches!(c, '-' | '_' | '.') {
                        if !in_separator {
                            out.push('-');
                        }
                        in_separator = true;
                    } else {
                        out.extend(c.to_lowercase());
                        in_separator = false;
                    }
                }
                out
            }
            Self::Npm => name.trim().to_lowercase(),
        }
    }
}

/// Identity of a package: ecosystem plus normalized name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageKey {
    pub ecosystem: Ecosystem,
    pub name: String,
}

impl fmt::Display for PackageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ecosystem, self.name)
    }
}

/// A dependency declared in a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRef {
    pub ecosystem: Ecosystem,
    /// Name as declared (original spelling).
    pub name: String,
    /// Version constraint as declared, if any.
    pub version: Option<String>,
}

impl PackageRef {
    pub fn new(ecosystem: Ecosystem, name: impl Into<String>) -> Self {
        Self {
            ecosystem,
            name: name.into(),
            version: None,
        }
    }

    pub fn python(name: impl Into<String>) -> Self {
        Self::new(Ecosystem::Python, name)
    }

    pub fn npm(name: impl Into<String>) -> Self {
        Self::new(Ecosystem::Npm, name)
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        let version = version.into();
        let trimmed = version.trim();
        self.version = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_owned())
        };
        self
    }

    pub fn key(&self) -> PackageKey {
        PackageKey {
            ecosystem: self.ecosystem,
            name: self.ecosystem.normalize(&self.name),
        }
    }

    /// Normalized name: the PyPI lookup key and the output file stem.
    pub fn lookup_name(&self) -> String {
        self.key().name
    }
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// De-duplicated packages across every manifest in a run.
///
/// The first declared spelling of a package wins; a later declaration only
/// contributes its version hint when the first one had none.
#[derive(Debug, Clone, Default)]
pub struct PackageSet {
    packages: BTreeMap<PackageKey, PackageRef>,
}

impl PackageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a package, returning `true` if its identity was not yet present.
    pub fn insert(&mut self, package: PackageRef) -> bool {
        let key = package.key();
        if key.name.is_empty() {
            return false;
        }
        match self.packages.get_mut(&key) {
            Some(existing) => {
                if existing.version.is_none() {
                    existing.version = package.version;
                }
                false
            }
            None => {
                self.packages.insert(key, package);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn count(&self, ecosystem: Ecosystem) -> usize {
        self.packages
            .keys()
            .filter(|k| k.ecosystem == ecosystem)
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PackageRef> {
        self.packages.values()
    }

    pub fn in_ecosystem(&self, ecosystem: Ecosystem) -> impl Iterator<Item = &PackageRef> {
        self.packages
            .iter()
            .filter(move |(k, _)| k.ecosystem == ecosystem)
            .map(|(_, p)| p)
    }

    pub fn into_vec(self) -> Vec<PackageRef> {
        self.packages.into_values().collect()
    }
}

impl Extend<PackageRef> for PackageSet {
    fn extend<T: IntoIterator<Item = PackageRef>>(&mut self, iter: T) {
        for package in iter {
            self.insert(package);
        }
    }
}

impl FromIterator<PackageRef> for PackageSet {
    fn from_iter<T: IntoIterator<Item = PackageRef>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}
