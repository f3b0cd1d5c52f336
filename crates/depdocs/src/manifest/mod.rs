//! Dependency manifest parsers.
//!
//! Each supported format maps to one parser function taking the file
//! content and returning the declared packages. Entries that cannot be
//! understood are skipped; only a file that fails to parse as a whole
//! (invalid TOML, JSON or YAML) produces a [`ManifestError`].

mod environment;
mod package_json;
pub mod pep508;
mod pipfile;
mod pyproject;
mod requirements;
mod setup_cfg;
mod setup_py;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::package::{Ecosystem, PackageRef};

/// Errors that make a whole manifest unreadable.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {format}: {message}")]
    Syntax {
        format: ManifestFormat,
        message: String,
    },

    #[error("unrecognized manifest file name: {0}")]
    Unrecognized(PathBuf),
}

impl ManifestError {
    pub(crate) fn syntax(format: ManifestFormat, message: impl fmt::Display) -> Self {
        Self::Syntax {
            format,
            message: message.to_string(),
        }
    }
}

/// A recognized manifest format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestFormat {
    Requirements,
    Pyproject,
    SetupPy,
    SetupCfg,
    Pipfile,
    Environment,
    PackageJson,
}

impl fmt::Display for ManifestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Requirements => "requirements.txt",
            Self::Pyproject => "pyproject.toml",
            Self::SetupPy => "setup.py",
            Self::SetupCfg => "setup.cfg",
            Self::Pipfile => "Pipfile",
            Self::Environment => "environment.yml",
            Self::PackageJson => "package.json",
        };
        f.write_str(name)
    }
}

impl ManifestFormat {
    /// Detect the format from a bare file name.
    ///
    /// Besides the canonical names this accepts `requirements-*.txt`,
    /// `requirements_*.txt` and `environment.yaml`.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        match file_name {
            "requirements.txt" => Some(Self::Requirements),
            "pyproject.toml" => Some(Self::Pyproject),
            "setup.py" => Some(Self::SetupPy),
            "setup.cfg" => Some(Self::SetupCfg),
            "Pipfile" => Some(Self::Pipfile),
            "environment.yml" | "environment.yaml" => Some(Self::Environment),
            "package.json" => Some(Self::PackageJson),
            other => {
                let stem = other.strip_suffix(".txt")?;
                let variant = stem.strip_prefix("requirements")?;
                (variant.starts_with('-') || variant.starts_with('_'))
                    .then_some(Self::Requirements)
            }
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_name()
            .and_then(|n| n.to_str())
            .and_then(Self::from_file_name)
    }

    pub fn ecosystem(&self) -> Ecosystem {
        match self {
            Self::PackageJson => Ecosystem::Npm,
            _ => Ecosystem::Python,
        }
    }

    /// Extract the declared packages from file content.
    pub fn parse(&self, content: &str) -> Result<Vec<PackageRef>, ManifestError> {
        match self {
            Self::Requirements => Ok(requirements::parse(content)),
            Self::Pyproject => pyproject::parse(content),
            Self::SetupPy => Ok(setup_py::parse(content)),
            Self::SetupCfg => Ok(setup_cfg::parse(content)),
            Self::Pipfile => pipfile::parse(content),
            Self::Environment => environment::parse(content),
            Self::PackageJson => package_json::parse(content),
        }
    }
}

/// A manifest discovered on disk together with what it declares.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub path: PathBuf,
    pub format: ManifestFormat,
    pub packages: Vec<PackageRef>,
}

impl Manifest {
    /// Read and parse the manifest at `path`, detecting its format from the
    /// file name.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let format = ManifestFormat::from_path(path)
            .ok_or_else(|| ManifestError::Unrecognized(path.to_path_buf()))?;
        Self::load_as(path, format)
    }

    /// Read and parse the manifest at `path` as the given format.
    pub fn load_as(path: &Path, format: ManifestFormat) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let packages = format.parse(&content)?;
        Ok(Self {
            path: path.to_path_buf(),
            format,
            packages,
        })
    }

    pub fn ecosystem(&self) -> Ecosystem {
        self.format.ecosystem()
    }
}
