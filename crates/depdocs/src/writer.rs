use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::package::PackageRef;
use crate::source::Document;

/// Format of the `Fetched:` header field.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors that can occur while persisting documents. These are fatal for a
/// run: if one document cannot be written, none can.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes fetched documents under an output root.
///
/// Layout:
/// - `root/python/<name>.md`
/// - `root/npm/<name>.md` (scoped names as `@scope__name.md`)
/// - `root/<name>.md` for custom URL fetches
#[derive(Debug, Clone)]
pub struct DocWriter {
    root: PathBuf,
}

impl DocWriter {
    /// Create the output root if needed.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self, WriteError> {
        let root = root.into();
        create_dir(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the document for `package` lives.
    pub fn path_for(&self, package: &PackageRef) -> PathBuf {
        self.root
            .join(package.ecosystem.as_str())
            .join(format!("{}.md", sanitize_file_stem(&package.lookup_name())))
    }

    /// Write a registry document, replacing any earlier copy.
    pub fn write(
        &self,
        package: &PackageRef,
        document: &Document,
        fetched_at: &DateTime<Local>,
    ) -> Result<PathBuf, WriteError> {
        let path = self.path_for(package);
        write_atomically(&path, &render(&package.name, document, fetched_at))?;
        Ok(path)
    }

    /// Write a document fetched from a custom URL under its display name.
    pub fn write_custom(
        &self,
        name: &str,
        document: &Document,
        fetched_at: &DateTime<Local>,
    ) -> Result<PathBuf, WriteError> {
        let path = self.root.join(format!("{}.md", sanitize_file_stem(name)));
        write_atomically(&path, &render(name, document, fetched_at))?;
        Ok(path)
    }
}

/// Render the metadata header followed by the body, verbatim.
pub fn render(name: &str, document: &Document, fetched_at: &DateTime<Local>) -> String {
    format!(
        "---\nPackage: {name}\nVersion: {version}\nSource: {source}\nFetched: {fetched}\n---\n\n{body}",
        version = document.version.as_deref().unwrap_or("unknown"),
        source = document.source_url,
        fetched = fetched_at.format(TIMESTAMP_FORMAT),
        body = document.body,
    )
}

/// Turn a package name into a file stem that is legal on common filesystems.
///
/// `/` becomes `__` so scoped npm names stay readable (`@types/react` →
/// `@types__react`) and never collide with the unscoped tail.
pub fn sanitize_file_stem(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 1);
    for c in name.trim().chars() {
        match c {
            '/' => out.push_str("__"),
            '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => out.push('_'),
            c if c.is_control() => out.push('_'),
            c => out.push(c),
        }
    }
    let trimmed = out.trim_start_matches('.');
    if trimmed.is_empty() {
        "package".to_owned()
    } else {
        trimmed.to_owned()
    }
}

fn create_dir(path: &Path) -> Result<(), WriteError> {
    std::fs::create_dir_all(path).map_err(|source| WriteError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Write to a temp file in the destination directory, then rename it into
/// place, so a failed write never leaves a truncated document.
fn write_atomically(path: &Path, content: &str) -> Result<(), WriteError> {
    let parent = path.parent().unwrap_or(Path::new("."));
    create_dir(parent)?;

    let write_err = |source| WriteError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_err)?;
    tmp.write_all(content.as_bytes()).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
