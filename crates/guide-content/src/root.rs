//! Content root sandbox.
//!
//! [`ContentRoot`] is the only place a [`ResolvedPath`] can be created. A
//! resolved path is canonical (symlinks, `.` and `..` resolved) and is a
//! strict descendant of the canonical root.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::{ContentError, DocumentId};

/// Canonicalize `candidate` and return it if it is a regular file strictly
/// inside `canonical_root`.
///
/// Containment is checked component-wise, so a sibling such as `root-evil/`
/// never matches `root/`. The root itself is not a descendant of itself.
pub fn contained_file(candidate: &Path, canonical_root: &Path) -> Option<PathBuf> {
    let canonical = candidate.canonicalize().ok()?;

    if canonical == canonical_root || !canonical.starts_with(canonical_root) {
        return None;
    }
    if !canonical.is_file() {
        return None;
    }

    Some(canonical)
}

/// An absolute, canonical path proven to reside under a [`ContentRoot`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolvedPath(PathBuf);

impl ResolvedPath {
    /// The canonical filesystem path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Directory containing the document.
    #[must_use]
    pub fn parent(&self) -> &Path {
        self.0.parent().unwrap_or(&self.0)
    }
}

/// Fixed base directory under which all resolvable documents live.
#[derive(Clone, Debug)]
pub struct ContentRoot {
    canonical: PathBuf,
}

impl ContentRoot {
    /// Canonicalize the content root.
    ///
    /// Returns [`ContentError::Config`] if the directory does not exist.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, ContentError> {
        let dir = dir.as_ref();
        let canonical = dir
            .canonicalize()
            .map_err(|_| ContentError::Config(dir.to_path_buf()))?;
        if !canonical.is_dir() {
            return Err(ContentError::Config(dir.to_path_buf()));
        }
        Ok(Self { canonical })
    }

    /// Canonical root directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.canonical
    }

    /// Map a validated identifier to a readable file inside the root.
    ///
    /// Missing files, files outside the root (through symlinks or otherwise),
    /// directories and unreadable files all yield [`ContentError::NotFound`].
    pub fn resolve(&self, id: &DocumentId) -> Result<ResolvedPath, ContentError> {
        let not_found = || ContentError::NotFound(id.to_string());

        let canonical = contained_file(&self.canonical.join(id.as_str()), &self.canonical)
            .ok_or_else(not_found)?;

        // Readability is checked by opening; metadata alone can't tell.
        File::open(&canonical).map_err(|_| not_found())?;

        Ok(ResolvedPath(canonical))
    }
}
