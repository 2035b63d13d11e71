//! File emission with per-artifact write policies.
//!
//! Regenerated artifacts are overwritten on every run. Stubs are write-once:
//! an existing stub is the one piece of on-disk state the generator respects,
//! because a human may have replaced the placeholder body.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// How an artifact treats an existing file at its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritePolicy {
    /// Replace any existing file.
    Overwrite,
    /// Create the file only if nothing exists at the path.
    WriteOnce,
}

/// Result of emitting one artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmitOutcome {
    /// File was (re)written under [`WritePolicy::Overwrite`].
    Written,
    /// File did not exist and was created under [`WritePolicy::WriteOnce`].
    Created,
    /// File already existed and was left untouched.
    Preserved,
}

/// Filesystem failures while emitting artifacts.
#[derive(Debug, Error)]
pub enum EmitError {
    /// Output directory could not be created.
    #[error("failed to create directory '{}': {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Output file could not be written.
    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl EmitError {
    /// Path the failed operation targeted.
    pub fn path(&self) -> &Path {
        match self {
            Self::CreateDir { path, .. } | Self::Write { path, .. } => path,
        }
    }
}

/// Writes rendered artifacts to disk.
///
/// # Examples
///
/// ```
/// use vkmock_codegen::{EmitOutcome, Emitter, WritePolicy};
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("vkFoo_default.cpp");
/// let emitter = Emitter::new(false);
///
/// assert_eq!(emitter.emit(&path, "first", WritePolicy::WriteOnce).unwrap(), EmitOutcome::Created);
/// assert_eq!(emitter.emit(&path, "second", WritePolicy::WriteOnce).unwrap(), EmitOutcome::Preserved);
/// assert_eq!(std::fs::read_to_string(&path).unwrap(), "first");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Emitter {
    create_dirs: bool,
}

impl Emitter {
    /// Creates an emitter. With `create_dirs`, [`prepare`](Self::prepare)
    /// creates missing output directories; otherwise a missing directory
    /// surfaces as a write error.
    pub fn new(create_dirs: bool) -> Self {
        Self { create_dirs }
    }

    /// Creates the given output directories when directory creation is
    /// enabled. No-op otherwise.
    pub fn prepare<'a>(&self, dirs: impl IntoIterator<Item = &'a Path>) -> Result<(), EmitError> {
        if !self.create_dirs {
            return Ok(());
        }
        for dir in dirs {
            fs::create_dir_all(dir).map_err(|source| EmitError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    /// Emits `content` to `path` under `policy`.
    ///
    /// For [`WritePolicy::WriteOnce`] the existence check and creation are a
    /// single `create_new` open, so concurrent emitters cannot both create the
    /// same stub.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError::Write`] for any I/O failure other than the
    /// write-once target already existing.
    pub fn emit(
        &self,
        path: &Path,
        content: &str,
        policy: WritePolicy,
    ) -> Result<EmitOutcome, EmitError> {
        let write_err = |source: io::Error| EmitError::Write {
            path: path.to_path_buf(),
            source,
        };

        match policy {
            WritePolicy::Overwrite => {
                fs::write(path, content).map_err(write_err)?;
                debug!(path = %path.display(), "Wrote artifact");
                Ok(EmitOutcome::Written)
            }
            WritePolicy::WriteOnce => {
                let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
                    Ok(file) => file,
                    Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                        debug!(path = %path.display(), "Keeping existing stub");
                        return Ok(EmitOutcome::Preserved);
                    }
                    Err(err) => return Err(write_err(err)),
                };
                if let Err(err) = file.write_all(content.as_bytes()) {
                    // A truncated stub would otherwise be preserved forever.
                    drop(file);
                    discard_partial_stub(path);
                    return Err(write_err(err));
                }
                debug!(path = %path.display(), "Created stub");
                Ok(EmitOutcome::Created)
            }
        }
    }
}

/// Removes a stub whose creation failed midway. Returns `true` when the file
/// is gone.
fn discard_partial_stub(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(err) => {
            debug!(
                path = %path.display(),
                error = %err,
                "Failed to remove partially written stub"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discard_partial_stub() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vkFoo_default.cpp");
        fs::write(&path, "// trunc").unwrap();

        assert!(discard_partial_stub(&path));
        assert!(!path.exists());
        assert!(!discard_partial_stub(&path));
    }

    #[test]
    fn test_overwrite_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vkFoo.cpp");
        let emitter = Emitter::default();

        assert_eq!(
            emitter.emit(&path, "one", WritePolicy::Overwrite).unwrap(),
            EmitOutcome::Written
        );
        assert_eq!(
            emitter.emit(&path, "two", WritePolicy::Overwrite).unwrap(),
            EmitOutcome::Written
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");
    }

    #[test]
    fn test_write_once_preserves_hand_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vkFoo_default.cpp");
        fs::write(&path, "hand written").unwrap();

        let outcome = Emitter::default()
            .emit(&path, "generated", WritePolicy::WriteOnce)
            .unwrap();
        assert_eq!(outcome, EmitOutcome::Preserved);
        assert_eq!(fs::read_to_string(&path).unwrap(), "hand written");
    }

    #[test]
    fn test_missing_directory_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("vkFoo.cpp");

        let err = Emitter::default()
            .emit(&path, "x", WritePolicy::Overwrite)
            .unwrap_err();
        assert!(matches!(err, EmitError::Write { .. }));
        assert_eq!(err.path(), path.as_path());

        let err = Emitter::default()
            .emit(&path, "x", WritePolicy::WriteOnce)
            .unwrap_err();
        assert!(matches!(err, EmitError::Write { .. }));
    }

    #[test]
    fn test_prepare_respects_create_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        Emitter::new(false).prepare([nested.as_path()]).unwrap();
        assert!(!nested.exists());

        Emitter::new(true).prepare([nested.as_path()]).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_prepare_reports_blocked_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        let nested = blocker.join("sub");

        let err = Emitter::new(true).prepare([nested.as_path()]).unwrap_err();
        assert!(matches!(err, EmitError::CreateDir { .. }));
    }

    #[test]
    fn test_concurrent_write_once_creates_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vkRace_default.cpp");
        let emitter = Emitter::default();

        let outcomes: Vec<EmitOutcome> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let path = &path;
                    scope.spawn(move || {
                        emitter
                            .emit(path, &format!("worker {i}"), WritePolicy::WriteOnce)
                            .unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let created = outcomes
            .iter()
            .filter(|o| **o == EmitOutcome::Created)
            .count();
        assert_eq!(created, 1);
        assert_eq!(outcomes.len() - created, 7);
    }
}
