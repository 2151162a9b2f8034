//! Scoped working-directory staging.
//!
//! [`StagingDir::enter`] creates the staging directory if needed and makes it
//! the process working directory. The previous working directory is restored
//! when the guard is dropped, whether the commands in between succeeded,
//! failed, or the scope was left through `?` or a panic.
//!
//! The working directory is process-global: only one guard should be alive
//! at a time.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::RunnerError;

/// Guard that holds the process inside a staging directory.
#[derive(Debug)]
pub struct StagingDir {
    path: PathBuf,
    previous: PathBuf,
}

impl StagingDir {
    /// Creates `dir` (relative to the current directory unless absolute) if it
    /// is missing, then switches into it.
    ///
    /// An existing directory is reused as is.
    pub fn enter(dir: impl AsRef<Path>) -> Result<Self, RunnerError> {
        let previous = env::current_dir()?;
        let path = previous.join(dir.as_ref());

        if path.is_dir() {
            log::debug!("reusing staging directory {}", path.display());
        } else {
            log::debug!("creating staging directory {}", path.display());
            fs::create_dir_all(&path).map_err(|source| RunnerError::Staging {
                path: path.clone(),
                source,
            })?;
        }

        env::set_current_dir(&path).map_err(|source| RunnerError::Staging {
            path: path.clone(),
            source,
        })?;

        Ok(Self { path, previous })
    }

    /// Absolute path of the staging directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Working directory that will be restored on drop.
    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        if let Err(e) = env::set_current_dir(&self.previous) {
            log::warn!(
                "failed to restore working directory {}: {}",
                self.previous.display(),
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CwdRestore, lock_cwd};

    #[test]
    fn test_enter_creates_and_restores() {
        let _lock = lock_cwd();
        let _restore = CwdRestore::capture();
        let temp = tempfile::tempdir().unwrap();
        env::set_current_dir(temp.path()).unwrap();
        let before = env::current_dir().unwrap();

        {
            let staging = StagingDir::enter("build").unwrap();
            assert!(staging.path().is_dir());
            assert_eq!(staging.previous(), before.as_path());
            assert_eq!(env::current_dir().unwrap(), before.join("build"));
        }

        assert_eq!(env::current_dir().unwrap(), before);
        assert!(before.join("build").is_dir());
    }

    #[test]
    fn test_enter_is_idempotent() {
        let _lock = lock_cwd();
        let _restore = CwdRestore::capture();
        let temp = tempfile::tempdir().unwrap();
        env::set_current_dir(temp.path()).unwrap();

        drop(StagingDir::enter("conan").unwrap());
        fs::write(temp.path().join("conan").join("keep.txt"), "x").unwrap();
        drop(StagingDir::enter("conan").unwrap());

        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert!(temp.path().join("conan").join("keep.txt").is_file());
    }

    #[test]
    fn test_restores_after_panic() {
        let _lock = lock_cwd();
        let _restore = CwdRestore::capture();
        let temp = tempfile::tempdir().unwrap();
        env::set_current_dir(temp.path()).unwrap();
        let before = env::current_dir().unwrap();

        let result = std::panic::catch_unwind(|| {
            let _staging = StagingDir::enter("build").unwrap();
            panic!("command blew up");
        });

        assert!(result.is_err());
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_file_in_the_way_is_reported() {
        let _lock = lock_cwd();
        let _restore = CwdRestore::capture();
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("build"), "not a directory").unwrap();

        let err = StagingDir::enter(temp.path().join("build")).unwrap_err();
        assert!(matches!(err, RunnerError::Staging { .. }));
        assert!(err.to_string().contains("failed to prepare staging directory"));
    }
}
