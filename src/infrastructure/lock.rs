//! Deploy lock
//!
//! An advisory exclusive lock on a local file serialises every mutating
//! command. The lock is released when the guard drops, and by the kernel if
//! the process dies.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use fs2::FileExt;

use crate::error::{CutoverError, CutoverResult};

#[derive(Debug, Clone)]
pub struct DeployLock {
    path: PathBuf,
    wait: bool,
}

/// Held lock; unlocks on drop
#[derive(Debug)]
pub struct DeployLockGuard {
    file: File,
    path: PathBuf,
}

impl DeployLock {
    pub fn new(path: impl Into<PathBuf>, wait: bool) -> Self {
        Self {
            path: path.into(),
            wait,
        }
    }

    pub fn acquire(&self) -> CutoverResult<DeployLockGuard> {
        let lock_err = |source: std::io::Error| CutoverError::Lock {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(lock_err)?;
        }
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(lock_err)?;

        if self.wait {
            if file.try_lock_exclusive().is_err() {
                tracing::info!(path = %self.path.display(), "waiting for another deploy to finish");
                file.lock_exclusive().map_err(lock_err)?;
            }
        } else if let Err(e) = file.try_lock_exclusive() {
            if e.kind() == fs2::lock_contended_error().kind() {
                return Err(CutoverError::LockBusy {
                    path: self.path.clone(),
                });
            }
            return Err(lock_err(e));
        }

        // Holder's pid, for whoever finds the lock busy
        let _ = file.set_len(0);
        let _ = writeln!(file, "{}", std::process::id());
        tracing::debug!(path = %self.path.display(), "deploy lock acquired");

        Ok(DeployLockGuard {
            file,
            path: self.path.clone(),
        })
    }
}

impl Drop for DeployLockGuard {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        tracing::debug!(path = %self.path.display(), "deploy lock released");
    }
}
