//! Invocation Locking
//!
//! Every command can run as its own process, and a user holding down a
//! navigation shortcut starts several at once. All mutating work therefore runs
//! inside a blocking, advisory, whole-invocation lock. The lock is a trait so
//! embedders and tests can swap the file lock for an in-process mutex.

use crate::error::OnionError;
use parking_lot::{Mutex, MutexGuard};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const LOCK_FILE_NAME: &str = "onion-layers.lock";

/// Mutual exclusion held for the duration of one invocation.
pub trait InvocationLock {
    type Guard<'a>
    where
        Self: 'a;

    /// Block until the lock is held. Released when the guard drops.
    fn acquire(&self) -> Result<Self::Guard<'_>, OnionError>;
}

/// Run `body` while holding `lock`.
pub fn with_lock<L, T, F>(lock: &L, body: F) -> Result<T, OnionError>
where
    L: InvocationLock + ?Sized,
    F: FnOnce() -> Result<T, OnionError>,
{
    let _guard = lock.acquire()?;
    body()
}

/// Advisory lock on a file, shared by every process using the same path.
#[derive(Debug, Clone)]
pub struct FileLock {
    path: PathBuf,
}

impl FileLock {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<user cache dir>/onion-layers.lock`, if a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        directories::BaseDirs::new().map(|dirs| dirs.cache_dir().join(LOCK_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Held file lock. Unlocked on drop.
#[derive(Debug)]
pub struct FileLockGuard {
    file: File,
    path: PathBuf,
}

impl Drop for FileLockGuard {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            warn!(path = %self.path.display(), "Failed to release lock: {}", e);
        } else {
            debug!(path = %self.path.display(), "Released invocation lock");
        }
    }
}

impl InvocationLock for FileLock {
    type Guard<'a> = FileLockGuard;

    fn acquire(&self) -> Result<Self::Guard<'_>, OnionError> {
        // The cache directory is not created: a missing directory is fatal.
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.path)
            .map_err(|source| OnionError::LockUnavailable {
                path: self.path.clone(),
                source,
            })?;

        file.lock().map_err(|source| OnionError::LockUnavailable {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "Acquired invocation lock");

        Ok(FileLockGuard {
            file,
            path: self.path.clone(),
        })
    }
}

/// In-process lock for embedding the engine in a long-lived host.
#[derive(Debug, Default)]
pub struct ProcessLock {
    inner: Mutex<()>,
}

impl ProcessLock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InvocationLock for ProcessLock {
    type Guard<'a> = MutexGuard<'a, ()>;

    fn acquire(&self) -> Result<Self::Guard<'_>, OnionError> {
        Ok(self.inner.lock())
    }
}
