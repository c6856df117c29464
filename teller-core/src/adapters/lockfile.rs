//! Data directory lock
//!
//! An exclusive lock on a file in the data directory keeps the store
//! single-process: a second invocation against the same directory fails
//! before it can touch the database.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::domain::result::{Error, Result};

/// Name of the lock file inside the data directory
pub const LOCK_FILE_NAME: &str = "teller.lock";

/// Held for the lifetime of a `TellerContext`; released on drop
pub struct StoreLock {
    file: File,
    path: PathBuf,
}

impl StoreLock {
    /// Acquire the exclusive lock for a data directory, without blocking.
    /// Fails with `StoreLocked` if another process holds it.
    pub fn acquire(dir: &Path) -> Result<Self> {
        let path = dir.join(LOCK_FILE_NAME);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)?;

        file.try_lock_exclusive().map_err(|_| {
            Error::StoreLocked(format!(
                "{} is in use by another teller process",
                dir.display()
            ))
        })?;

        Ok(Self { file, path })
    }

    /// Path of the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}
