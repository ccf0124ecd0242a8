//! File-based storage backend.
//!
//! Stores each key as a separate file under a configurable directory
//! (default: `$XDG_DATA_HOME/budget-buddy/`).

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use crate::error::{BudgetError, Result};

/// Application name used for the XDG data directory.
const APP_NAME: &str = "budget-buddy";

/// File extension appended to every key.
const VALUE_EXTENSION: &str = "json";

/// Sentinel file used for cross-process file locking.
const LOCK_FILE: &str = "storage.lock";

/// File-backed key-value store.
///
/// Each key `k` lives in `<dir>/k.json`. Writes go to a temporary file
/// first and are renamed into place, so readers never see a partial value.
///
/// # Concurrency
///
/// Thread safety within a single process is provided by an in-process
/// [`Mutex`]. Cross-process writers are serialized via an advisory file
/// lock on `storage.lock`, but no conflict detection is done: the last
/// write wins.
///
/// # File layout
///
/// ```text
/// <dir>/
///   storage.lock          (cross-process lock sentinel)
///   transactions.json
/// ```
#[derive(Debug)]
pub struct FileStore {
    /// Root directory containing all value files.
    dir: PathBuf,
    /// Mutex serializing concurrent in-process access.
    lock: Mutex<()>,
    /// Sentinel file for cross-process advisory locking.
    lock_file: fs::File,
}

impl FileStore {
    /// Creates a new file store rooted at the given directory.
    ///
    /// Creates the directory (and parents) if it does not exist, and opens
    /// (or creates) the `storage.lock` sentinel.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the lock
    /// file cannot be opened.
    #[inline]
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).map_err(storage_io_error)?;
        let lock_file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(dir.join(LOCK_FILE))
            .map_err(storage_io_error)?;
        Ok(Self {
            dir,
            lock: Mutex::new(()),
            lock_file,
        })
    }

    /// Returns the default XDG-compliant data directory for this application.
    ///
    /// On Linux: `$XDG_DATA_HOME/budget-buddy/` (typically
    /// `~/.local/share/budget-buddy/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform data directory cannot be determined.
    #[inline]
    pub fn default_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|data_path| data_path.join(APP_NAME))
            .ok_or_else(|| {
                BudgetError::Storage("could not determine platform data directory".into())
            })
    }

    /// Returns the root directory.
    #[inline]
    #[must_use]
    pub const fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Returns the file path holding `key`.
    fn path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.{VALUE_EXTENSION}")))
    }

    /// Acquires the in-process mutex and a shared (read) file lock,
    /// executes `op`, then releases the file lock.
    fn with_shared_lock<R, F: FnOnce() -> Result<R>>(&self, op: F) -> Result<R> {
        let _guard: MutexGuard<'_, ()> = self.lock.lock().map_err(|err| lock_poison_error(&err))?;
        self.lock_file.lock_shared().map_err(storage_io_error)?;
        let result = op();
        // Only surface the unlock error when the operation succeeded;
        // otherwise the original error is more useful.
        if let Err(err) = self.lock_file.unlock()
            && result.is_ok()
        {
            return Err(storage_io_error(err));
        }
        result
    }

    /// Acquires the in-process mutex and an exclusive (write) file lock,
    /// executes `op`, then releases the file lock.
    fn with_exclusive_lock<R, F: FnOnce() -> Result<R>>(&self, op: F) -> Result<R> {
        let _guard: MutexGuard<'_, ()> = self.lock.lock().map_err(|err| lock_poison_error(&err))?;
        self.lock_file.lock().map_err(storage_io_error)?;
        let result = op();
        if let Err(err) = self.lock_file.unlock()
            && result.is_ok()
        {
            return Err(storage_io_error(err));
        }
        result
    }
}

// ── Free-standing helpers ───────────────────────────────────────────────

/// Rejects keys that would escape the store directory or collide with the
/// lock sentinel.
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(BudgetError::InvalidKey(key.to_owned()))
    }
}

/// Wraps an I/O error into a [`BudgetError::Storage`].
fn storage_io_error(err: std::io::Error) -> BudgetError {
    BudgetError::Storage(Box::new(err))
}

/// Wraps a mutex poison error into a [`BudgetError::Storage`].
fn lock_poison_error<T>(err: &std::sync::PoisonError<T>) -> BudgetError {
    BudgetError::Storage(err.to_string().into())
}

impl super::KeyValueStore for FileStore {
    #[inline]
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key)?;
        self.with_shared_lock(|| match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(storage_io_error(err)),
        })
    }

    #[inline]
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path(key)?;
        let tmp_path = path.with_extension(format!("{VALUE_EXTENSION}.tmp"));
        self.with_exclusive_lock(|| {
            fs::write(&tmp_path, value).map_err(storage_io_error)?;
            fs::rename(&tmp_path, &path).map_err(storage_io_error)
        })
    }

    #[inline]
    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path(key)?;
        self.with_exclusive_lock(|| match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(storage_io_error(err)),
        })
    }
}
