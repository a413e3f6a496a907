//! Run lock
//!
//! Two runs committing against the same workbook would both see the same
//! pilots as `Available` and double-book them. A PID lock file in the data
//! directory keeps runs against one roster strictly sequential.

use anyhow::{bail, Context, Result};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Exclusive lock on a roster data directory, released on drop.
#[derive(Debug)]
pub struct ProcessLock {
    lock_path: PathBuf,
    owned: bool,
}

impl ProcessLock {
    const LOCK_FILE_NAME: &'static str = ".skyroster.lock";

    /// Take the lock for `data_dir`, clearing it first if its holder is gone.
    ///
    /// The lock file is created with `create_new`, so of two runs racing for
    /// the same directory exactly one wins.
    pub fn acquire<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let lock_path = data_dir.join(Self::LOCK_FILE_NAME);
        let pid = std::process::id();

        // One retry after clearing a stale lock
        for _ in 0..2 {
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&lock_path)
            {
                Ok(mut file) => {
                    writeln!(file, "{pid}").context("Failed to write PID to lock file")?;
                    tracing::debug!(pid, path = %lock_path.display(), "Roster lock acquired");
                    return Ok(Self {
                        lock_path,
                        owned: true,
                    });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    Self::clear_if_stale(&lock_path)?;
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Failed to create lock file: {}", lock_path.display())
                    });
                }
            }
        }
        bail!(
            "Roster lock at {} was taken by another run while clearing it",
            lock_path.display()
        )
    }

    /// Remove an existing lock whose holder is gone; fail if it is live.
    fn clear_if_stale(lock_path: &Path) -> Result<()> {
        match Self::holder(lock_path) {
            Ok(Some(pid)) => bail!(
                "Another assignment run holds the roster lock (PID: {pid})\n\
                 \n\
                 Wait for it to finish, or if no run is active remove the stale lock:\n\
                    rm {}",
                lock_path.display()
            ),
            Ok(None) => {
                tracing::info!(path = %lock_path.display(), "Removing stale roster lock");
                remove_if_present(lock_path).context("Failed to remove stale lock file")
            }
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable roster lock, replacing it");
                remove_if_present(lock_path).context("Failed to remove unreadable lock file")
            }
        }
    }

    /// PID of a live holder, `None` if the lock is stale.
    fn holder(lock_path: &Path) -> Result<Option<u32>> {
        let contents = match fs::read_to_string(lock_path) {
            Ok(contents) => contents,
            // Released between our create attempt and this read
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).context("Failed to read lock file"),
        };
        let pid: u32 = contents
            .trim()
            .parse()
            .context("Failed to parse PID from lock file")?;
        Ok(Self::is_running(pid).then_some(pid))
    }

    #[cfg(unix)]
    fn is_running(pid: u32) -> bool {
        if pid == std::process::id() {
            return true;
        }
        fs::read_to_string(format!("/proc/{pid}/cmdline"))
            .map(|cmdline| cmdline.contains("skyroster"))
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    fn is_running(_pid: u32) -> bool {
        true
    }

    pub fn release(&mut self) {
        if self.owned {
            if let Err(e) = fs::remove_file(&self.lock_path) {
                tracing::warn!(error = %e, "Failed to remove roster lock");
            } else {
                tracing::debug!(path = %self.lock_path.display(), "Roster lock released");
            }
            self.owned = false;
        }
    }

    pub fn path(&self) -> &Path {
        &self.lock_path
    }
}

fn remove_if_present(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

impl Drop for ProcessLock {
    fn drop(&mut self) {
        self.release();
    }
}
