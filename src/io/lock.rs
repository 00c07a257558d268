use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Advisory lock held while a record file is rewritten.
///
/// The lock lives next to the record as `.<file name>.lock` so a TUI and a
/// CLI process editing the same record take turns. The flock is released
/// when the handle closes; the file stays on disk so every process locks
/// the same inode.
pub struct FileLock {
    _file: File,
}

/// Error type for lock operations
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not lock {path}: another mf process is writing this record")]
    Timeout { path: PathBuf },
}

/// Lock file path for a record file
pub fn lock_path_for(record_path: &Path) -> PathBuf {
    let name = record_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "record".to_string());
    record_path.with_file_name(format!(".{}.lock", name))
}

const RETRY_EVERY: Duration = Duration::from_millis(10);

impl FileLock {
    /// Lock `record_path`, polling until `timeout` runs out.
    pub fn acquire(record_path: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = lock_path_for(record_path);
        let file = match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
        {
            Ok(file) => file,
            Err(source) => return Err(LockError::CreateError { path, source }),
        };

        let deadline = Instant::now() + timeout;
        loop {
            if try_lock(&file).is_ok() {
                return Ok(FileLock { _file: file });
            }
            if Instant::now() >= deadline {
                return Err(LockError::Timeout { path });
            }
            std::thread::sleep(RETRY_EVERY);
        }
    }

    pub fn acquire_default(record_path: &Path) -> Result<Self, LockError> {
        Self::acquire(record_path, Duration::from_secs(5))
    }
}

#[cfg(unix)]
fn try_lock(file: &File) -> Result<(), std::io::Error> {
    use std::os::unix::io::AsRawFd;
    let fd = file.as_raw_fd();
    let result = unsafe { libc::flock(fd, libc::LOCK_EX | libc::LOCK_NB) };
    if result == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> Result<(), std::io::Error> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lock_path_is_hidden_sibling() {
        assert_eq!(
            lock_path_for(Path::new("/tmp/contacts/acme.toml")),
            PathBuf::from("/tmp/contacts/.acme.toml.lock")
        );
    }

    #[test]
    fn released_on_drop_and_file_kept() {
        let tmp = TempDir::new().unwrap();
        let record = tmp.path().join("acme.toml");

        let lock = FileLock::acquire_default(&record).unwrap();
        assert!(lock_path_for(&record).exists());
        drop(lock);
        assert!(lock_path_for(&record).exists());

        let again = FileLock::acquire(&record, Duration::from_millis(50));
        assert!(again.is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn contention_times_out() {
        let tmp = TempDir::new().unwrap();
        let record = tmp.path().join("acme.toml");

        let _held = FileLock::acquire_default(&record).unwrap();
        let second = FileLock::acquire(&record, Duration::from_millis(50));
        assert!(matches!(second, Err(LockError::Timeout { .. })));
    }
}
