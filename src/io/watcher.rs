use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Watches one record file for changes made by other processes.
///
/// The parent directory is watched rather than the file, because atomic
/// saves replace the file and most backends lose a watch on rename.
pub struct RecordWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<()>,
}

impl RecordWatcher {
    pub fn start(record_path: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let dir = record_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let target: Option<OsString> = record_path.file_name().map(|n| n.to_os_string());

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let Ok(event) = result else {
                    return;
                };
                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }
                // lock and temp files have other names
                let touched = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().map(|n| n.to_os_string()) == target);
                if touched {
                    let _ = tx.send(());
                }
            },
            Config::default(),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        Ok(RecordWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking: true if the record changed since the last poll.
    pub fn poll(&self) -> bool {
        let mut changed = false;
        while self.rx.try_recv().is_ok() {
            changed = true;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{Duration, Instant};

    use super::*;
    use tempfile::TempDir;

    fn wait_for(watcher: &RecordWatcher) -> bool {
        let start = Instant::now();
        while start.elapsed() < Duration::from_secs(3) {
            if watcher.poll() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        false
    }

    #[test]
    fn reports_writes_to_the_record() {
        let tmp = TempDir::new().unwrap();
        let record = tmp.path().join("acme.toml");
        fs::write(&record, "[record]\nname = \"Acme\"\n").unwrap();

        let watcher = RecordWatcher::start(&record).unwrap();
        fs::write(&record, "[record]\nname = \"Acme Corp\"\n").unwrap();
        assert!(wait_for(&watcher));
    }

    #[test]
    fn ignores_sibling_files() {
        let tmp = TempDir::new().unwrap();
        let record = tmp.path().join("acme.toml");
        fs::write(&record, "[record]\nname = \"Acme\"\n").unwrap();

        let watcher = RecordWatcher::start(&record).unwrap();
        fs::write(tmp.path().join("other.toml"), "x = 1\n").unwrap();
        std::thread::sleep(Duration::from_millis(300));
        assert!(!watcher.poll());
    }
}
