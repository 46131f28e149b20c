use crate::domain::ports::{InputSource, OutputSink};
use crate::utils::error::{PlaybookError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, Clone)]
pub struct FileInput {
    path: PathBuf,
}

impl FileInput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InputSource for FileInput {
    fn read_text(&self) -> Result<String> {
        Ok(fs::read_to_string(&self.path)?)
    }
}

/// Writes each successful render to a file. Failures are logged and the last
/// good file stays in place, since an error block is not a valid diagram.
#[derive(Debug, Clone)]
pub struct FileOutput {
    path: PathBuf,
}

impl FileOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for FileOutput {
    fn replace(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, content).map_err(|e| PlaybookError::OutputError {
            message: format!("cannot write {}: {}", self.path.display(), e),
        })
    }

    fn show_error(&self, message: &str) -> Result<()> {
        tracing::error!("❌ {}", message);
        tracing::info!("Keeping previous output at {}", self.path.display());
        Ok(())
    }
}

/// Decides when a watched file needs another render.
///
/// The first poll that finds the file fires, so watch mode renders once at
/// startup. After that only a changed modification time fires. A missing or
/// unreadable file never fires and does not reset what was last seen.
#[derive(Debug, Clone)]
pub struct ModifiedWatcher {
    path: PathBuf,
    last_seen: Option<SystemTime>,
}

impl ModifiedWatcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_seen: None,
        }
    }

    pub fn poll(&mut self) -> bool {
        let modified = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                tracing::debug!("Cannot stat {}: {}", self.path.display(), e);
                return false;
            }
        };

        if self.last_seen == Some(modified) {
            return false;
        }
        self.last_seen = Some(modified);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_file_input_reads_current_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("play.playbook");
        let input = FileInput::new(&path);

        fs::write(&path, "players = { p1 }").unwrap();
        assert_eq!(input.read_text().unwrap(), "players = { p1 }");

        fs::write(&path, "players = { p2 }").unwrap();
        assert_eq!(input.read_text().unwrap(), "players = { p2 }");
    }

    #[test]
    fn test_missing_input_is_an_io_error() {
        let input = FileInput::new("/definitely/not/here.playbook");
        assert!(matches!(input.read_text(), Err(PlaybookError::IoError(_))));
    }

    #[test]
    fn test_file_output_keeps_last_good_render_on_error() {
        let dir = TempDir::new().unwrap();
        let output = FileOutput::new(dir.path().join("out/play.svg"));

        output.replace("<svg>ok</svg>").unwrap();
        output.show_error("Parse error at 1:1: boom").unwrap();

        assert_eq!(fs::read_to_string(output.path()).unwrap(), "<svg>ok</svg>");
    }

    fn touch(path: &Path, offset_secs: u64) {
        let file = fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000 + offset_secs))
            .unwrap();
    }

    #[test]
    fn test_watcher_fires_once_at_startup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("play.playbook");
        fs::write(&path, "players = { p1 }").unwrap();

        let mut watcher = ModifiedWatcher::new(&path);
        assert!(watcher.poll());
        assert!(!watcher.poll());
        assert!(!watcher.poll());
    }

    #[test]
    fn test_watcher_fires_on_each_mtime_change() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("play.playbook");
        fs::write(&path, "players = { p1 }").unwrap();
        touch(&path, 0);

        let mut watcher = ModifiedWatcher::new(&path);
        assert!(watcher.poll());

        touch(&path, 0);
        assert!(!watcher.poll(), "unchanged mtime must not fire");

        touch(&path, 5);
        assert!(watcher.poll());
        assert!(!watcher.poll());
    }

    #[test]
    fn test_watcher_waits_for_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("later.playbook");

        let mut watcher = ModifiedWatcher::new(&path);
        assert!(!watcher.poll());

        fs::write(&path, "players = { p1 }").unwrap();
        assert!(watcher.poll());
    }
}
