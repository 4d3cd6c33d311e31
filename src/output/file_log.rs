//! Output log implementations
//!
//! `FileOutputLog` is the durable artifact: one URL per line, opened in
//! append mode for the life of the process. `MemoryOutputLog` keeps lines in
//! memory and can be told to fail, for exercising the controller.

use crate::output::traits::{OutputError, OutputLog, OutputResult};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Append-only output file
#[derive(Debug)]
pub struct FileOutputLog {
    path: PathBuf,
    file: File,
}

impl FileOutputLog {
    /// Opens `path` for appending, creating it if absent
    ///
    /// Existing content is left in place; nothing is ever truncated.
    pub fn open(path: impl AsRef<Path>) -> OutputResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputLog for FileOutputLog {
    fn append(&mut self, url: &str) -> OutputResult<()> {
        if url.contains('\n') {
            return Err(OutputError::Write(format!(
                "refusing to append URL containing a newline: {:?}",
                url
            )));
        }
        // Single write per line so concurrent readers never see half a URL
        let line = format!("{}\n", url);
        self.file.write_all(line.as_bytes())?;
        self.file.flush()?;
        Ok(())
    }
}

/// In-memory output log
///
/// Clones share the same line buffer, so a test can keep one handle while
/// the controller owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryOutputLog {
    lines: Arc<Mutex<Vec<String>>>,
    failures_left: Arc<Mutex<usize>>,
}

impl MemoryOutputLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` appends fail
    pub fn fail_next(&self, count: usize) {
        if let Ok(mut left) = self.failures_left.lock() {
            *left = count;
        }
    }

    /// Snapshot of the lines appended so far
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl OutputLog for MemoryOutputLog {
    fn append(&mut self, url: &str) -> OutputResult<()> {
        {
            let mut left = self
                .failures_left
                .lock()
                .map_err(|e| OutputError::Write(e.to_string()))?;
            if *left > 0 {
                *left -= 1;
                return Err(OutputError::Write("simulated write failure".to_string()));
            }
        }

        self.lines
            .lock()
            .map_err(|e| OutputError::Write(e.to_string()))?
            .push(url.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_log_creates_and_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sites.txt");

        let mut log = FileOutputLog::open(&path).unwrap();
        log.append("https://example.com/a").unwrap();
        log.append("https://example.com/b").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "https://example.com/a\nhttps://example.com/b\n");
    }

    #[test]
    fn test_file_log_never_truncates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sites.txt");
        std::fs::write(&path, "https://example.com/old\n").unwrap();

        let mut log = FileOutputLog::open(&path).unwrap();
        log.append("https://example.com/new").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "https://example.com/old\nhttps://example.com/new\n");
    }

    #[test]
    fn test_file_log_rejects_newlines() {
        let dir = TempDir::new().unwrap();
        let mut log = FileOutputLog::open(dir.path().join("sites.txt")).unwrap();
        assert!(log.append("https://example.com/a\nb").is_err());
    }

    #[test]
    fn test_file_log_open_missing_directory() {
        let result = FileOutputLog::open("/nonexistent/dir/sites.txt");
        assert!(matches!(result, Err(OutputError::Io(_))));
    }

    #[test]
    fn test_memory_log_shares_lines_between_clones() {
        let log = MemoryOutputLog::new();
        let mut writer = log.clone();
        writer.append("https://example.com/a").unwrap();

        assert_eq!(log.lines(), vec!["https://example.com/a".to_string()]);
    }

    #[test]
    fn test_memory_log_simulated_failures() {
        let log = MemoryOutputLog::new();
        let mut writer = log.clone();
        log.fail_next(1);

        assert!(writer.append("https://example.com/a").is_err());
        assert!(writer.append("https://example.com/b").is_ok());
        assert_eq!(log.lines(), vec!["https://example.com/b".to_string()]);
    }
}
