//! Append-only line file with size-based rotation.
//!
//! When the active file would grow past its size cap, it is renamed to
//! `<name>.1`, existing backups shift up by one (`.1` → `.2`, ...), and the
//! oldest beyond the retention count is deleted. A fresh file is opened lazily
//! on the next write.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Default size cap (10 MB).
pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Default number of rotated backups kept next to the active file.
pub const DEFAULT_BACKUPS: usize = 3;

struct Active {
    file: File,
    len: u64,
}

/// Thread-safe rotating writer. One call to [`RotatingFile::write_line`] is
/// one line on disk.
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    backups: usize,
    active: Mutex<Option<Active>>,
}

impl RotatingFile {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self::with_limits(path, DEFAULT_MAX_BYTES, DEFAULT_BACKUPS)
    }

    #[must_use]
    pub const fn with_limits(path: PathBuf, max_bytes: u64, backups: usize) -> Self {
        Self {
            path,
            max_bytes,
            backups,
            active: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the `n`th backup (1 is the most recent).
    #[must_use]
    pub fn backup_path(&self, n: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{n}"));
        PathBuf::from(name)
    }

    /// Appends `line` plus a newline, rotating first if the file is full.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be opened, rotated, or written, or when a
    /// previous writer panicked while holding the lock.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut active = self
            .active
            .lock()
            .map_err(|e| io::Error::other(format!("trace writer lock poisoned: {e}")))?;

        let incoming = line.len() as u64 + 1;
        let full = active
            .as_ref()
            .is_some_and(|a| a.len > 0 && a.len + incoming > self.max_bytes);
        if full {
            *active = None;
            self.rotate()?;
        }

        if active.is_none() {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
            let len = file.metadata()?.len();
            *active = Some(Active { file, len });
            if len > 0 && len + incoming > self.max_bytes {
                *active = None;
                self.rotate()?;
                let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
                *active = Some(Active { file, len: 0 });
            }
        }

        let Some(current) = active.as_mut() else {
            return Err(io::Error::other("trace file unavailable"));
        };
        writeln!(current.file, "{line}")?;
        current.file.flush()?;
        current.len += incoming;
        Ok(())
    }

    fn rotate(&self) -> io::Result<()> {
        if self.backups == 0 {
            return fs::remove_file(&self.path).or_else(ignore_missing);
        }

        fs::remove_file(self.backup_path(self.backups)).or_else(ignore_missing)?;
        for n in (1..self.backups).rev() {
            let from = self.backup_path(n);
            if from.exists() {
                fs::rename(&from, self.backup_path(n + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1)).or_else(ignore_missing)
    }
}

fn ignore_missing(e: io::Error) -> io::Result<()> {
    if e.kind() == io::ErrorKind::NotFound {
        Ok(())
    } else {
        Err(e)
    }
}

impl std::fmt::Debug for RotatingFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFile")
            .field("path", &self.path)
            .field("max_bytes", &self.max_bytes)
            .field("backups", &self.backups)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RotatingFile::new(dir.path().join("spans.jsonl"));
        writer.write_line("{\"a\":1}").unwrap();
        writer.write_line("{\"b\":2}").unwrap();

        let content = fs::read_to_string(writer.path()).unwrap();
        assert_eq!(content, "{\"a\":1}\n{\"b\":2}\n");
    }

    #[test]
    fn test_rotates_and_keeps_bounded_backups() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RotatingFile::with_limits(dir.path().join("spans.jsonl"), 10, 2);

        for i in 0..5 {
            writer.write_line(&format!("line-{i}")).unwrap();
        }

        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "line-4\n");
        assert_eq!(fs::read_to_string(writer.backup_path(1)).unwrap(), "line-3\n");
        assert_eq!(fs::read_to_string(writer.backup_path(2)).unwrap(), "line-2\n");
        assert!(!writer.backup_path(3).exists());
    }

    #[test]
    fn test_existing_full_file_is_rotated_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spans.jsonl");
        fs::write(&path, "0123456789\n").unwrap();

        let writer = RotatingFile::with_limits(path, 12, 1);
        writer.write_line("next").unwrap();

        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "next\n");
        assert_eq!(fs::read_to_string(writer.backup_path(1)).unwrap(), "0123456789\n");
    }

    #[test]
    fn test_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RotatingFile::new(dir.path().join("nested/traces/spans.jsonl"));
        writer.write_line("x").unwrap();
        assert!(writer.path().exists());
    }
}
