//! Buffered output file with an explicit durable close.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, SealogError};

const KB: usize = 1024;
const MB: usize = 1024 * KB;

/// Default in-memory buffer size.
pub const DEFAULT_BUFFER_SIZE: usize = 128 * KB;

/// Hard cap on the in-memory buffer size.
pub const MAX_BUFFER_SIZE: usize = MB;

/// Clamp a requested buffer size to [`MAX_BUFFER_SIZE`].
///
/// # Errors
///
/// Returns `SealogError::InvalidInput` for a zero-sized buffer.
pub fn clamp_buffer_size(requested: usize) -> Result<usize> {
    if requested == 0 {
        return Err(SealogError::InvalidInput(
            "Buffer size must be greater than zero".to_string(),
        ));
    }
    Ok(requested.min(MAX_BUFFER_SIZE))
}

/// Output file behind an in-memory buffer.
///
/// Records reach the file whenever the buffer fills. Nothing is guaranteed
/// to be on storage until [`flush_and_sync_and_close`](Self::flush_and_sync_and_close)
/// returns.
#[derive(Debug)]
pub struct DurableWriter {
    path: PathBuf,
    inner: BufWriter<File>,
}

impl DurableWriter {
    /// Create (or truncate) the file at `path` with a buffer of `capacity` bytes.
    pub fn create(path: &Path, capacity: usize) -> Result<Self> {
        let file = File::create(path)?;
        debug!(path = %path.display(), capacity, "opened output file");
        Ok(Self {
            path: path.to_path_buf(),
            inner: BufWriter::with_capacity(capacity, file),
        })
    }

    /// Append `record` followed by a newline.
    pub fn write_line(&mut self, record: &[u8]) -> Result<()> {
        self.inner.write_all(record)?;
        self.inner.write_all(b"\n")?;
        Ok(())
    }

    /// Flush the buffer, sync the file to storage, and close it.
    ///
    /// Consumes the writer: this is always the last operation on it.
    pub fn flush_and_sync_and_close(self) -> Result<()> {
        let file = self.inner.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        debug!(path = %self.path.display(), "output file synced and closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_write_then_close_persists_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.log");

        let mut writer = DurableWriter::create(&path, DEFAULT_BUFFER_SIZE).unwrap();
        writer.write_line(b"first").unwrap();
        writer.write_line(b"second").unwrap();
        writer.flush_and_sync_and_close().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_buffer_holds_until_full() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.log");

        let mut writer = DurableWriter::create(&path, 16).unwrap();
        writer.write_line(b"abc").unwrap();
        assert_eq!(fs::read(&path).unwrap().len(), 0);

        writer.write_line(b"0123456789abcdef").unwrap();
        assert!(!fs::read(&path).unwrap().is_empty());

        writer.flush_and_sync_and_close().unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "abc\n0123456789abcdef\n"
        );
    }

    #[test]
    fn test_create_truncates_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.log");
        fs::write(&path, "stale contents\n").unwrap();

        let writer = DurableWriter::create(&path, DEFAULT_BUFFER_SIZE).unwrap();
        writer.flush_and_sync_and_close().unwrap();

        assert_eq!(fs::read(&path).unwrap().len(), 0);
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.log");

        let result = DurableWriter::create(&path, DEFAULT_BUFFER_SIZE);
        assert!(matches!(result, Err(SealogError::Io { .. })));
    }

    #[test]
    fn test_clamp_buffer_size() {
        assert_eq!(clamp_buffer_size(4096).unwrap(), 4096);
        assert_eq!(clamp_buffer_size(10 * MB).unwrap(), MAX_BUFFER_SIZE);
        assert!(clamp_buffer_size(0).is_err());
    }
}
