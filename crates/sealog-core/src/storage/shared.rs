//! Writer handle shared between the producer and the shutdown path.

use std::sync::{Arc, Mutex, MutexGuard};

use super::writer::DurableWriter;
use crate::error::{Result, SealogError};

/// A [`DurableWriter`] behind one mutex.
///
/// The producer holds the lock for each record and the shutdown path holds
/// it for the final flush, so a record is never split by a concurrent close.
/// After [`close`](Self::close) the slot is empty and writes fail with
/// `SealogError::WriterClosed`.
#[derive(Debug, Clone)]
pub struct SharedWriter {
    inner: Arc<Mutex<Option<DurableWriter>>>,
}

impl SharedWriter {
    /// Wrap an open writer.
    pub fn new(writer: DurableWriter) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(writer))),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<DurableWriter>>> {
        self.inner
            .lock()
            .map_err(|_| std::io::Error::other("output writer lock poisoned").into())
    }

    /// Append one record under the lock.
    pub fn write_line(&self, record: &[u8]) -> Result<()> {
        let mut guard = self.lock()?;
        match guard.as_mut() {
            Some(writer) => writer.write_line(record),
            None => Err(SealogError::WriterClosed),
        }
    }

    /// Flush, sync, and close the writer under the lock.
    ///
    /// Returns `Ok(true)` if this call closed the writer and `Ok(false)` if
    /// it was already closed.
    pub fn close(&self) -> Result<bool> {
        let mut guard = self.lock()?;
        match guard.take() {
            Some(writer) => {
                writer.flush_and_sync_and_close()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// [`close`](Self::close) on Tokio's blocking pool.
    ///
    /// Async callers close through here; the flush and fsync run off the
    /// runtime thread.
    pub async fn close_blocking(&self) -> Result<bool> {
        let writer = self.clone();
        tokio::task::spawn_blocking(move || writer.close())
            .await
            .map_err(|e| std::io::Error::other(format!("writer close task failed: {}", e)))?
    }

    /// Whether the writer has been closed.
    pub fn is_closed(&self) -> bool {
        self.lock().map(|guard| guard.is_none()).unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DEFAULT_BUFFER_SIZE;
    use std::fs;
    use std::thread;
    use tempfile::tempdir;

    #[test]
    fn test_close_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.log");
        let writer = SharedWriter::new(DurableWriter::create(&path, DEFAULT_BUFFER_SIZE).unwrap());

        writer.write_line(b"only line").unwrap();
        assert!(writer.close().unwrap());
        assert!(!writer.close().unwrap());
        assert!(writer.is_closed());

        assert_eq!(fs::read_to_string(&path).unwrap(), "only line\n");
    }

    #[tokio::test]
    async fn test_close_blocking_closes_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.log");
        let writer = SharedWriter::new(DurableWriter::create(&path, DEFAULT_BUFFER_SIZE).unwrap());
        writer.write_line(b"line").unwrap();

        assert!(writer.close_blocking().await.unwrap());
        assert!(!writer.close_blocking().await.unwrap());
        assert!(matches!(
            writer.write_line(b"late"),
            Err(SealogError::WriterClosed)
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "line\n");
    }

    #[test]
    fn test_write_after_close_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.log");
        let writer = SharedWriter::new(DurableWriter::create(&path, DEFAULT_BUFFER_SIZE).unwrap());

        writer.close().unwrap();
        let result = writer.write_line(b"late");
        assert!(matches!(result, Err(SealogError::WriterClosed)));
    }

    #[test]
    fn test_concurrent_close_never_splits_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.log");
        // Small buffer so records straddle flushes.
        let writer = SharedWriter::new(DurableWriter::create(&path, 64).unwrap());
        let record = vec![b'x'; 100];

        let producer = {
            let writer = writer.clone();
            let record = record.clone();
            thread::spawn(move || {
                let mut written = 0usize;
                while writer.write_line(&record).is_ok() {
                    written += 1;
                }
                written
            })
        };

        thread::sleep(std::time::Duration::from_millis(20));
        writer.close().unwrap();
        let written = producer.join().unwrap();

        let contents = fs::read(&path).unwrap();
        assert_eq!(contents.len(), written * (record.len() + 1));
        for line in contents.split(|b| *b == b'\n').filter(|l| !l.is_empty()) {
            assert_eq!(line, record.as_slice());
        }
    }
}
