//! Read an output file back and decode every record.
//!
//! Used to check that a file decrypts under a given passphrase. Each record
//! is decoded on its own; a record that fails authentication is reported and
//! the next one is still inspected.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::warn;

use crate::error::{Result, SealogError};
use crate::record::RecordCodec;

/// One record read back from a file.
#[derive(Debug)]
pub struct ReplayRecord {
    /// 1-based line number in the file
    pub line: u64,
    /// Record exactly as stored
    pub encoded: Vec<u8>,
    /// Decoded line, or why decoding failed
    pub decoded: Result<Vec<u8>>,
}

/// Totals for a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Records that decoded cleanly
    pub ok: u64,
    /// Records that failed to decode
    pub failed: u64,
}

impl ReplaySummary {
    /// Count one record.
    pub fn record(&mut self, record: &ReplayRecord) {
        if record.decoded.is_ok() {
            self.ok += 1;
        } else {
            self.failed += 1;
        }
    }

    /// Whether every record decoded.
    pub fn all_ok(&self) -> bool {
        self.failed == 0
    }
}

/// Iterator over the records of a sealog file.
///
/// Yields `Err` only for I/O failures, which end the iteration. Per-record
/// failures are carried inside [`ReplayRecord::decoded`].
pub struct Replay<'a, R> {
    reader: R,
    codec: &'a RecordCodec,
    line: u64,
    done: bool,
}

impl<'a> Replay<'a, BufReader<File>> {
    /// Open `path` for replay.
    pub fn open(path: &Path, codec: &'a RecordCodec) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), codec))
    }
}

impl<'a, R: BufRead> Replay<'a, R> {
    /// Replay records from any buffered reader.
    pub fn new(reader: R, codec: &'a RecordCodec) -> Self {
        Self {
            reader,
            codec,
            line: 0,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for Replay<'_, R> {
    type Item = Result<ReplayRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut encoded = Vec::new();
        match self.reader.read_until(b'\n', &mut encoded) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                if encoded.last() == Some(&b'\n') {
                    encoded.pop();
                }
                self.line += 1;

                let decoded = self.codec.decode(&encoded);
                if let Err(e) = &decoded {
                    warn!(line = self.line, "Record failed to decode: {}", e);
                }
                Some(Ok(ReplayRecord {
                    line: self.line,
                    encoded,
                    decoded,
                }))
            }
            Err(e) => {
                self.done = true;
                Some(Err(SealogError::from(e)))
            }
        }
    }
}
