//! The ingest loop: read, throttle, encode, write.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, trace};

use crate::error::{Result, SealogError};
use crate::record::RecordCodec;
use crate::shutdown::ShutdownSignal;
use crate::storage::SharedWriter;
use crate::throttle::{Clock, RateLimiter};

/// Counters for one ingest run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Lines read from the input
    pub read: u64,
    /// Records written to the output
    pub written: u64,
    /// Lines denied by the rate limiter
    pub dropped: u64,
    /// Whether shutdown stopped the loop before end of input
    pub stopped_by_shutdown: bool,
}

/// Strip the line terminator (`\n` or `\r\n`).
fn trim_line_ending(line: &mut Vec<u8>) {
    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }
}

/// Drive `input` through the limiter and codec into `writer`.
///
/// Lines are handled one at a time. Shutdown is observed between lines:
/// once `shutdown` fires, or a write finds the writer already closed by the
/// shutdown path, the loop stops. At end of input the writer is flushed,
/// synced, and closed here.
///
/// Denied lines are dropped, not queued.
///
/// # Errors
///
/// Read, encode, and write failures are returned as-is and are fatal.
pub async fn run<R, C>(
    mut input: R,
    limiter: &mut RateLimiter<C>,
    codec: &RecordCodec,
    writer: &SharedWriter,
    mut shutdown: ShutdownSignal,
) -> Result<PipelineStats>
where
    R: AsyncBufRead + Unpin,
    C: Clock,
{
    let mut stats = PipelineStats::default();
    let mut line = Vec::new();

    loop {
        line.clear();
        let read = tokio::select! {
            biased;
            _ = shutdown.requested() => {
                stats.stopped_by_shutdown = true;
                break;
            }
            read = input.read_until(b'\n', &mut line) => read?,
        };

        if read == 0 {
            debug!("End of input");
            writer.close_blocking().await?;
            break;
        }

        trim_line_ending(&mut line);
        stats.read += 1;

        if !limiter.check().is_allow() {
            stats.dropped += 1;
            trace!(line = stats.read, "Rate limit reached, dropping line");
            continue;
        }

        let record = codec.encode(&line)?;
        match writer.write_line(&record) {
            Ok(()) => stats.written += 1,
            Err(SealogError::WriterClosed) => {
                stats.stopped_by_shutdown = true;
                break;
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        read = stats.read,
        written = stats.written,
        dropped = stats.dropped,
        stopped_by_shutdown = stats.stopped_by_shutdown,
        "Ingest finished"
    );
    Ok(stats)
}
