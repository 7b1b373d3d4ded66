//! Reader — pushes the lines of one source onto the shared intake queue.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::source::Source;
use crate::error::{GrouperError, GrouperResult};
use crate::metrics::RunMetrics;

/// Strip the line terminator (`\n` or `\r\n`). Invalid UTF-8 is replaced
/// rather than rejected.
fn decode_line(raw: &[u8]) -> String {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

/// Read `source` to end-of-stream, preserving its line order on the queue.
///
/// `intake.send` waits while the queue is full. Returns the number of lines
/// queued.
pub async fn read_source(
    source: Source,
    intake: mpsc::Sender<String>,
    cancel: CancellationToken,
    metrics: Arc<RunMetrics>,
) -> GrouperResult<u64> {
    let (name, reader) = source.into_parts();
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::with_capacity(512);
    let mut lines: u64 = 0;

    debug!(source = %name, "reader started");

    loop {
        buf.clear();
        let read = tokio::select! {
            _ = cancel.cancelled() => return Err(GrouperError::Cancelled),
            read = reader.read_until(b'\n', &mut buf) => read,
        };
        let read = read.map_err(|source| GrouperError::SourceRead {
            source_name: name.clone(),
            source,
        })?;
        if read == 0 {
            break;
        }

        let line = decode_line(&buf);
        tokio::select! {
            _ = cancel.cancelled() => return Err(GrouperError::Cancelled),
            sent = intake.send(line) => {
                // Every worker is gone, which only happens when the run is
                // being torn down.
                if sent.is_err() {
                    return Err(GrouperError::Cancelled);
                }
            }
        }

        metrics.record_read();
        lines += 1;
    }

    metrics.record_source_done();
    debug!(source = %name, lines, "reader finished");
    Ok(lines)
}
