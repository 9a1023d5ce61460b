// src/stream.rs

//! Draining a child output stream line by line.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::sink::LineTarget;

/// Lines buffered between a reader and its delivery thread.
const LINE_BUFFER: usize = 256;

/// Read `reader` to end-of-stream, delivering every line to `target`.
///
/// Framing follows the usual line-scanner rules: `\n` ends a line, a `\r`
/// right before it is dropped too, and a final unterminated line is still
/// delivered. Invalid UTF-8 is replaced rather than treated as an error.
///
/// Mirroring and the callback run on a dedicated blocking-pool thread fed
/// through a bounded channel, so a slow or blocking callback only holds back
/// its own stream; the other stream keeps draining even on a current-thread
/// runtime.
///
/// A read error ends the drain early (logged at warn); the function always
/// returns so the caller's join never hangs. Returns the number of lines
/// delivered.
pub async fn drain_lines<R>(reader: R, target: LineTarget) -> usize
where
    R: AsyncRead + Unpin,
{
    let kind = target.kind;
    let (line_tx, mut line_rx) = mpsc::channel::<String>(LINE_BUFFER);

    let delivery = tokio::task::spawn_blocking(move || {
        let mut delivered = 0usize;
        while let Some(line) = line_rx.blocking_recv() {
            target.deliver(&line);
            delivered += 1;
        }
        delivered
    });

    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                strip_line_ending(&mut buf);
                let line = String::from_utf8_lossy(&buf).into_owned();
                debug!(stream = %kind, "{}", line);
                if line_tx.send(line).await.is_err() {
                    warn!(stream = %kind, "line delivery stopped; stopping reader");
                    break;
                }
            }
            Err(e) => {
                warn!(
                    stream = %kind,
                    error = %e,
                    "error reading child output; stopping reader"
                );
                break;
            }
        }
    }

    drop(line_tx);

    let delivered = match delivery.await {
        Ok(n) => n,
        Err(e) => {
            error!(stream = %kind, error = %e, "line delivery task failed");
            0
        }
    };

    debug!(stream = %kind, lines = delivered, "reader reached end of stream");
    delivered
}

fn strip_line_ending(buf: &mut Vec<u8>) {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
}
