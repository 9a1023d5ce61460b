// src/sink.rs

//! Per-line callbacks and console mirroring.

use std::fmt;
use std::io::Write;
use std::sync::Arc;

/// Callback invoked once per completed line, terminator stripped.
pub type LineSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Which child stream a line was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamKind::Stdout => "stdout",
            StreamKind::Stderr => "stderr",
        }
    }

    /// Write `line` plus a newline to the parent's stream of the same kind.
    ///
    /// The handle is locked for the whole line so concurrent writers never
    /// split it.
    pub fn mirror(&self, line: &str) -> std::io::Result<()> {
        match self {
            StreamKind::Stdout => {
                let mut out = std::io::stdout().lock();
                writeln!(out, "{line}")?;
                out.flush()
            }
            StreamKind::Stderr => {
                let mut err = std::io::stderr().lock();
                writeln!(err, "{line}")
            }
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a reader task needs to deliver one line.
#[derive(Clone)]
pub struct LineTarget {
    pub kind: StreamKind,
    pub mirror: bool,
    pub sink: Option<LineSink>,
}

impl LineTarget {
    pub fn new(kind: StreamKind, mirror: bool, sink: Option<LineSink>) -> Self {
        Self { kind, mirror, sink }
    }

    /// Mirror `line` if enabled, then hand it to the sink if one is set.
    pub fn deliver(&self, line: &str) {
        if self.mirror {
            if let Err(e) = self.kind.mirror(line) {
                tracing::debug!(stream = %self.kind, error = %e, "failed to mirror line to console");
            }
        }

        if let Some(sink) = &self.sink {
            sink(line);
        }
    }
}

impl fmt::Debug for LineTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineTarget")
            .field("kind", &self.kind)
            .field("mirror", &self.mirror)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}
