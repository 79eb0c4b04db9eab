//! # Progress Reporter
//!
//! Writes the human-readable progress line that entrypoint scripts show while a
//! container waits:
//!
//! ```text
//! Waiting for PostgreSQL to become available..... done
//! ```
//!
//! The sink is flushed after every write so dots appear as they happen.

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use crate::error::GateError;

pub struct Reporter {
    sink: Box<dyn Write + Send>,
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter").finish_non_exhaustive()
    }
}

impl Reporter {
    pub fn new<W: Write + Send + 'static>(sink: W) -> Self {
        Self {
            sink: Box::new(sink),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Reporter writing into a buffer that can be read back
    pub fn buffered() -> (Self, SharedBuffer) {
        let buffer = SharedBuffer::default();
        (Self::new(buffer.clone()), buffer)
    }

    pub fn waiting(&mut self, name: &str) {
        self.emit(format_args!("Waiting for {} to become available...", name));
    }

    pub fn tick(&mut self) {
        self.emit(format_args!("."));
    }

    pub fn done(&mut self) {
        self.emit(format_args!(" done\n"));
    }

    /// Ends the pending progress line and prints the diagnostic on its own line
    pub fn timed_out(&mut self, error: &GateError) {
        self.emit(format_args!("\n{}\n", error));
    }

    fn emit(&mut self, args: std::fmt::Arguments<'_>) {
        let result = self
            .sink
            .write_fmt(args)
            .and_then(|_| self.sink.flush());
        if let Err(e) = result {
            warn!(error = %e, "Failed to write progress output");
        }
    }
}

/// Cloneable in-memory sink
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
