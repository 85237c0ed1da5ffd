//! Scoped output capture for renderers
//!
//! A renderer only ever receives a `&mut dyn Write` backed by a
//! [`ReportCapture`]. The capture owns the report file, buffers output and
//! hands it to the file in chunks of at most `chunk_size` bytes. Dropping
//! the capture (including during unwinding) flushes the buffered tail, so
//! an aborted render never leaves output parked in memory or redirected
//! anywhere else.

use std::any::Any;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};

/// Chunked write-through capture around a report file
pub struct ReportCapture<W: Write> {
    inner: Option<W>,
    buffer: Vec<u8>,
    chunk_size: usize,
    written: u64,
}

impl<W: Write> ReportCapture<W> {
    /// Wraps `inner`; a `chunk_size` of 0 is treated as 1.
    pub fn new(inner: W, chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            inner: Some(inner),
            buffer: Vec::with_capacity(chunk_size),
            chunk_size,
            written: 0,
        }
    }

    /// Bytes handed to the inner writer so far.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Flushes the buffered tail and returns the inner writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.flush_buffer()?;
        let mut inner = self
            .inner
            .take()
            .ok_or_else(|| io::Error::other("capture already finished"))?;
        inner.flush()?;
        Ok(inner)
    }

    fn flush_buffer(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let inner = self
            .inner
            .as_mut()
            .ok_or_else(|| io::Error::other("capture already finished"))?;
        inner.write_all(&self.buffer)?;
        self.written += self.buffer.len() as u64;
        self.buffer.clear();
        Ok(())
    }
}

impl<W: Write> Write for ReportCapture<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let room = self.chunk_size - self.buffer.len();
        let accepted = buf.len().min(room);
        self.buffer.extend_from_slice(&buf[..accepted]);
        if self.buffer.len() == self.chunk_size {
            self.flush_buffer()?;
        }
        Ok(accepted)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_buffer()?;
        match self.inner.as_mut() {
            Some(inner) => inner.flush(),
            None => Ok(()),
        }
    }
}

impl<W: Write> Drop for ReportCapture<W> {
    fn drop(&mut self) {
        if self.inner.is_some() {
            // Best effort; errors here have nowhere to go.
            let _ = self.flush();
        }
    }
}

/// Runs `render` against a capture wrapping `inner`.
///
/// On success the buffered tail is flushed and `inner` is returned. On
/// failure the capture is torn down before the error is returned. A
/// panicking renderer is reported as an error of kind `Other`; the panic
/// does not reach the caller.
pub fn capture_with<W, F>(inner: W, chunk_size: usize, render: F) -> io::Result<W>
where
    W: Write,
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let mut capture = ReportCapture::new(inner, chunk_size);
    match panic::catch_unwind(AssertUnwindSafe(|| render(&mut capture))) {
        Ok(rendered) => rendered?,
        Err(payload) => {
            return Err(io::Error::other(format!(
                "renderer panicked: {}",
                panic_message(payload.as_ref())
            )))
        }
    }
    capture.finish()
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
