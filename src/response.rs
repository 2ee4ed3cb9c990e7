// ABOUTME: Shared response stream written by every concurrent foundation task.
// ABOUTME: Appends are serialized behind a mutex so chunks never interleave.

use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// Cloneable handle to the caller's output.
///
/// Every clone writes to the same underlying sink. Each `append` takes the
/// lock, writes the whole chunk and flushes, so output from different
/// foundations arrives chunk by chunk rather than byte by byte.
#[derive(Clone)]
pub struct ResponseStream {
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl ResponseStream {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Stream that writes to standard output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    /// Append one chunk of output. Empty chunks are ignored.
    pub fn append(&self, chunk: &[u8]) -> std::io::Result<()> {
        if chunk.is_empty() {
            return Ok(());
        }
        let mut sink = self.sink.lock();
        sink.write_all(chunk)?;
        sink.flush()
    }

    /// Append a chunk, logging instead of failing if the sink is gone.
    ///
    /// A caller that hung up must not abort a deployment halfway through.
    pub fn forward(&self, chunk: &[u8]) {
        if let Err(e) = self.append(chunk) {
            tracing::warn!("failed to write to response stream: {}", e);
        }
    }
}

impl std::fmt::Debug for ResponseStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseStream").finish_non_exhaustive()
    }
}

/// In-memory writer whose clones share one buffer.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
