//! Output streams handed to a wrapped callable, and scoped silencing.

use std::io::{self, Write};
use std::mem;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex};

type Sink = Box<dyn Write + Send>;

/// Standard output and error as seen by the wrapped callable.
///
/// Callables write through [`out`](Self::out) and [`err`](Self::err) instead
/// of the process streams directly, which lets the adapter silence them with
/// `--quiet` and lets tests capture them.
pub struct OutputStreams {
    out: Sink,
    err: Sink,
}

impl OutputStreams {
    pub fn new(out: impl Write + Send + 'static, err: impl Write + Send + 'static) -> Self {
        Self {
            out: Box::new(out),
            err: Box::new(err),
        }
    }

    /// The process's standard output and error.
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }

    pub fn out(&mut self) -> &mut dyn Write {
        &mut *self.out
    }

    pub fn err(&mut self) -> &mut dyn Write {
        &mut *self.err
    }

    /// Redirects both streams to a null sink until the guard drops.
    ///
    /// # Examples
    ///
    /// ```
    /// use programmify_synth::streams::{OutputStreams, SharedBuffer};
    ///
    /// let out = SharedBuffer::default();
    /// let mut streams = OutputStreams::new(out.clone(), SharedBuffer::default());
    /// {
    ///     let mut quiet = streams.silence().unwrap();
    ///     writeln!(quiet.out(), "hidden").unwrap();
    /// }
    /// writeln!(streams.out(), "shown").unwrap();
    /// assert_eq!(out.contents(), "shown\n");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns the error of flushing pending output before the swap; the
    /// streams are left untouched in that case.
    pub fn silence(&mut self) -> io::Result<QuietGuard<'_>> {
        self.flush()?;
        let saved_out = mem::replace(&mut self.out, Box::new(io::sink()));
        let saved_err = mem::replace(&mut self.err, Box::new(io::sink()));
        Ok(QuietGuard {
            streams: self,
            saved: Some((saved_out, saved_err)),
        })
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()?;
        self.err.flush()
    }
}

impl Default for OutputStreams {
    fn default() -> Self {
        Self::stdio()
    }
}

/// Restores the silenced streams when dropped, including during unwinding.
pub struct QuietGuard<'a> {
    streams: &'a mut OutputStreams,
    saved: Option<(Sink, Sink)>,
}

impl Deref for QuietGuard<'_> {
    type Target = OutputStreams;

    fn deref(&self) -> &OutputStreams {
        self.streams
    }
}

impl DerefMut for QuietGuard<'_> {
    fn deref_mut(&mut self) -> &mut OutputStreams {
        self.streams
    }
}

impl Drop for QuietGuard<'_> {
    fn drop(&mut self) {
        if let Some((out, err)) = self.saved.take() {
            self.streams.out = out;
            self.streams.err = err;
        }
    }
}

/// Cloneable in-memory writer; every clone appends to the same buffer.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Buffer contents decoded lossily as UTF-8.
    pub fn contents(&self) -> String {
        let bytes = self.inner.lock().map(|b| b.clone()).unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("shared buffer lock poisoned"))?;
        inner.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
